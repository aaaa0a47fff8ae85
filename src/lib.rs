//! This crate provides an ordered Binary Search Tree engine and an ordered set
//! built on top of it.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! Searching takes `O(height)`; the [`Tree`] here keeps itself height-balanced
//! so that is `O(lg N)`. Visiting the left subtree, then the subtree root,
//! then the right subtree yields the keys in sorted order, and every node
//! knows its parent so a [`Cursor`] can step to its neighbours in either
//! direction without a stack.
//!
//! ## Cursors
//!
//! A [`Cursor`] names one element of one tree (or that tree's end sentinel).
//! It does not borrow the tree, so it can be kept across inserts and erases of
//! other elements and used again afterwards.
//!
//! # Examples
//!
//! ```
//! use bstree::Set;
//!
//! let mut set = Set::from([5, 1, 3]);
//! let three = set.find(&3);
//!
//! set.insert(4)?;
//! set.erase(set.begin())?;
//!
//! // `three` survived both mutations.
//! assert_eq!(set.get(three), Some(&3));
//! assert_eq!(set.get(set.next(three)), Some(&4));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 4, 5]);
//! # Ok::<(), bstree::Error>(())
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod cursor;
mod error;
mod node;
pub mod policy;
mod set;
mod tree;

pub use cursor::{Cursor, IntoIter, Iter};
pub use error::{AllocError, Error};
pub use policy::{Bounded, First, Global, Identity, KeyOf, NodeAlloc};
pub use set::Set;
pub use tree::Tree;
