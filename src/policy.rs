//! Construction-time policies for a [`Tree`](crate::Tree).
//!
//! A tree is parameterized by two policies:
//!
//! * a [`KeyOf`] policy which says which part of a stored payload is the key.
//!   [`Identity`] stores bare keys (a set), [`First`] stores `(key, value)`
//!   pairs ordered by the key (a map).
//! * a [`NodeAlloc`] policy which is asked for permission before every node
//!   allocation. [`Global`] always agrees, [`Bounded`] caps the number of live
//!   nodes and any `FnMut(usize) -> Result<(), AllocError>` can be used for
//!   anything else.
//!
//! # Examples
//!
//! ```
//! use bstree::{AllocError, Error, First, Tree};
//!
//! // An ordered map that refuses to grow past two entries.
//! let mut tree: Tree<(i32, &str), First, _> = Tree::with_alloc(|live: usize| {
//!     if live < 2 {
//!         Ok(())
//!     } else {
//!         Err(AllocError::LimitReached { limit: 2 })
//!     }
//! });
//!
//! assert!(tree.insert((2, "two")).is_ok());
//! assert!(tree.insert((1, "one")).is_ok());
//! assert_eq!(
//!     tree.insert((3, "three")),
//!     Err(Error::OutOfMemory(AllocError::LimitReached { limit: 2 }))
//! );
//! assert_eq!(tree.get(tree.find(&2)), Some(&(2, "two")));
//! ```

use crate::error::AllocError;

/// Extracts the ordering key from a stored payload.
pub trait KeyOf<T> {
    /// The type the tree orders by.
    type Key: Ord;

    /// Borrows the key out of `payload`.
    fn key_of(payload: &T) -> &Self::Key;
}

/// The payload is its own key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T: Ord> KeyOf<T> for Identity {
    type Key = T;

    fn key_of(payload: &T) -> &T {
        payload
    }
}

/// The payload is a `(key, value)` pair ordered by its first element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct First;

impl<K: Ord, V> KeyOf<(K, V)> for First {
    type Key = K;

    fn key_of(payload: &(K, V)) -> &K {
        &payload.0
    }
}

/// Decides whether a tree may allocate another node.
pub trait NodeAlloc {
    /// Called with the number of live nodes right before a new node would be
    /// allocated. Returning an error aborts the insertion before anything is
    /// linked.
    fn reserve(&mut self, live: usize) -> Result<(), AllocError>;
}

/// Allocates from the global allocator with no extra limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl NodeAlloc for Global {
    fn reserve(&mut self, _live: usize) -> Result<(), AllocError> {
        Ok(())
    }
}

/// Admits at most `limit` live nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounded {
    limit: usize,
}

impl Bounded {
    /// Creates a policy admitting at most `limit` live nodes.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The most nodes this policy admits.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl NodeAlloc for Bounded {
    fn reserve(&mut self, live: usize) -> Result<(), AllocError> {
        if live < self.limit {
            Ok(())
        } else {
            Err(AllocError::LimitReached { limit: self.limit })
        }
    }
}

impl<F> NodeAlloc for F
where
    F: FnMut(usize) -> Result<(), AllocError>,
{
    fn reserve(&mut self, live: usize) -> Result<(), AllocError> {
        self(live)
    }
}
