//! Positions in a tree and iterators over it.
//!
//! A [`Cursor`] is a plain, copyable handle: it does not borrow the tree it
//! came from. It is stepped with [`Tree::next`]/[`Tree::prev`] and read with
//! [`Tree::get`], so it can be held across mutations of the tree. A cursor at a
//! node that has since been erased (or a cursor of a different tree) is simply
//! not found any more: `get` returns `None`, stepping lands on `end()` and
//! `erase` reports [`Error::InvalidPosition`](crate::Error::InvalidPosition).
//!
//! [`Tree::next`]: crate::Tree::next
//! [`Tree::prev`]: crate::Tree::prev
//! [`Tree::get`]: crate::Tree::get

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};

use slab::Slab;

use crate::node::{self, Link, Node};

/// Identity of one tree instance, carried by every cursor it hands out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TreeId(u64);

impl TreeId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TreeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Position {
    End,
    At { index: usize, stamp: u64 },
}

/// A position in a [`Tree`](crate::Tree): either one of its elements or its
/// end sentinel.
///
/// Two cursors are equal when they point at the same element of the same tree,
/// or are both the end sentinel of the same tree.
///
/// # Examples
///
/// ```
/// use bstree::Set;
///
/// let set = Set::from([1, 2, 3]);
///
/// let second = set.next(set.begin());
/// assert_eq!(set.get(second), Some(&2));
///
/// // The sentinel sits between the last and the first element.
/// let last = set.prev(set.end());
/// assert_eq!(set.get(last), Some(&3));
/// assert_eq!(set.next(last), set.end());
/// assert_eq!(set.get(set.end()), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    tree: TreeId,
    position: Position,
}

impl Cursor {
    pub(crate) fn end(tree: TreeId) -> Self {
        Cursor {
            tree,
            position: Position::End,
        }
    }

    pub(crate) fn at(tree: TreeId, index: usize, stamp: u64) -> Self {
        Cursor {
            tree,
            position: Position::At { index, stamp },
        }
    }

    /// Returns `true` if this is an end sentinel.
    pub fn is_end(&self) -> bool {
        self.position == Position::End
    }

    /// The arena index this cursor refers to, if it is a live node of the tree
    /// `tree` whose arena is `nodes`.
    pub(crate) fn resolve<T>(&self, tree: TreeId, nodes: &Slab<Node<T>>) -> Link {
        match self.position {
            Position::At { index, stamp } if self.tree == tree => nodes
                .get(index)
                .filter(|node| node.stamp == stamp)
                .map(|_| index),
            _ => None,
        }
    }
}

/// A borrowing iterator over a tree's payloads in ascending key order.
///
/// Created by [`Tree::iter`](crate::Tree::iter) and
/// [`Set::iter`](crate::Set::iter).
pub struct Iter<'a, T> {
    nodes: &'a Slab<Node<T>>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a Slab<Node<T>>, root: Link, len: usize) -> Self {
        Iter {
            nodes,
            front: root.map(|r| node::leftmost(nodes, r)),
            back: root.map(|r| node::rightmost(nodes, r)),
            remaining: len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        self.front = node::successor(self.nodes, index);
        self.remaining -= 1;
        Some(&self.nodes[index].payload)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        self.back = node::predecessor(self.nodes, index);
        self.remaining -= 1;
        Some(&self.nodes[index].payload)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over a tree's payloads in ascending key order.
///
/// Created by the `IntoIterator` impls of [`Tree`](crate::Tree) and
/// [`Set`](crate::Set).
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    /// Drains `nodes` in order starting from `root`.
    pub(crate) fn new(mut nodes: Slab<Node<T>>, root: Link) -> Self {
        let mut order = Vec::with_capacity(nodes.len());
        let mut cur = root.map(|r| node::leftmost(&nodes, r));
        while let Some(index) = cur {
            order.push(index);
            cur = node::successor(&nodes, index);
        }
        let payloads: Vec<T> = order
            .into_iter()
            .map(|index| nodes.remove(index).payload)
            .collect();
        IntoIter {
            inner: payloads.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_checks_tree_and_stamp() {
        let mut nodes = Slab::new();
        let index = nodes.insert(Node::leaf('a', None, 7));
        let tree = TreeId::fresh();
        let other = TreeId::fresh();

        assert_eq!(Cursor::at(tree, index, 7).resolve(tree, &nodes), Some(index));
        assert_eq!(Cursor::at(other, index, 7).resolve(tree, &nodes), None);
        assert_eq!(Cursor::at(tree, index, 8).resolve(tree, &nodes), None);
        assert_eq!(Cursor::end(tree).resolve(tree, &nodes), None);

        nodes.remove(index);
        let reused = nodes.insert(Node::leaf('b', None, 9));
        assert_eq!(reused, index);
        assert_eq!(Cursor::at(tree, index, 7).resolve(tree, &nodes), None);
    }

    #[test]
    fn end_cursors_of_different_trees_differ() {
        let a = TreeId::fresh();
        let b = TreeId::fresh();
        assert_eq!(Cursor::end(a), Cursor::end(a));
        assert_ne!(Cursor::end(a), Cursor::end(b));
        assert!(Cursor::end(a).is_end());
        assert!(!Cursor::at(a, 0, 0).is_end());
    }
}
