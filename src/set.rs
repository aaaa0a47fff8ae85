//! An ordered set: a [`Tree`] whose payloads are their own keys.
//!
//! # Examples
//!
//! ```
//! use bstree::Set;
//!
//! // Later duplicates are silently dropped.
//! let mut set = Set::from([4, 2, 1, 1]);
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);
//!
//! let (three, inserted) = set.insert(3)?;
//! assert!(inserted);
//! assert_eq!(set.get(three), Some(&3));
//!
//! // A rejected duplicate points nowhere.
//! assert_eq!(set.insert(3)?, (set.end(), false));
//! # Ok::<(), bstree::Error>(())
//! ```

use std::borrow::Borrow;
use std::fmt;

use crate::cursor::{Cursor, IntoIter, Iter};
use crate::error::Error;
use crate::policy::{Global, Identity, NodeAlloc};
use crate::tree::Tree;

/// An ordered set of unique values.
pub struct Set<T, A = Global> {
    tree: Tree<T, Identity, A>,
}

impl<T, A: Default> Default for Set<T, A> {
    fn default() -> Self {
        Self::with_alloc(A::default())
    }
}

impl<T: Clone, A: Clone> Clone for Set<T, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: fmt::Debug, A> fmt::Debug for Set<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A> PartialEq for Set<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, A> Eq for Set<T, A> {}

impl<T> Set<T> {
    /// Makes a new, empty `Set`.
    pub fn new() -> Self {
        Self::with_alloc(Global)
    }
}

impl<T, A> Set<T, A> {
    /// Makes a new, empty `Set` which asks `alloc` before allocating nodes.
    pub fn with_alloc(alloc: A) -> Self {
        Self {
            tree: Tree::with_alloc(alloc),
        }
    }

    /// The number of values in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// See [`Tree::max_size`].
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// A cursor at the smallest value, or `end()` if the set is empty.
    pub fn begin(&self) -> Cursor {
        self.tree.begin()
    }

    /// The end sentinel.
    pub fn end(&self) -> Cursor {
        self.tree.end()
    }

    /// See [`Tree::get`].
    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        self.tree.get(cursor)
    }

    /// See [`Tree::next`].
    pub fn next(&self, cursor: Cursor) -> Cursor {
        self.tree.next(cursor)
    }

    /// See [`Tree::prev`].
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        self.tree.prev(cursor)
    }

    /// The smallest value, or [`Error::Empty`].
    pub fn first(&self) -> Result<&T, Error> {
        self.tree.first()
    }

    /// The largest value, or [`Error::Empty`].
    pub fn last(&self) -> Result<&T, Error> {
        self.tree.last()
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Removes the value at `cursor`. See [`Tree::erase`] for the errors.
    pub fn erase(&mut self, cursor: Cursor) -> Result<T, Error> {
        self.tree.erase(cursor)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.tree.clear()
    }

    /// Exchanges the contents of two sets in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree)
    }
}

impl<T: Ord, A> Set<T, A> {
    /// A cursor at the value equal to `value`, or `end()`.
    pub fn find<Q>(&self, value: &Q) -> Cursor
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(value)
    }

    /// Returns `true` if the set holds a value equal to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    /// Removes `value` if present and returns it.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value)
    }
}

impl<T: Ord, A: NodeAlloc> Set<T, A> {
    /// Adds `value` to the set.
    ///
    /// Returns a cursor at the new value and `true`, or `end()` and `false` if
    /// an equal value was already present (use [`find`](Self::find) to reach
    /// it).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if no node could be allocated; the set is
    /// unchanged.
    pub fn insert(&mut self, value: T) -> Result<(Cursor, bool), Error> {
        match self.tree.insert(value)? {
            (cursor, true) => Ok((cursor, true)),
            (_, false) => Ok((self.end(), false)),
        }
    }

    /// Moves every value of `other` that is missing from `self` into `self`.
    /// After a successful merge `other` holds exactly the values present in
    /// both.
    ///
    /// # Errors
    ///
    /// See [`Tree::merge`]: an allocation failure stops the merge part way,
    /// leaving both sets valid. Values not yet moved stay in `other`, even if
    /// `self` lacks them.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Set;
    ///
    /// let mut a = Set::from([1, 2, 3]);
    /// let mut b = Set::from([3, 4]);
    ///
    /// a.merge(&mut b)?;
    /// assert_eq!(a, Set::from([1, 2, 3, 4]));
    /// assert_eq!(b, Set::from([3]));
    /// # Ok::<(), bstree::Error>(())
    /// ```
    pub fn merge<B>(&mut self, other: &mut Set<T, B>) -> Result<(), Error> {
        self.tree.merge(&mut other.tree)
    }

    /// Inserts the values in order, keeping the first of any duplicates.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if a node is refused. The set is left as it was
    /// before the call.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), Error> {
        self.tree.try_extend(iter)
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    /// Inserts the values in order, keeping the first of any duplicates.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter)
    }
}

impl<'a, T, A> IntoIterator for &'a Set<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, A> IntoIterator for Set<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}
