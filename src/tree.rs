//! The ordered binary search tree engine. Nodes are kept in an arena and the
//! tree is height-balanced (an AVL tree), but nothing outside this module
//! depends on its shape.
//!
//! # Examples
//!
//! ```
//! use bstree::{Error, Tree};
//!
//! let mut tree: Tree<i32> = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&1), tree.end());
//!
//! let (one, inserted) = tree.insert(1)?;
//! assert!(inserted);
//! assert_eq!(tree.get(one), Some(&1));
//!
//! // Inserting an equal key hands back the existing element.
//! assert_eq!(tree.insert(1)?, (one, false));
//! assert_eq!(tree.len(), 1);
//!
//! // Erasing returns the payload and invalidates the cursor.
//! assert_eq!(tree.erase(one), Ok(1));
//! assert_eq!(tree.get(one), None);
//! assert_eq!(tree.erase(one), Err(Error::Empty));
//! # Ok::<(), Error>(())
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use slab::Slab;

use crate::cursor::{Cursor, IntoIter, Iter, TreeId};
use crate::error::{AllocError, Error};
use crate::node::{self, Link, Node};
use crate::policy::{Global, Identity, KeyOf, NodeAlloc};

/// Where a missing key would be linked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Vacancy {
    Root,
    Left(usize),
    Right(usize),
}

/// A self-balancing Binary Search Tree holding payloads of type `T`, ordered
/// by the key that the `K` policy extracts from them. Keys are unique.
///
/// `A` is asked before every node allocation; see [`NodeAlloc`].
pub struct Tree<T, K = Identity, A = Global> {
    nodes: Slab<Node<T>>,
    root: Link,
    len: usize,
    id: TreeId,
    next_stamp: u64,
    alloc: A,
    key: PhantomData<fn() -> K>,
}

impl<T, K, A: Default> Default for Tree<T, K, A> {
    fn default() -> Self {
        Self::with_alloc(A::default())
    }
}

impl<T, K, A> Clone for Tree<T, K, A>
where
    T: Clone,
    A: Clone,
{
    /// Copies every node into a new arena. The copy is a different tree:
    /// cursors of `self` do not resolve in it.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            id: TreeId::fresh(),
            next_stamp: self.next_stamp,
            alloc: self.alloc.clone(),
            key: PhantomData,
        }
    }
}

impl<T: fmt::Debug, K, A> fmt::Debug for Tree<T, K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, K, A> PartialEq for Tree<T, K, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, K, A> Eq for Tree<T, K, A> {}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree` using the global allocator.
    pub fn new() -> Self {
        Self::with_alloc(Global)
    }
}

impl<T, K, A> Tree<T, K, A> {
    /// Generates a new, empty `Tree` which asks `alloc` before allocating nodes.
    pub fn with_alloc(alloc: A) -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
            len: 0,
            id: TreeId::fresh(),
            next_stamp: 0,
            alloc,
            key: PhantomData,
        }
    }

    /// The number of payloads in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The most nodes a tree of this payload type could ever address.
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Node<T>>().max(1)
    }

    /// The allocation policy.
    pub fn alloc(&self) -> &A {
        &self.alloc
    }

    /// A cursor at the smallest payload, or [`end`](Self::end) if the tree is
    /// empty.
    pub fn begin(&self) -> Cursor {
        self.cursor(self.root.map(|r| node::leftmost(&self.nodes, r)))
    }

    /// The end sentinel: one past the largest payload.
    pub fn end(&self) -> Cursor {
        Cursor::end(self.id)
    }

    /// The payload at `cursor`, or `None` for the end sentinel, an erased
    /// position or a cursor of another tree.
    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        cursor
            .resolve(self.id, &self.nodes)
            .map(|index| &self.nodes[index].payload)
    }

    /// Steps to the next larger payload. The last payload steps to `end()`,
    /// and `end()` wraps around to `begin()`.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        match cursor.resolve(self.id, &self.nodes) {
            Some(index) => self.cursor(node::successor(&self.nodes, index)),
            None if cursor == self.end() => self.begin(),
            None => self.end(),
        }
    }

    /// Steps to the next smaller payload. `end()` steps to the largest payload
    /// and the smallest payload steps to `end()`.
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        match cursor.resolve(self.id, &self.nodes) {
            Some(index) => self.cursor(node::predecessor(&self.nodes, index)),
            None if cursor == self.end() => {
                self.cursor(self.root.map(|r| node::rightmost(&self.nodes, r)))
            }
            None => self.end(),
        }
    }

    /// The smallest payload.
    pub fn first(&self) -> Result<&T, Error> {
        self.get(self.begin()).ok_or(Error::Empty)
    }

    /// The largest payload.
    pub fn last(&self) -> Result<&T, Error> {
        self.get(self.prev(self.end())).ok_or(Error::Empty)
    }

    /// Iterates over the payloads in ascending key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root, self.len)
    }

    /// Removes the payload at `cursor` and returns it. Only cursors at that
    /// payload are invalidated.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if the tree is empty and [`Error::InvalidPosition`] if
    /// `cursor` does not point at one of its payloads. The tree is unchanged in
    /// both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::{Error, Tree};
    ///
    /// let mut tree: Tree<i32> = [1, 2, 3].into_iter().collect();
    ///
    /// let two = tree.next(tree.begin());
    /// assert_eq!(tree.erase(two), Ok(2));
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3]);
    ///
    /// assert_eq!(tree.erase(tree.end()), Err(Error::InvalidPosition));
    /// ```
    pub fn erase(&mut self, cursor: Cursor) -> Result<T, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let index = cursor
            .resolve(self.id, &self.nodes)
            .ok_or(Error::InvalidPosition)?;
        let payload = self.unlink(index);
        tracing::trace!(len = self.len, "erased node");
        Ok(payload)
    }

    /// Removes every payload. Outstanding cursors become invalid.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        let released = self.len;
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        tracing::trace!(released, "cleared tree");
    }

    /// Exchanges the contents of two trees without moving any node. Cursors
    /// keep pointing at the same payloads, now owned by the other tree.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
        tracing::trace!(len = self.len, other_len = other.len, "swapped trees");
    }

    fn cursor(&self, link: Link) -> Cursor {
        match link {
            Some(index) => Cursor::at(self.id, index, self.nodes[index].stamp),
            None => self.end(),
        }
    }

    /// Detaches the node at `index` from the tree, frees it and returns its
    /// payload. No other node changes slot.
    fn unlink(&mut self, index: usize) -> T {
        let Node {
            left,
            right,
            parent,
            ..
        } = self.nodes[index];

        let retrace_from = match (left, right) {
            (None, child) | (child, None) => {
                self.replace_child(parent, index, child);
                parent
            }
            (Some(left), Some(right)) => {
                // The successor has no left child so it can take our place.
                let successor = node::leftmost(&self.nodes, right);
                let retrace_from = if successor == right {
                    Some(successor)
                } else {
                    let successor_parent = self.nodes[successor]
                        .parent
                        .expect("Successor below right child has a parent");
                    let successor_right = self.nodes[successor].right;
                    self.nodes[successor_parent].left = successor_right;
                    if let Some(r) = successor_right {
                        self.nodes[r].parent = Some(successor_parent);
                    }
                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                    Some(successor_parent)
                };
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
                self.replace_child(parent, index, Some(successor));
                retrace_from
            }
        };

        let removed = self.nodes.remove(index);
        self.len -= 1;
        self.retrace(retrace_from);
        removed.payload
    }

    /// Makes `new` take the place of `old` under `parent` (or as the root).
    fn replace_child(&mut self, parent: Link, old: usize, new: Link) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }

    /// Rebalances every node from `from` up to the root.
    fn retrace(&mut self, from: Link) {
        let mut cur = from;
        while let Some(index) = cur {
            let top = self.balance(index);
            cur = self.nodes[top].parent;
        }
    }

    fn fix_height(&mut self, index: usize) {
        let left_height = node::height(&self.nodes, self.nodes[index].left);
        let right_height = node::height(&self.nodes, self.nodes[index].right);
        self.nodes[index].height = left_height.max(right_height) + 1;
    }

    /// The difference in height between the right and left subtrees. See [the Wikipedia
    /// page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self, index: usize) -> isize {
        let right_height = node::height(&self.nodes, self.nodes[index].right);
        let left_height = node::height(&self.nodes, self.nodes[index].left);
        right_height as isize - left_height as isize
    }

    /// Restores the AVL invariant at `index`, assuming it holds for both
    /// children, and returns the root of the (possibly rotated) subtree.
    fn balance(&mut self, index: usize) -> usize {
        // See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
        self.fix_height(index);
        let top = match self.balance_factor(index) {
            -2 => {
                let left = self.nodes[index].left.expect("Left heavy => left child");
                if self.balance_factor(left) > 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(index)
            }
            2 => {
                let right = self.nodes[index].right.expect("Right heavy => right child");
                if self.balance_factor(right) < 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(index)
            }
            _ => index,
        };

        if cfg!(debug_assertions) {
            let node = &self.nodes[top];
            let left_height = node::height(&self.nodes, node.left);
            let right_height = node::height(&self.nodes, node.right);
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
        top
    }

    /// Rotate `index` to the right. This moves the left child up vertically and `index` down
    /// vertically. Used to rebalance the tree when the left child is too tall. As such, it must
    /// only be called when there _is_ a left child.
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///   old_root                  new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self, old_root: usize) -> usize {
        let new_root = self.nodes[old_root]
            .left
            .expect("Rotate right => left child");
        let parent = self.nodes[old_root].parent;
        let inner = self.nodes[new_root].right;

        self.nodes[old_root].left = inner;
        if let Some(y) = inner {
            self.nodes[y].parent = Some(old_root);
        }
        self.nodes[new_root].right = Some(old_root);
        self.nodes[old_root].parent = Some(new_root);
        self.replace_child(parent, old_root, Some(new_root));

        self.fix_height(old_root);
        self.fix_height(new_root);
        new_root
    }

    /// The mirror image of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, old_root: usize) -> usize {
        let new_root = self.nodes[old_root]
            .right
            .expect("Rotate left => right child");
        let parent = self.nodes[old_root].parent;
        let inner = self.nodes[new_root].left;

        self.nodes[old_root].right = inner;
        if let Some(y) = inner {
            self.nodes[y].parent = Some(old_root);
        }
        self.nodes[new_root].left = Some(old_root);
        self.nodes[old_root].parent = Some(new_root);
        self.replace_child(parent, old_root, Some(new_root));

        self.fix_height(old_root);
        self.fix_height(new_root);
        new_root
    }
}

impl<T, K, A> Tree<T, K, A>
where
    K: KeyOf<T>,
{
    /// A cursor at the payload whose key equals `key`, or [`end`](Self::end).
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::{First, Tree};
    ///
    /// let mut tree: Tree<(String, u32), First> = Tree::with_alloc(Default::default());
    /// tree.insert(("one".to_string(), 1)).unwrap();
    ///
    /// // Any borrowed form of the key works.
    /// assert_eq!(tree.get(tree.find("one")), Some(&("one".to_string(), 1)));
    /// assert_eq!(tree.find("two"), tree.end());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Ok(index) => self.cursor(Some(index)),
            Err(_) => self.end(),
        }
    }

    /// Returns `true` if a payload with this key is stored.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_ok()
    }

    /// Removes the payload with this key, if there is one, and returns it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        K::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.search(key).ok()?;
        let payload = self.unlink(index);
        tracing::trace!(len = self.len, "removed node");
        Some(payload)
    }

    /// Descends from the root by comparison. `Ok` holds the matching node,
    /// `Err` the place the key would be linked.
    fn search<Q>(&self, key: &Q) -> Result<usize, Vacancy>
    where
        K::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut vacancy = Vacancy::Root;
        let mut cur = self.root;
        while let Some(index) = cur {
            let node = &self.nodes[index];
            match key.cmp(<K::Key as Borrow<Q>>::borrow(K::key_of(&node.payload))) {
                Ordering::Less => {
                    vacancy = Vacancy::Left(index);
                    cur = node.left;
                }
                Ordering::Equal => return Ok(index),
                Ordering::Greater => {
                    vacancy = Vacancy::Right(index);
                    cur = node.right;
                }
            }
        }
        Err(vacancy)
    }

    /// Allocates a node for `payload` at `vacancy` and rebalances.
    fn attach(&mut self, vacancy: Vacancy, payload: T) -> usize {
        let parent = match vacancy {
            Vacancy::Root => None,
            Vacancy::Left(p) | Vacancy::Right(p) => Some(p),
        };
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        let index = self.nodes.insert(Node::leaf(payload, parent, stamp));
        match vacancy {
            Vacancy::Root => self.root = Some(index),
            Vacancy::Left(p) => self.nodes[p].left = Some(index),
            Vacancy::Right(p) => self.nodes[p].right = Some(index),
        }

        if cfg!(debug_assertions) {
            let key = K::key_of(&self.nodes[index].payload);
            match vacancy {
                Vacancy::Root => assert_eq!(self.len, 0),
                Vacancy::Left(p) => assert!(key < K::key_of(&self.nodes[p].payload)),
                Vacancy::Right(p) => assert!(key > K::key_of(&self.nodes[p].payload)),
            }
        }

        self.len += 1;
        self.retrace(parent);
        index
    }
}

impl<T, K, A> Tree<T, K, A>
where
    K: KeyOf<T>,
    A: NodeAlloc,
{
    /// Inserts `payload` unless a payload with an equal key is already stored.
    ///
    /// Returns a cursor at the new payload and `true`, or a cursor at the
    /// existing payload and `false`. In the latter case `payload` is dropped
    /// and the tree is unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the allocation policy refuses a new node or
    /// the tree already holds [`max_size`](Self::max_size) nodes. The tree is
    /// unchanged.
    pub fn insert(&mut self, payload: T) -> Result<(Cursor, bool), Error> {
        let vacancy = match self.search(K::key_of(&payload)) {
            Ok(existing) => return Ok((self.cursor(Some(existing)), false)),
            Err(vacancy) => vacancy,
        };
        self.reserve()?;
        let index = self.attach(vacancy, payload);
        tracing::trace!(len = self.len, "inserted node");
        Ok((self.cursor(Some(index)), true))
    }

    /// Inserts every payload in order, dropping those whose key is already
    /// stored. This is the fallible counterpart of [`Extend`], which is only
    /// implemented for the [`Global`] policy.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] as soon as a node is refused. Payloads inserted
    /// by this call are erased again, so the tree holds what it held before.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::{AllocError, Bounded, Error, Identity, Tree};
    ///
    /// let mut tree: Tree<i32, Identity, Bounded> = Tree::with_alloc(Bounded::new(2));
    /// tree.try_extend([1, 1, 2])?;
    /// assert_eq!(
    ///     tree.try_extend([0, 3]),
    ///     Err(Error::OutOfMemory(AllocError::LimitReached { limit: 2 }))
    /// );
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2]);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), Error> {
        let mut added = Vec::new();
        for payload in iter {
            match self.insert(payload) {
                Ok((cursor, true)) => added.push(cursor),
                Ok((_, false)) => {}
                Err(error) => {
                    tracing::debug!(rolled_back = added.len(), "extend refused");
                    for cursor in added.into_iter().rev() {
                        if let Some(index) = cursor.resolve(self.id, &self.nodes) {
                            self.unlink(index);
                        }
                    }
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    /// Moves every payload of `other` whose key is not in `self` into `self`.
    /// Payloads with keys present in both trees stay in `other`.
    ///
    /// Cursors into `self` stay valid. Cursors into `other` at payloads that
    /// were moved become invalid.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the allocation policy of `self` refuses a
    /// node. Payloads moved before that stay moved; the payload that could not
    /// be moved and everything after it stay in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut a: Tree<i32> = [1, 3, 5].into_iter().collect();
    /// let mut b: Tree<i32> = [3, 4, 5, 6].into_iter().collect();
    ///
    /// a.merge(&mut b)?;
    /// assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 6]);
    /// assert_eq!(b.iter().copied().collect::<Vec<_>>(), [3, 5]);
    /// # Ok::<(), bstree::Error>(())
    /// ```
    pub fn merge<B>(&mut self, other: &mut Tree<T, K, B>) -> Result<(), Error> {
        let mut moved = 0;
        let mut cur = other.root.map(|r| node::leftmost(&other.nodes, r));
        while let Some(index) = cur {
            // Unlinking `index` leaves every other node of `other` in its slot.
            cur = node::successor(&other.nodes, index);
            let vacancy = match self.search(K::key_of(&other.nodes[index].payload)) {
                Ok(_) => continue,
                Err(vacancy) => vacancy,
            };
            if let Err(error) = self.reserve() {
                tracing::debug!(moved, kept = other.len, "merge stopped early");
                return Err(error);
            }
            let payload = other.unlink(index);
            self.attach(vacancy, payload);
            moved += 1;
        }
        tracing::debug!(moved, kept = other.len, len = self.len, "merged trees");
        Ok(())
    }

    /// Asks the allocation policy for one more node.
    fn reserve(&mut self) -> Result<(), Error> {
        if self.len >= self.max_size() {
            return Err(AllocError::CapacityOverflow.into());
        }
        self.alloc.reserve(self.len).map_err(|error| {
            tracing::debug!(live = self.len, %error, "node allocation refused");
            Error::from(error)
        })
    }
}

impl<'a, T, K, A> IntoIterator for &'a Tree<T, K, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, K, A> IntoIterator for Tree<T, K, A> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.nodes, self.root)
    }
}

impl<T, K: KeyOf<T>> Extend<T> for Tree<T, K, Global> {
    /// Inserts every payload in order, dropping those whose key is already
    /// stored. Bounded trees use [`try_extend`](Tree::try_extend) instead.
    ///
    /// # Panics
    ///
    /// If the tree would grow past [`max_size`](Tree::max_size).
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(error) = self.try_extend(iter) {
            panic!("cannot extend tree: {}", error);
        }
    }
}

impl<T, K: KeyOf<T>> FromIterator<T> for Tree<T, K, Global> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::with_alloc(Global);
        tree.extend(iter);
        tree
    }
}
