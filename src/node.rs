//! Arena-resident tree nodes and in-order navigation between them.
//!
//! Nodes live in a [`Slab`] and refer to each other by slab index. The parent
//! index is a back-reference only; ownership runs from the tree through the
//! slab.

use slab::Slab;

/// Index of a node in its tree's arena.
pub(crate) type Link = Option<usize>;

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) payload: T,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) height: usize,
    /// Unique within the owning tree. Tells a cursor whether the slot it
    /// points at still holds the node it was created for.
    pub(crate) stamp: u64,
}

impl<T> Node<T> {
    pub(crate) fn leaf(payload: T, parent: Link, stamp: u64) -> Self {
        Node {
            payload,
            left: None,
            right: None,
            parent,
            height: 1,
            stamp,
        }
    }
}

pub(crate) fn height<T>(nodes: &Slab<Node<T>>, link: Link) -> usize {
    link.map_or(0, |i| nodes[i].height)
}

/// Follows left children down from `index`.
pub(crate) fn leftmost<T>(nodes: &Slab<Node<T>>, mut index: usize) -> usize {
    while let Some(left) = nodes[index].left {
        index = left;
    }
    index
}

/// Follows right children down from `index`.
pub(crate) fn rightmost<T>(nodes: &Slab<Node<T>>, mut index: usize) -> usize {
    while let Some(right) = nodes[index].right {
        index = right;
    }
    index
}

/// The node holding the next larger key, if any.
pub(crate) fn successor<T>(nodes: &Slab<Node<T>>, index: usize) -> Link {
    if let Some(right) = nodes[index].right {
        return Some(leftmost(nodes, right));
    }
    let mut child = index;
    while let Some(parent) = nodes[child].parent {
        if nodes[parent].left == Some(child) {
            return Some(parent);
        }
        child = parent;
    }
    None
}

/// The node holding the next smaller key, if any.
pub(crate) fn predecessor<T>(nodes: &Slab<Node<T>>, index: usize) -> Link {
    if let Some(left) = nodes[index].left {
        return Some(rightmost(nodes, left));
    }
    let mut child = index;
    while let Some(parent) = nodes[child].parent {
        if nodes[parent].right == Some(child) {
            return Some(parent);
        }
        child = parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds
    ///
    /// ```text
    ///       4
    ///     /   \
    ///    2     6
    ///   / \   /
    ///  1   3 5
    /// ```
    ///
    /// and returns the arena with the index of each key (`index[k]`).
    fn sample() -> (Slab<Node<i32>>, [usize; 7]) {
        let mut nodes = Slab::new();
        let mut index = [0; 7];
        for (stamp, key) in [4, 2, 6, 1, 3, 5].into_iter().enumerate() {
            index[key as usize] = nodes.insert(Node::leaf(key, None, stamp as u64));
        }
        let mut link = |parent: i32, left: Option<i32>, right: Option<i32>| {
            let p = index[parent as usize];
            nodes[p].left = left.map(|k| index[k as usize]);
            nodes[p].right = right.map(|k| index[k as usize]);
            for child in left.into_iter().chain(right) {
                nodes[index[child as usize]].parent = Some(p);
            }
        };
        link(4, Some(2), Some(6));
        link(2, Some(1), Some(3));
        link(6, Some(5), None);
        (nodes, index)
    }

    #[test]
    fn walks_forward_in_order() {
        let (nodes, index) = sample();
        let mut seen = Vec::new();
        let mut cur = Some(leftmost(&nodes, index[4]));
        while let Some(i) = cur {
            seen.push(nodes[i].payload);
            cur = successor(&nodes, i);
        }
        assert_eq!(seen, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn walks_backward_in_order() {
        let (nodes, index) = sample();
        let mut seen = Vec::new();
        let mut cur = Some(rightmost(&nodes, index[4]));
        while let Some(i) = cur {
            seen.push(nodes[i].payload);
            cur = predecessor(&nodes, i);
        }
        assert_eq!(seen, [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn successor_climbs_out_of_left_subtree() {
        let (nodes, index) = sample();
        assert_eq!(successor(&nodes, index[3]), Some(index[4]));
        assert_eq!(predecessor(&nodes, index[5]), Some(index[4]));
        assert_eq!(height(&nodes, None), 0);
    }
}
