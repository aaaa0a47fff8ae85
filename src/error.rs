//! Failures reported by tree and set operations.

/// Why a node could not be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// A [`Bounded`](crate::Bounded) policy refused to go past its limit.
    #[error("node limit of {limit} reached")]
    LimitReached {
        /// The most nodes the policy admits.
        limit: usize,
    },
    /// The tree already holds [`Tree::max_size`](crate::Tree::max_size) nodes.
    #[error("capacity overflow")]
    CapacityOverflow,
}

/// The error type for operations on a [`Tree`](crate::Tree) or [`Set`](crate::Set).
///
/// A duplicate insert is not an error: it is reported through the `bool` half
/// of the insert result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An element was requested from an empty collection.
    #[error("collection is empty")]
    Empty,
    /// The cursor is the end sentinel, was invalidated by an erase or clear, or
    /// belongs to another tree.
    #[error("cursor does not point at an element of this tree")]
    InvalidPosition,
    /// A node could not be allocated. The operation made no change for the
    /// element that failed.
    #[error("out of memory: {0}")]
    OutOfMemory(#[from] AllocError),
}
