//! Common contract for the mergeable queue engines
//!
//! Both engines store `(key, vertex)` entries: the key is the priority and the
//! vertex is an opaque identity chosen by the caller (typically a graph vertex
//! in a shortest-path search). Operations that change a priority name the
//! entry by its vertex, so no handle ever leaves an engine.
//!
//! - [`MergeableQueue`]: the shared operations, written once in generic code
//! - [`QueueError`]: faults raised synchronously by mutating operations
//! - [`UpdateOutcome`]: which branch a vertex-keyed update took
//! - [`InvariantViolation`]: the first broken structural invariant found by
//!   [`MergeableQueue::check_invariants`]

use std::fmt;

use thiserror::Error;

/// Direction of a key change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decrease,
    Increase,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decrease => write!(f, "decrease"),
            Direction::Increase => write!(f, "increase"),
        }
    }
}

/// Error type for queue operations
///
/// Validation always happens before mutation, so a returned error means the
/// queue was left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The new entry collides with an existing one under the engine's check
    #[error("an existing entry collides with the requested key")]
    DuplicateConflict,
    /// `update` was called with the key the entry already has
    #[error("new key equals the current key, nothing to update")]
    NoChange,
    /// A decrease with a non-smaller key, or an increase with a non-larger key
    #[error("new key does not {0} the current key")]
    DirectionMismatch(Direction),
    /// A directional key change named a vertex that no entry holds
    #[error("no entry holds the requested vertex")]
    VertexNotFound,
}

/// What a successful vertex-keyed `update` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The entry's key went down
    Decreased,
    /// The entry's key went up
    Increased,
    /// No entry held the vertex, so a new one was inserted
    Inserted,
    /// No entry held the vertex and nothing changed
    Missing,
}

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("a child is ordered before its parent")]
    HeapOrder,
    #[error("two root trees share degree {0}")]
    DuplicateDegree(usize),
    #[error("root list is not sorted by increasing degree")]
    UnsortedRoots,
    #[error("tree is not binomial: expected a child of degree {expected}, found {found}")]
    NotBinomial { expected: usize, found: usize },
    #[error("ring is malformed: {0}")]
    BrokenRing(String),
    #[error("degree {recorded} does not match the {actual} children found")]
    DegreeMismatch { recorded: usize, actual: usize },
    #[error("a node does not point back at its parent")]
    ParentLink,
    #[error("a root node is marked")]
    MarkedRoot,
    #[error("the minimum does not designate a smallest root")]
    StaleMinimum,
    #[error("reached {reachable} nodes but the queue holds {stored}")]
    CountMismatch { reachable: usize, stored: usize },
}

/// Base trait for mergeable priority queues keyed by vertex
///
/// Keys are totally ordered; the minimum key is extracted first. Vertices are
/// compared for identity only.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{FibonacciHeap, MergeableQueue, UpdateOutcome};
///
/// let mut queue = FibonacciHeap::new();
/// queue.insert(10, "a").unwrap();
/// queue.insert(20, "b").unwrap();
///
/// assert_eq!(queue.update("b", 5), Ok(UpdateOutcome::Decreased));
/// assert_eq!(queue.peek_min(), Some(&"b"));
/// assert_eq!(queue.remove_min(), Some((5, "b")));
/// ```
pub trait MergeableQueue<K: Ord, V: Eq> {
    /// Creates a new empty queue
    fn new() -> Self
    where
        Self: Sized;

    /// Returns true if the queue holds no entries
    fn is_empty(&self) -> bool;

    /// Returns the number of entries
    fn len(&self) -> usize;

    /// Returns the vertex of a minimum-key entry, or `None` when empty
    fn peek_min<'a>(&'a self) -> Option<&'a V>
    where
        K: 'a,
    {
        self.peek_min_entry().map(|(_, vertex)| vertex)
    }

    /// Returns a minimum-key entry without removing it
    fn peek_min_entry(&self) -> Option<(&K, &V)>;

    /// Inserts an entry
    ///
    /// # Errors
    /// Returns [`QueueError::DuplicateConflict`] if the engine's
    /// existing-entry check rejects the key.
    fn insert(&mut self, key: K, vertex: V) -> Result<(), QueueError>;

    /// Removes and returns a minimum-key entry
    ///
    /// Does nothing and returns `None` when the queue is empty.
    fn remove_min(&mut self) -> Option<(K, V)>;

    /// Moves every entry of `other` into this queue, consuming `other`
    fn merge(&mut self, other: Self)
    where
        Self: Sized;

    /// Returns true if some entry holds `vertex`
    ///
    /// # Time Complexity
    /// O(n): a depth-first walk over every tree.
    fn contains(&self, vertex: &V) -> bool;

    /// Moves the entry holding `vertex` to `new_key`, up or down
    ///
    /// What happens when no entry holds `vertex` is engine specific and
    /// reported through [`UpdateOutcome`]: the vertex is taken by value so an
    /// engine may insert it.
    ///
    /// # Errors
    /// - [`QueueError::NoChange`] if `new_key` equals the current key
    /// - [`QueueError::DuplicateConflict`] if the engine's collision check fails
    fn update(&mut self, vertex: V, new_key: K) -> Result<UpdateOutcome, QueueError>;

    /// Lowers the key of the entry holding `vertex`
    ///
    /// # Errors
    /// - [`QueueError::VertexNotFound`] if no entry holds `vertex`
    /// - [`QueueError::DirectionMismatch`] if `new_key` is not smaller
    fn decrease_key(&mut self, vertex: &V, new_key: K) -> Result<(), QueueError>;

    /// Raises the key of the entry holding `vertex`
    ///
    /// # Errors
    /// - [`QueueError::VertexNotFound`] if no entry holds `vertex`
    /// - [`QueueError::DirectionMismatch`] if `new_key` is not larger
    fn increase_key(&mut self, vertex: &V, new_key: K) -> Result<(), QueueError>;

    /// Walks the whole structure and reports the first broken invariant
    ///
    /// # Time Complexity
    /// O(n)
    fn check_invariants(&self) -> Result<(), InvariantViolation>;
}
