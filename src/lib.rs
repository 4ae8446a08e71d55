//! Mergeable priority queues keyed by vertex
//!
//! This crate provides two interchangeable priority queue engines with
//! key updates addressed by an opaque identity (the "vertex"), the building
//! block of priority-driven graph searches such as Dijkstra's algorithm.
//!
//! # Engines
//!
//! - **Binomial Queue**: O(log n) insert, remove_min and merge; eager
//!   consolidation keeps at most one tree per degree after every call
//! - **Fibonacci Heap**: O(1) amortized insert, decrease_key and merge;
//!   O(log n) amortized remove_min, with lazy consolidation and cascading cuts
//!
//! Both implement [`MergeableQueue`]. Locating an entry by vertex is a
//! depth-first walk, so keyed operations pay O(n) before their own cost.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::{FibonacciHeap, MergeableQueue};
//!
//! let mut heap = FibonacciHeap::new();
//! heap.insert(5, "item1").unwrap();
//! heap.insert(3, "item2").unwrap();
//! heap.decrease_key(&"item1", 1).unwrap();
//! assert_eq!(heap.peek_min_entry(), Some((&1, &"item1")));
//!
//! let mut other = FibonacciHeap::new();
//! other.insert(0, "item3").unwrap();
//! heap.merge(other);
//! assert_eq!(heap.remove_min(), Some((0, "item3")));
//! assert_eq!(heap.len(), 2);
//! ```
//!
//! # Features
//!
//! - `strict-invariants`: run [`MergeableQueue::check_invariants`] after every
//!   mutating operation and panic on the first violation

pub mod binomial;
pub mod fibonacci;
mod storage;
pub mod traits;

pub use binomial::BinomialQueue;
pub use fibonacci::FibonacciHeap;
pub use traits::{Direction, InvariantViolation, MergeableQueue, QueueError, UpdateOutcome};
