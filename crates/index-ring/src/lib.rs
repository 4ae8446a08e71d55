//! Intrusive circular doubly-linked rings over arena indices.
//!
//! The links live inside the nodes (`left`/`right` fields of whatever node
//! type the arena stores) and are plain indices, so a ring is just a view of
//! the arena through the [`RingLinks`] trait. No node is owned by a ring.
//!
//! # Circular vs Linear Lists
//!
//! In a circular ring:
//! - A single node points to itself (both `left` and `right`)
//! - There is no head or tail - any node can be the entry point
//! - Splicing two rings together is O(1)
//! - Iteration wraps around (the starting point must be tracked)
//!
//! This is the shape Fibonacci heaps need: the roots form one ring, and the
//! children of every node form another.
//!
//! # Example
//!
//! ```rust
//! use index_ring::{RingLinks, RingOps};
//!
//! struct Links(Vec<(usize, usize)>);
//!
//! impl RingLinks for Links {
//!     type Index = usize;
//!     fn left(&self, at: usize) -> usize { self.0[at].0 }
//!     fn right(&self, at: usize) -> usize { self.0[at].1 }
//!     fn set_left(&mut self, at: usize, to: usize) { self.0[at].0 = to }
//!     fn set_right(&mut self, at: usize, to: usize) { self.0[at].1 = to }
//! }
//!
//! let mut links = Links(vec![(0, 0); 3]);
//! let ops = RingOps;
//! ops.make_circular(&mut links, 0);
//! ops.insert_before(&mut links, 0, 1);
//! ops.insert_before(&mut links, 0, 2);
//!
//! assert_eq!(ops.count(&links, 0), 3);
//! assert_eq!(links.right(0), 1);
//! assert_eq!(links.left(0), 2);
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

use core::fmt;

// =============================================================================
// RingLinks
// =============================================================================

/// Access to the `left`/`right` links stored inside arena nodes.
///
/// Implemented by the arena (or a wrapper around it). Every index handed to
/// these methods must refer to a live node.
pub trait RingLinks {
    /// Stable node index used as a link.
    type Index: Copy + Eq + fmt::Debug;

    /// Returns the node before `at` in its ring.
    fn left(&self, at: Self::Index) -> Self::Index;

    /// Returns the node after `at` in its ring.
    fn right(&self, at: Self::Index) -> Self::Index;

    /// Sets the node before `at`.
    fn set_left(&mut self, at: Self::Index, to: Self::Index);

    /// Sets the node after `at`.
    fn set_right(&mut self, at: Self::Index, to: Self::Index);
}

// =============================================================================
// RingError
// =============================================================================

/// A structural defect found by [`RingOps::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError<I> {
    /// `right(left(at)) != at` or `left(right(at)) != at`.
    BrokenLink(I),
    /// Walking `right` did not return to the start within the step limit.
    Unterminated,
}

impl<I: fmt::Debug> fmt::Display for RingError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::BrokenLink(at) => {
                write!(f, "left/right links are not mutual inverses at {at:?}")
            }
            RingError::Unterminated => write!(f, "ring does not close within its step limit"),
        }
    }
}

// =============================================================================
// RingOps
// =============================================================================

/// Operations for manipulating circular doubly-linked rings.
///
/// All operations except [`count`](RingOps::count),
/// [`for_each`](RingOps::for_each) and [`validate`](RingOps::validate) are O(1).
///
/// The caller must maintain the ring invariants: nodes passed for insertion
/// are not part of another ring with more than one member, and rings passed
/// to [`splice`](RingOps::splice) are disjoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct RingOps;

impl RingOps {
    /// Makes a single node into a ring of one element.
    ///
    /// After this, `left(at) == at` and `right(at) == at`.
    #[inline]
    pub fn make_circular<R: RingLinks>(&self, links: &mut R, at: R::Index) {
        links.set_left(at, at);
        links.set_right(at, at);
    }

    /// Inserts `new` before `at`.
    #[inline]
    pub fn insert_before<R: RingLinks>(&self, links: &mut R, at: R::Index, new: R::Index) {
        let prev = links.left(at);

        links.set_left(at, new);
        links.set_right(new, at);
        links.set_left(new, prev);
        links.set_right(prev, new);
    }

    /// Removes `at` from its ring and leaves it as a ring of one.
    ///
    /// Returns the node that followed `at`, or `None` if `at` was the only
    /// member (the ring is now empty).
    #[inline]
    pub fn remove<R: RingLinks>(&self, links: &mut R, at: R::Index) -> Option<R::Index> {
        let next = links.right(at);
        if next == at {
            return None;
        }
        let prev = links.left(at);

        links.set_right(prev, next);
        links.set_left(next, prev);
        self.make_circular(links, at);
        Some(next)
    }

    /// Splices two disjoint rings together.
    ///
    /// Returns an entry point into the merged ring, or `None` if both were
    /// empty. If either is `None`, returns the other.
    ///
    /// The ring of `b` ends up just before `a`:
    ///
    /// ```text
    /// Before:
    ///   Ring A: ... <-> a_prev <-> a <-> a_next <-> ...
    ///   Ring B: ... <-> b_prev <-> b <-> b_next <-> ...
    ///
    /// After:
    ///   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> a_next <-> ...
    /// ```
    #[inline]
    pub fn splice<R: RingLinks>(
        &self,
        links: &mut R,
        a: Option<R::Index>,
        b: Option<R::Index>,
    ) -> Option<R::Index> {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                let a_prev = links.left(a);
                let b_prev = links.left(b);

                links.set_right(a_prev, b);
                links.set_left(b, a_prev);

                links.set_right(b_prev, a);
                links.set_left(a, b_prev);

                Some(a)
            }
        }
    }

    /// Counts the members of the ring containing `start`.
    ///
    /// This is O(n) - use sparingly.
    pub fn count<R: RingLinks>(&self, links: &R, start: R::Index) -> usize {
        let mut count = 1;
        let mut current = links.right(start);

        while current != start {
            count += 1;
            current = links.right(current);
        }

        count
    }

    /// Calls `f` for every member of the ring, starting at `start` and
    /// following `right` links.
    ///
    /// The callback only sees indices, so it cannot change the ring while it
    /// is being walked.
    pub fn for_each<R, F>(&self, links: &R, start: R::Index, mut f: F)
    where
        R: RingLinks,
        F: FnMut(R::Index),
    {
        f(start);
        let mut current = links.right(start);

        while current != start {
            f(current);
            current = links.right(current);
        }
    }

    /// Checks that the ring containing `start` is well formed and returns
    /// its length.
    ///
    /// Every visited node must satisfy `left(right(x)) == x` and
    /// `right(left(x)) == x`, and walking `right` must come back to `start`
    /// in at most `limit` steps.
    pub fn validate<R: RingLinks>(
        &self,
        links: &R,
        start: R::Index,
        limit: usize,
    ) -> Result<usize, RingError<R::Index>> {
        let mut current = start;
        let mut steps = 0;

        loop {
            let right = links.right(current);
            let left = links.left(current);
            if links.left(right) != current || links.right(left) != current {
                return Err(RingError::BrokenLink(current));
            }
            steps += 1;
            if right == start {
                return Ok(steps);
            }
            if steps >= limit {
                return Err(RingError::Unterminated);
            }
            current = right;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    /// Ring links stored side by side in a vector, indexed by position.
    struct Table {
        links: Vec<(usize, usize)>,
    }

    impl Table {
        fn new(n: usize) -> Self {
            Table {
                links: (0..n).map(|i| (i, i)).collect(),
            }
        }
    }

    impl RingLinks for Table {
        type Index = usize;

        fn left(&self, at: usize) -> usize {
            self.links[at].0
        }

        fn right(&self, at: usize) -> usize {
            self.links[at].1
        }

        fn set_left(&mut self, at: usize, to: usize) {
            self.links[at].0 = to;
        }

        fn set_right(&mut self, at: usize, to: usize) {
            self.links[at].1 = to;
        }
    }

    fn walk(table: &Table, start: usize) -> Vec<usize> {
        let mut visited = Vec::new();
        RingOps.for_each(table, start, |at| visited.push(at));
        visited
    }

    #[test]
    fn test_make_circular_single() {
        let mut table = Table::new(1);
        RingOps.make_circular(&mut table, 0);

        assert_eq!(table.left(0), 0);
        assert_eq!(table.right(0), 0);
    }

    #[test]
    fn test_insert_before_keeps_order() {
        let mut table = Table::new(4);
        let ops = RingOps;

        ops.insert_before(&mut table, 0, 1);
        ops.insert_before(&mut table, 0, 2);
        ops.insert_before(&mut table, 0, 3);

        // Inserting before the entry point appends at the "tail"
        assert_eq!(walk(&table, 0), vec![0, 1, 2, 3]);
        assert_eq!(ops.validate(&table, 0, 4), Ok(4));
    }

    #[test]
    fn test_remove_single() {
        let mut table = Table::new(1);

        assert_eq!(RingOps.remove(&mut table, 0), None);
        assert_eq!(table.right(0), 0);
    }

    #[test]
    fn test_remove_middle() {
        let mut table = Table::new(3);
        let ops = RingOps;

        ops.insert_before(&mut table, 0, 1);
        ops.insert_before(&mut table, 0, 2);

        assert_eq!(ops.remove(&mut table, 1), Some(2));
        assert_eq!((table.left(1), table.right(1)), (1, 1));

        // 0 <-> 2 <-> 0
        assert_eq!(walk(&table, 0), vec![0, 2]);
        assert_eq!(ops.validate(&table, 0, 3), Ok(2));
    }

    #[test]
    fn test_splice_empty_sides() {
        let mut table = Table::new(1);
        let ops = RingOps;

        assert_eq!(ops.splice(&mut table, None, None), None);
        assert_eq!(ops.splice(&mut table, Some(0), None), Some(0));
        assert_eq!(ops.splice(&mut table, None, Some(0)), Some(0));
        assert_eq!(table.right(0), 0);
    }

    #[test]
    fn test_splice_two_pairs() {
        let mut table = Table::new(4);
        let ops = RingOps;

        ops.insert_before(&mut table, 0, 1);
        ops.insert_before(&mut table, 2, 3);

        assert_eq!(ops.splice(&mut table, Some(0), Some(2)), Some(0));

        // Ring of 2 lands just before 0
        assert_eq!(walk(&table, 0), vec![0, 1, 2, 3]);
        assert_eq!(ops.count(&table, 3), 4);
        assert_eq!(ops.validate(&table, 2, 4), Ok(4));
    }

    #[test]
    fn test_validate_detects_broken_link() {
        let mut table = Table::new(3);
        let ops = RingOps;

        ops.insert_before(&mut table, 0, 1);
        ops.insert_before(&mut table, 0, 2);
        table.set_left(2, 0);

        assert!(matches!(
            ops.validate(&table, 0, 3),
            Err(RingError::BrokenLink(_))
        ));
    }

    #[test]
    fn test_validate_detects_runaway_walk() {
        let mut table = Table::new(3);
        let ops = RingOps;

        ops.insert_before(&mut table, 0, 1);
        ops.insert_before(&mut table, 0, 2);

        assert_eq!(ops.validate(&table, 0, 2), Err(RingError::Unterminated));
    }
}
