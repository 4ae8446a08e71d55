//! Behavior specific to the binomial queue
//!
//! The existing-entry check compares a new key against the vertices already
//! stored, so these tests use `i32` vertices on purpose.

mod common;

use common::{drain, init_logging, Vertex};
use mergeable_heaps::{BinomialQueue, Direction, MergeableQueue, QueueError, UpdateOutcome};

#[test]
fn test_insert_rejects_key_equal_to_a_vertex() {
    init_logging();
    let mut queue: BinomialQueue<i32, i32> = BinomialQueue::new();

    queue.insert(5, 7).unwrap();
    assert_eq!(queue.insert(7, 9), Err(QueueError::DuplicateConflict));

    // Nothing was inserted
    assert_eq!(queue.len(), 1);
    assert!(!queue.contains(&9));
    assert_eq!(queue.check_invariants(), Ok(()));

    // A key that matches no stored vertex is accepted
    queue.insert(8, 9).unwrap();
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_key_changes_run_the_collision_check() {
    let mut queue: BinomialQueue<i32, i32> = BinomialQueue::new();
    queue.insert(100, 1).unwrap();
    queue.insert(200, 2).unwrap();
    queue.insert(300, 3).unwrap();
    queue.insert(50, 250).unwrap();

    assert_eq!(queue.update(3, 2), Err(QueueError::DuplicateConflict));
    assert_eq!(queue.decrease_key(&3, 1), Err(QueueError::DuplicateConflict));
    assert_eq!(queue.increase_key(&1, 250), Err(QueueError::DuplicateConflict));

    assert_eq!(
        drain(&mut queue),
        vec![(50, 250), (100, 1), (200, 2), (300, 3)]
    );
}

#[test]
fn test_direction_is_checked_before_collision() {
    let mut queue: BinomialQueue<i32, i32> = BinomialQueue::new();
    queue.insert(100, 1).unwrap();
    queue.insert(200, 2).unwrap();

    // 2 is a stored vertex, but it is not above 100
    assert_eq!(
        queue.increase_key(&1, 2),
        Err(QueueError::DirectionMismatch(Direction::Increase))
    );
}

#[test]
fn test_update_with_same_key_reports_no_change() {
    let mut queue: BinomialQueue<i32, i32> = BinomialQueue::new();
    queue.insert(500, 1).unwrap();

    assert_eq!(queue.update(1, 500), Err(QueueError::NoChange));
    assert_eq!(queue.peek_min_entry(), Some((&500, &1)));
}

#[test]
fn test_update_of_missing_vertex_changes_nothing() {
    let mut queue: BinomialQueue<i32, Vertex> = BinomialQueue::new();
    queue.insert(10, Vertex(0)).unwrap();

    assert_eq!(queue.update(Vertex(4), 1), Ok(UpdateOutcome::Missing));
    assert_eq!(queue.len(), 1);
    assert!(!queue.contains(&Vertex(4)));
    assert_eq!(queue.peek_min_entry(), Some((&10, &Vertex(0))));
}

#[test]
fn test_collision_with_string_keys() {
    let mut queue: BinomialQueue<String, String> = BinomialQueue::new();
    queue.insert("b".to_string(), "beta".to_string()).unwrap();
    queue.insert("a".to_string(), "alpha".to_string()).unwrap();

    assert_eq!(
        queue.insert("alpha".to_string(), "other".to_string()),
        Err(QueueError::DuplicateConflict)
    );
    assert_eq!(
        queue.remove_min(),
        Some(("a".to_string(), "alpha".to_string()))
    );
}

#[test]
fn test_equal_keys_extract_lower_degree_first() {
    let mut queue: BinomialQueue<i32, Vertex> = BinomialQueue::new();
    // Three entries: a B₀ and a B₁, both roots holding key 7
    queue.insert(7, Vertex(0)).unwrap();
    queue.insert(9, Vertex(1)).unwrap();
    queue.insert(7, Vertex(2)).unwrap();

    // The B₀ (the last insert) precedes the B₁ in the root list
    assert_eq!(queue.peek_min(), Some(&Vertex(2)));
}

#[test]
fn test_merge_relocates_either_side() {
    let mut big: BinomialQueue<i32, Vertex> = BinomialQueue::new();
    for i in 0..50 {
        big.insert(1000 + i as i32, Vertex(i)).unwrap();
    }
    let mut small: BinomialQueue<i32, Vertex> = BinomialQueue::new();
    for i in 50..53 {
        small.insert(1000 + i as i32, Vertex(i)).unwrap();
    }

    // The larger side receives the smaller side's nodes
    let mut left = small;
    left.merge(big);
    assert_eq!(left.len(), 53);
    assert_eq!(left.check_invariants(), Ok(()));

    left.decrease_key(&Vertex(52), 0).unwrap();
    assert_eq!(left.remove_min(), Some((0, Vertex(52))));

    let drained = drain(&mut left);
    assert_eq!(drained.len(), 52);
    assert!(drained.windows(2).all(|w| w[0].0 < w[1].0));
}

#[test]
fn test_root_degrees_after_many_merges() {
    let mut queue: BinomialQueue<i32, Vertex> = BinomialQueue::new();
    let mut next = 0usize;

    for size in [1usize, 2, 3, 5, 8, 13] {
        let mut other = BinomialQueue::new();
        for _ in 0..size {
            other.insert(next as i32, Vertex(next)).unwrap();
            next += 1;
        }
        queue.merge(other);
        assert_eq!(queue.check_invariants(), Ok(()));
    }

    assert_eq!(queue.len(), 32);
    assert_eq!(queue.peek_min_entry(), Some((&0, &Vertex(0))));
}

#[test]
fn test_clear_releases_everything() {
    let mut queue: BinomialQueue<i32, Vertex> = BinomialQueue::new();
    for i in 0..10 {
        queue.insert(i as i32, Vertex(i)).unwrap();
    }

    queue.clear();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.check_invariants(), Ok(()));

    queue.insert(3, Vertex(3)).unwrap();
    assert_eq!(queue.remove_min(), Some((3, Vertex(3))));
}

#[test]
fn test_default_is_empty() {
    let queue: BinomialQueue<i32, Vertex> = BinomialQueue::default();
    assert!(queue.is_empty());
}
