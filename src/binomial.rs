//! Binomial Queue implementation
//!
//! A binomial queue is a forest of binomial trees with:
//! - O(log n) insert and remove_min
//! - O(log n) key changes once the entry is located
//! - O(log n) merge
//!
//! # Algorithm Overview
//!
//! The forest is a singly linked root list sorted by strictly increasing
//! degree, with at most one tree of each degree (like the binary
//! representation of n).
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes; the children of its root, first to last, are
//!   B_{k-1}, B_{k-2}, ..., B₀
//!
//! **Key Operations**:
//! - **Union**: merge both root lists by degree, then walk the merged list and
//!   link adjacent trees of equal degree (like carry propagation)
//! - **Insert**: union a single B₀ into the forest
//! - **Remove-min**: detach the minimum root, reverse its children into a
//!   root list of increasing degree, union it back
//! - **Decrease/Increase**: move the entry up or down its tree by swapping
//!   entries with the parent or the smallest child; the tree shape never
//!   changes
//!
//! Entries are located by vertex with a depth-first walk, which is O(n).
//!
//! # Collision check
//!
//! `insert` and both key changes refuse a new key that equals the *vertex* of
//! an existing entry (`V: PartialEq<K>`). Callers that want no such
//! collisions pick a vertex type whose `PartialEq<K>` never matches.

use std::cmp::Ordering;
use std::mem;

use crate::storage::{translate_opt, KeyMap, NodeArena, NodeKey, Relink};
use crate::traits::{Direction, InvariantViolation, MergeableQueue, QueueError, UpdateOutcome};

/// Internal node structure for the binomial queue
///
/// **Binomial Tree Structure**: a node of degree k has exactly k children,
/// stored through `child` and then `sibling` links in decreasing degree
/// order k-1, k-2, ..., 0. Root nodes use `sibling` for the root list.
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    vertex: V,
    /// Number of children. A binomial tree Bₖ has root degree k and 2ᵏ nodes
    degree: usize,
    /// Parent node (None if root)
    parent: Option<NodeKey>,
    /// First child, the one of highest degree (None if leaf)
    child: Option<NodeKey>,
    /// Next root in the root list, or next sibling in the parent's child list
    sibling: Option<NodeKey>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, vertex: V) -> Self {
        Node {
            key,
            vertex,
            degree: 0,
            parent: None,
            child: None,
            sibling: None,
        }
    }
}

impl<K, V> Relink for Node<K, V> {
    fn relink(&mut self, moved: &KeyMap) {
        self.parent = translate_opt(moved, self.parent);
        self.child = translate_opt(moved, self.child);
        self.sibling = translate_opt(moved, self.sibling);
    }
}

/// Binomial Queue
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::binomial::BinomialQueue;
/// use mergeable_heaps::MergeableQueue;
///
/// let mut queue = BinomialQueue::new();
/// queue.insert(50, 1).unwrap();
/// queue.insert(30, 2).unwrap();
/// queue.update(1, 10).unwrap();
/// assert_eq!(queue.peek_min_entry(), Some((&10, &1)));
/// ```
#[derive(Debug)]
pub struct BinomialQueue<K, V> {
    nodes: NodeArena<Node<K, V>>,
    /// First root of the root list (lowest degree)
    head: Option<NodeKey>,
}

impl<K: Ord, V: Eq + PartialEq<K>> Default for BinomialQueue<K, V> {
    fn default() -> Self {
        <Self as MergeableQueue<K, V>>::new()
    }
}

impl<K: Ord, V: Eq + PartialEq<K>> MergeableQueue<K, V> for BinomialQueue<K, V> {
    fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            head: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns a minimum-key entry
    ///
    /// **Time Complexity**: O(log n), a scan of the root list. Among equal
    /// keys the root seen first wins.
    fn peek_min_entry(&self) -> Option<(&K, &V)> {
        let (_, min) = self.min_root()?;
        let node = &self.nodes[min];
        Some((&node.key, &node.vertex))
    }

    /// Inserts a new entry
    ///
    /// **Time Complexity**: O(n) for the collision check, then O(log n) for
    /// the union of a single B₀ tree into the forest.
    fn insert(&mut self, key: K, vertex: V) -> Result<(), QueueError> {
        if self.vertex_collides(&key) {
            log::debug!("binomial insert rejected: key collides with an existing vertex");
            return Err(QueueError::DuplicateConflict);
        }

        let node = self.nodes.insert(Node::new(key, vertex));
        self.head = self.union(self.head, Some(node));
        self.audit();
        Ok(())
    }

    /// Removes and returns a minimum-key entry
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Find the minimum root and unlink it from the root list
    /// 2. Reverse its child list: children are stored by decreasing degree,
    ///    reversing yields a valid root list of increasing degree
    /// 3. Union the reversed children with the remaining forest
    fn remove_min(&mut self) -> Option<(K, V)> {
        let (prev, min) = self.min_root()?;

        let next = self.nodes[min].sibling.take();
        match prev {
            Some(p) => self.nodes[p].sibling = next,
            None => self.head = next,
        }

        let children = self.reverse_children(min);
        self.head = self.union(self.head, children);

        let node = self.nodes.remove(min)?;
        self.audit();
        Some((node.key, node.vertex))
    }

    /// Merges another queue into this one
    ///
    /// **Time Complexity**: O(log n) for the union, plus relocating the
    /// smaller queue's nodes into the larger queue's arena.
    fn merge(&mut self, mut other: Self) {
        if other.is_empty() {
            return;
        }
        if self.nodes.len() < other.nodes.len() {
            mem::swap(self, &mut other);
        }

        let moved = self.nodes.absorb(other.nodes);
        let other_head = translate_opt(&moved, other.head);
        self.head = self.union(self.head, other_head);
        self.audit();
    }

    fn contains(&self, vertex: &V) -> bool {
        self.find(|v| v == vertex).is_some()
    }

    /// Changes the key of the entry holding `vertex`
    ///
    /// A vertex that no entry holds is silently ignored
    /// ([`UpdateOutcome::Missing`]).
    fn update(&mut self, vertex: V, new_key: K) -> Result<UpdateOutcome, QueueError> {
        let Some(node) = self.find(|v| *v == vertex) else {
            return Ok(UpdateOutcome::Missing);
        };

        match new_key.cmp(&self.nodes[node].key) {
            Ordering::Less => self.decrease(node, new_key).map(|_| UpdateOutcome::Decreased),
            Ordering::Greater => self.increase(node, new_key).map(|_| UpdateOutcome::Increased),
            Ordering::Equal => {
                log::debug!("binomial update rejected: key unchanged");
                Err(QueueError::NoChange)
            }
        }
    }

    fn decrease_key(&mut self, vertex: &V, new_key: K) -> Result<(), QueueError> {
        let node = self
            .find(|v| v == vertex)
            .ok_or(QueueError::VertexNotFound)?;
        self.decrease(node, new_key)
    }

    fn increase_key(&mut self, vertex: &V, new_key: K) -> Result<(), QueueError> {
        let node = self
            .find(|v| v == vertex)
            .ok_or(QueueError::VertexNotFound)?;
        self.increase(node, new_key)
    }

    /// Checks root-list order, binomial shape, parent links and heap order
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut reachable = 0;
        let mut last_degree: Option<usize> = None;
        let mut pending: Vec<NodeKey> = Vec::new();

        let mut root = self.head;
        while let Some(r) = root {
            let node = &self.nodes[r];
            if node.parent.is_some() {
                return Err(InvariantViolation::ParentLink);
            }
            if let Some(last) = last_degree {
                match node.degree.cmp(&last) {
                    Ordering::Equal => return Err(InvariantViolation::DuplicateDegree(last)),
                    Ordering::Less => return Err(InvariantViolation::UnsortedRoots),
                    Ordering::Greater => {}
                }
            }
            last_degree = Some(node.degree);
            pending.push(r);
            root = node.sibling;
        }

        while let Some(at) = pending.pop() {
            reachable += 1;
            if reachable > self.nodes.len() {
                break;
            }
            let node = &self.nodes[at];

            // Children of a Bₖ root are B_{k-1}, ..., B₀ in that order
            let mut expected = node.degree;
            let mut child = node.child;
            while let Some(c) = child {
                let child_node = &self.nodes[c];
                if expected == 0 {
                    return Err(InvariantViolation::DegreeMismatch {
                        recorded: node.degree,
                        actual: node.degree + 1,
                    });
                }
                expected -= 1;
                if child_node.degree != expected {
                    return Err(InvariantViolation::NotBinomial {
                        expected,
                        found: child_node.degree,
                    });
                }
                if child_node.parent != Some(at) {
                    return Err(InvariantViolation::ParentLink);
                }
                if child_node.key < node.key {
                    return Err(InvariantViolation::HeapOrder);
                }
                pending.push(c);
                child = child_node.sibling;
            }
            if expected != 0 {
                return Err(InvariantViolation::DegreeMismatch {
                    recorded: node.degree,
                    actual: node.degree - expected,
                });
            }
        }

        if reachable != self.nodes.len() {
            return Err(InvariantViolation::CountMismatch {
                reachable,
                stored: self.nodes.len(),
            });
        }
        Ok(())
    }
}

impl<K: Ord, V: Eq + PartialEq<K>> BinomialQueue<K, V> {
    /// Releases every entry
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
    }

    /// Finds the minimum root and the root before it
    ///
    /// Returns `(previous root, minimum root)`; the first root seen with a
    /// strictly smaller key wins, so ties go to the lower degree.
    fn min_root(&self) -> Option<(Option<NodeKey>, NodeKey)> {
        let mut best = self.head?;
        let mut best_prev = None;

        let mut prev = best;
        let mut current = self.nodes[best].sibling;
        while let Some(c) = current {
            if self.nodes[c].key < self.nodes[best].key {
                best = c;
                best_prev = Some(prev);
            }
            prev = c;
            current = self.nodes[c].sibling;
        }

        Some((best_prev, best))
    }

    /// Depth-first search over every tree for the first vertex matching `pred`
    ///
    /// Uses an explicit stack: roots and siblings are visited in list order,
    /// each node's subtree before its next sibling.
    fn find<F>(&self, pred: F) -> Option<NodeKey>
    where
        F: Fn(&V) -> bool,
    {
        let mut stack: Vec<NodeKey> = self.head.into_iter().collect();

        while let Some(at) = stack.pop() {
            let node = &self.nodes[at];
            if pred(&node.vertex) {
                return Some(at);
            }
            if let Some(next) = node.sibling {
                stack.push(next);
            }
            if let Some(child) = node.child {
                stack.push(child);
            }
        }

        None
    }

    /// The existing-entry check: does any vertex equal `key`?
    fn vertex_collides(&self, key: &K) -> bool {
        self.find(|v| v == key).is_some()
    }

    /// Links two binomial trees of the same degree
    ///
    /// `child` becomes the first child of `root`; the result has degree+1.
    /// The caller has already unlinked `child` from the root list.
    fn link(&mut self, child: NodeKey, root: NodeKey) {
        let first = self.nodes[root].child;
        {
            let child_node = &mut self.nodes[child];
            child_node.parent = Some(root);
            child_node.sibling = first;
        }
        let root_node = &mut self.nodes[root];
        root_node.child = Some(child);
        root_node.degree += 1;
    }

    /// Merges two root lists by degree without linking any trees
    ///
    /// Two-pointer merge; on equal degrees the tree from `a` goes first.
    fn merge_root_lists(&mut self, a: Option<NodeKey>, b: Option<NodeKey>) -> Option<NodeKey> {
        let (mut a, mut b) = (a, b);
        let mut head = None;
        let mut tail: Option<NodeKey> = None;

        loop {
            let next = match (a, b) {
                (Some(x), Some(y)) => {
                    if self.nodes[x].degree <= self.nodes[y].degree {
                        a = self.nodes[x].sibling;
                        x
                    } else {
                        b = self.nodes[y].sibling;
                        y
                    }
                }
                (rest, None) | (None, rest) => {
                    match tail {
                        Some(t) => self.nodes[t].sibling = rest,
                        None => head = rest,
                    }
                    return head;
                }
            };

            match tail {
                Some(t) => self.nodes[t].sibling = Some(next),
                None => head = Some(next),
            }
            tail = Some(next);
        }
    }

    /// Unions two root lists into one with at most one tree per degree
    ///
    /// **Algorithm**: walk the degree-merged list with `(prev, curr, next)`:
    /// - different degrees, or three equal degrees in a row: advance, so the
    ///   last two of the run are linked and the carry stays in order
    /// - otherwise link `curr` and `next`, the smaller key becoming the parent
    ///   (the earlier tree on equal keys)
    fn union(&mut self, a: Option<NodeKey>, b: Option<NodeKey>) -> Option<NodeKey> {
        let mut head = self.merge_root_lists(a, b)?;

        let mut prev: Option<NodeKey> = None;
        let mut curr = head;
        let mut next = self.nodes[curr].sibling;

        while let Some(nx) = next {
            let after = self.nodes[nx].sibling;
            let degree = self.nodes[curr].degree;
            let triple = after.is_some_and(|t| self.nodes[t].degree == degree);

            if degree != self.nodes[nx].degree || triple {
                prev = Some(curr);
                curr = nx;
            } else if self.nodes[curr].key <= self.nodes[nx].key {
                self.nodes[curr].sibling = after;
                self.link(nx, curr);
            } else {
                match prev {
                    Some(p) => self.nodes[p].sibling = Some(nx),
                    None => head = nx,
                }
                self.link(curr, nx);
                curr = nx;
            }
            next = self.nodes[curr].sibling;
        }

        Some(head)
    }

    /// Detaches the children of `node` as a root list of increasing degree
    fn reverse_children(&mut self, node: NodeKey) -> Option<NodeKey> {
        let mut current = self.nodes[node].child.take();
        self.nodes[node].degree = 0;

        let mut reversed = None;
        while let Some(c) = current {
            let child = &mut self.nodes[c];
            current = child.sibling;
            child.sibling = reversed;
            child.parent = None;
            reversed = Some(c);
        }
        reversed
    }

    /// Swaps the entries (key and vertex) held by two nodes
    ///
    /// Node objects and links stay in place; only the payload moves.
    fn swap_entries(&mut self, a: NodeKey, b: NodeKey) {
        if let Some([x, y]) = self.nodes.pair_mut(a, b) {
            mem::swap(&mut x.key, &mut y.key);
            mem::swap(&mut x.vertex, &mut y.vertex);
        }
    }

    /// Lowers the key of `node` and bubbles the entry up
    ///
    /// **Time Complexity**: O(log n) once the node is located
    fn decrease(&mut self, node: NodeKey, new_key: K) -> Result<(), QueueError> {
        if new_key >= self.nodes[node].key {
            log::debug!("binomial decrease rejected: key not smaller");
            return Err(QueueError::DirectionMismatch(Direction::Decrease));
        }
        if self.vertex_collides(&new_key) {
            log::debug!("binomial decrease rejected: key collides with an existing vertex");
            return Err(QueueError::DuplicateConflict);
        }

        self.nodes[node].key = new_key;

        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            if self.nodes[current].key >= self.nodes[parent].key {
                break;
            }
            self.swap_entries(current, parent);
            current = parent;
        }

        self.audit();
        Ok(())
    }

    /// Raises the key of `node` and sifts the entry down
    ///
    /// At each step the entry is swapped with the smallest child (first seen
    /// on ties) while that child is smaller, then the walk continues from
    /// the child's position.
    ///
    /// **Time Complexity**: O(log² n) once the node is located: at most
    /// log n levels, each scanning at most log n children.
    fn increase(&mut self, node: NodeKey, new_key: K) -> Result<(), QueueError> {
        if new_key <= self.nodes[node].key {
            log::debug!("binomial increase rejected: key not larger");
            return Err(QueueError::DirectionMismatch(Direction::Increase));
        }
        if self.vertex_collides(&new_key) {
            log::debug!("binomial increase rejected: key collides with an existing vertex");
            return Err(QueueError::DuplicateConflict);
        }

        self.nodes[node].key = new_key;

        let mut current = node;
        while let Some(least) = self.least_child(current) {
            if self.nodes[least].key >= self.nodes[current].key {
                break;
            }
            self.swap_entries(current, least);
            current = least;
        }

        self.audit();
        Ok(())
    }

    /// The child of `node` with the smallest key, first seen on ties
    fn least_child(&self, node: NodeKey) -> Option<NodeKey> {
        let mut least = self.nodes[node].child?;
        let mut current = self.nodes[least].sibling;
        while let Some(c) = current {
            if self.nodes[c].key < self.nodes[least].key {
                least = c;
            }
            current = self.nodes[c].sibling;
        }
        Some(least)
    }

    #[inline]
    fn audit(&self) {
        #[cfg(feature = "strict-invariants")]
        if let Err(violation) = self.check_invariants() {
            panic!("binomial queue invariant broken: {violation}");
        }
    }
}
