//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized remove_min and increase_key
//!
//! The structure consists of a collection of heap-ordered trees. Roots are
//! linked in a circular doubly linked ring, and so are the children of every
//! node. The heap maintains the minimum root.
//!
//! Rings are intrusive: the `left`/`right` links are arena keys stored in the
//! nodes and manipulated through [`index_ring::RingOps`].
//!
//! **Key Operations**:
//! - **Insert**: splice a one-node ring into the root ring
//! - **Merge**: concatenate the two root rings
//! - **Remove-min**: move the minimum's children to the root ring, drop the
//!   minimum, then consolidate so at most one root of each degree remains
//! - **Decrease-key**: cut the node if it now beats its parent, then cascade
//!   cuts up through ancestors that had already lost a child (marked)
//! - **Increase-key**: move all of the node's children to the root ring, then
//!   cut the node itself the same way

use std::cmp::Ordering;
use std::mem;
use std::ops::Sub;

use index_ring::{RingLinks, RingOps};
use num_traits::One;

use crate::storage::{translate, translate_opt, KeyMap, NodeArena, NodeKey, Relink};
use crate::traits::{Direction, InvariantViolation, MergeableQueue, QueueError, UpdateOutcome};

/// ln(φ), φ = (1 + √5) / 2
const LN_PHI: f64 = 0.481_211_825_059_603_4;

/// Upper bound on the degree of any root after consolidating `n` nodes
///
/// ⌈log_φ(n)⌉ + 1, plus one slot for the carry of a link at the top degree.
fn degree_slots(n: usize) -> usize {
    if n < 2 {
        return 2;
    }
    ((n as f64).ln() / LN_PHI).ceil() as usize + 2
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    vertex: V,
    /// Length of the child ring
    degree: usize,
    /// Lost a child since it last became a non-root
    marked: bool,
    parent: Option<NodeKey>,
    /// Entry point into the child ring
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
}

impl<K, V> Node<K, V> {
    /// A node forming a ring of one with itself
    fn singleton(key: K, vertex: V, at: NodeKey) -> Self {
        Node {
            key,
            vertex,
            degree: 0,
            marked: false,
            parent: None,
            child: None,
            left: at,
            right: at,
        }
    }
}

impl<K, V> Relink for Node<K, V> {
    fn relink(&mut self, moved: &KeyMap) {
        self.parent = translate_opt(moved, self.parent);
        self.child = translate_opt(moved, self.child);
        self.left = translate(moved, self.left);
        self.right = translate(moved, self.right);
    }
}

impl<K, V> RingLinks for NodeArena<Node<K, V>> {
    type Index = NodeKey;

    #[inline]
    fn left(&self, at: NodeKey) -> NodeKey {
        self[at].left
    }

    #[inline]
    fn right(&self, at: NodeKey) -> NodeKey {
        self[at].right
    }

    #[inline]
    fn set_left(&mut self, at: NodeKey, to: NodeKey) {
        self[at].left = to;
    }

    #[inline]
    fn set_right(&mut self, at: NodeKey, to: NodeKey) {
        self[at].right = to;
    }
}

const RING: RingOps = RingOps;

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
/// use mergeable_heaps::MergeableQueue;
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert(5, "item").unwrap();
/// heap.decrease_key(&"item", 1).unwrap();
/// assert_eq!(heap.peek_min_entry(), Some((&1, &"item")));
/// ```
#[derive(Debug)]
pub struct FibonacciHeap<K, V> {
    nodes: NodeArena<Node<K, V>>,
    /// A root of globally minimal key; None iff empty
    min: Option<NodeKey>,
    /// Degree-indexed scratch buffer reused by every consolidation
    slots: Vec<Option<NodeKey>>,
}

impl<K: Ord, V: Eq> Default for FibonacciHeap<K, V> {
    fn default() -> Self {
        <Self as MergeableQueue<K, V>>::new()
    }
}

impl<K: Ord, V: Eq> MergeableQueue<K, V> for FibonacciHeap<K, V> {
    fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            min: None,
            slots: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn peek_min_entry(&self) -> Option<(&K, &V)> {
        self.min.map(|min| {
            let node = &self.nodes[min];
            (&node.key, &node.vertex)
        })
    }

    /// Inserts a one-node tree into the root ring
    ///
    /// **Time Complexity**: O(1). Never fails: this engine has no
    /// existing-entry check.
    fn insert(&mut self, key: K, vertex: V) -> Result<(), QueueError> {
        self.push(key, vertex);
        Ok(())
    }

    /// Removes and returns the minimum
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// **Algorithm**:
    /// 1. Splice the minimum's child ring into the root ring
    /// 2. Unlink the minimum from the root ring
    /// 3. Consolidate the remaining roots (if any)
    fn remove_min(&mut self) -> Option<(K, V)> {
        let min = self.min?;

        if let Some(child) = self.nodes[min].child.take() {
            self.release_children(child);
            RING.splice(&mut self.nodes, Some(min), Some(child));
        }
        self.nodes[min].degree = 0;

        self.min = RING.remove(&mut self.nodes, min);
        if self.min.is_some() {
            self.consolidate();
        }

        let node = self.nodes.remove(min)?;
        self.audit();
        Some((node.key, node.vertex))
    }

    /// Concatenates the root rings
    ///
    /// **Time Complexity**: O(1) ring work, plus relocating the smaller
    /// heap's nodes into the larger heap's arena.
    fn merge(&mut self, mut other: Self) {
        if other.is_empty() {
            return;
        }
        if self.nodes.len() < other.nodes.len() {
            mem::swap(self, &mut other);
        }

        let moved = self.nodes.absorb(other.nodes);
        let other_min = translate_opt(&moved, other.min);

        self.min = match (self.min, other_min) {
            (Some(mine), Some(theirs)) => {
                RING.splice(&mut self.nodes, Some(mine), Some(theirs));
                if self.nodes[theirs].key < self.nodes[mine].key {
                    Some(theirs)
                } else {
                    Some(mine)
                }
            }
            (mine, theirs) => mine.or(theirs),
        };
        self.audit();
    }

    fn contains(&self, vertex: &V) -> bool {
        self.search(vertex).is_some()
    }

    /// Changes the key of the entry holding `vertex`
    ///
    /// If no entry holds `vertex`, a new entry is inserted with `new_key`
    /// ([`UpdateOutcome::Inserted`]) instead of failing.
    fn update(&mut self, vertex: V, new_key: K) -> Result<UpdateOutcome, QueueError> {
        match self.search(&vertex) {
            Some(node) => self.update_node(node, new_key),
            None => {
                self.push(new_key, vertex);
                Ok(UpdateOutcome::Inserted)
            }
        }
    }

    fn decrease_key(&mut self, vertex: &V, new_key: K) -> Result<(), QueueError> {
        let node = self.search(vertex).ok_or(QueueError::VertexNotFound)?;
        self.decrease(node, new_key)
    }

    fn increase_key(&mut self, vertex: &V, new_key: K) -> Result<(), QueueError> {
        let node = self.search(vertex).ok_or(QueueError::VertexNotFound)?;
        self.increase(node, new_key)
    }

    /// Checks every ring, parent link, degree, mark and the heap order
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(min) = self.min else {
            return match self.nodes.len() {
                0 => Ok(()),
                stored => Err(InvariantViolation::CountMismatch {
                    reachable: 0,
                    stored,
                }),
            };
        };

        let limit = self.nodes.len();
        let mut reachable = 0;

        let mut roots = Vec::new();
        self.validate_ring(min, limit)?;
        RING.for_each(&self.nodes, min, |root| roots.push(root));
        for &root in &roots {
            let node = &self.nodes[root];
            if node.parent.is_some() {
                return Err(InvariantViolation::ParentLink);
            }
            if node.marked {
                return Err(InvariantViolation::MarkedRoot);
            }
            if node.key < self.nodes[min].key {
                return Err(InvariantViolation::StaleMinimum);
            }
        }

        let mut pending = roots;
        while let Some(at) = pending.pop() {
            reachable += 1;
            if reachable > limit {
                break;
            }
            let node = &self.nodes[at];
            let Some(child) = node.child else {
                if node.degree != 0 {
                    return Err(InvariantViolation::DegreeMismatch {
                        recorded: node.degree,
                        actual: 0,
                    });
                }
                continue;
            };

            let actual = self.validate_ring(child, limit)?;
            if actual != node.degree {
                return Err(InvariantViolation::DegreeMismatch {
                    recorded: node.degree,
                    actual,
                });
            }

            let mut broken = None;
            RING.for_each(&self.nodes, child, |c| {
                let child_node = &self.nodes[c];
                if broken.is_none() {
                    if child_node.parent != Some(at) {
                        broken = Some(InvariantViolation::ParentLink);
                    } else if child_node.key < node.key {
                        broken = Some(InvariantViolation::HeapOrder);
                    }
                }
                pending.push(c);
            });
            if let Some(violation) = broken {
                return Err(violation);
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

impl<K: Ord, V: Eq> FibonacciHeap<K, V> {
    /// Inserts an entry; the infallible form of `insert`
    ///
    /// **Time Complexity**: O(1)
    pub fn push(&mut self, key: K, vertex: V) {
        let node = self
            .nodes
            .insert_with_key(|at| Node::singleton(key, vertex, at));
        self.add_root(node);
        self.audit();
    }

    /// Releases every entry and the consolidation buffer
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
        self.slots = Vec::new();
    }

    /// Dispatches to decrease or increase by comparing keys
    fn update_node(&mut self, node: NodeKey, new_key: K) -> Result<UpdateOutcome, QueueError> {
        match new_key.cmp(&self.nodes[node].key) {
            Ordering::Less => self.decrease(node, new_key).map(|_| UpdateOutcome::Decreased),
            Ordering::Greater => self.increase(node, new_key).map(|_| UpdateOutcome::Increased),
            Ordering::Equal => {
                log::debug!("fibonacci update rejected: key unchanged");
                Err(QueueError::NoChange)
            }
        }
    }

    /// Finds the node holding `vertex`
    ///
    /// Walks the root ring once; each node's child ring is searched before
    /// moving on to the node's right sibling. Uses an explicit stack of ring
    /// cursors `(entry point, current)` instead of recursion.
    ///
    /// **Time Complexity**: O(n)
    fn search(&self, vertex: &V) -> Option<NodeKey> {
        let start = self.min?;
        let mut stack = vec![(start, start)];

        while let Some((entry, at)) = stack.pop() {
            let node = &self.nodes[at];
            if node.vertex == *vertex {
                return Some(at);
            }
            if node.right != entry {
                stack.push((entry, node.right));
            }
            if let Some(child) = node.child {
                stack.push((child, child));
            }
        }

        None
    }

    /// Puts a detached one-node ring into the root ring and updates the minimum
    fn add_root(&mut self, node: NodeKey) {
        match self.min {
            Some(min) => {
                RING.insert_before(&mut self.nodes, min, node);
                if self.nodes[node].key < self.nodes[min].key {
                    self.min = Some(node);
                }
            }
            None => {
                RING.make_circular(&mut self.nodes, node);
                self.min = Some(node);
            }
        }
    }

    /// Clears the parent link and mark of every node in a child ring that is
    /// about to join the root ring
    fn release_children(&mut self, child: NodeKey) {
        let mut at = child;
        loop {
            let node = &mut self.nodes[at];
            node.parent = None;
            node.marked = false;
            at = node.right;
            if at == child {
                break;
            }
        }
    }

    /// Makes `child` a child of `root`; both are roots of equal degree and
    /// `child` is already out of the root ring
    fn link(&mut self, child: NodeKey, root: NodeKey) {
        match self.nodes[root].child {
            Some(first) => RING.insert_before(&mut self.nodes, first, child),
            None => {
                RING.make_circular(&mut self.nodes, child);
                self.nodes[root].child = Some(child);
            }
        }

        let child_node = &mut self.nodes[child];
        child_node.parent = Some(root);
        child_node.marked = false;
        self.nodes[root].degree += 1;
    }

    /// Links roots of equal degree until every degree is unique
    ///
    /// **Algorithm**:
    /// 1. Size the scratch buffer to the degree bound for the current size
    /// 2. Drain the root ring one tree at a time; while the slot for the
    ///    tree's degree d is taken, link the larger-key root under the
    ///    smaller-key root and carry the result to d+1
    /// 3. Rebuild the root ring from the occupied slots and find the minimum
    ///
    /// **Time Complexity**: O(roots + log n)
    fn consolidate(&mut self) {
        let mut slots = mem::take(&mut self.slots);
        slots.clear();
        slots.resize(degree_slots(self.nodes.len()), None);

        let mut drained = 0usize;
        while let Some(first) = self.min {
            self.min = RING.remove(&mut self.nodes, first);
            drained += 1;

            let mut tree = first;
            let mut degree = self.nodes[tree].degree;
            loop {
                if degree >= slots.len() {
                    slots.resize(degree + 1, None);
                }
                let Some(mut other) = slots[degree].take() else {
                    slots[degree] = Some(tree);
                    break;
                };
                if self.nodes[other].key < self.nodes[tree].key {
                    mem::swap(&mut tree, &mut other);
                }
                self.link(other, tree);
                degree += 1;
            }
        }

        let mut survivors = 0usize;
        for root in slots.iter_mut().filter_map(Option::take) {
            self.add_root(root);
            survivors += 1;
        }
        log::trace!(
            "consolidated {} roots into {} over {} slots",
            drained,
            survivors,
            slots.len()
        );
        self.slots = slots;
    }

    /// Moves `node` out of its parent's child ring into the root ring
    fn cut(&mut self, node: NodeKey, parent: NodeKey) {
        let rest = RING.remove(&mut self.nodes, node);
        let parent_node = &mut self.nodes[parent];
        if parent_node.child == Some(node) {
            parent_node.child = rest;
        }
        parent_node.degree -= 1;

        let node_ref = &mut self.nodes[node];
        node_ref.parent = None;
        node_ref.marked = false;

        // The minimum never changes here: callers compare keys afterwards
        if let Some(min) = self.min {
            RING.insert_before(&mut self.nodes, min, node);
        }
    }

    /// Walks up from `node`, cutting marked ancestors, until an unmarked one
    /// is found and marked. Roots are never marked.
    fn cascading_cut(&mut self, node: NodeKey) {
        let mut current = node;
        let mut cuts = 0usize;

        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[current].marked {
                self.nodes[current].marked = true;
                break;
            }
            self.cut(current, parent);
            cuts += 1;
            current = parent;
        }

        if cuts > 0 {
            log::trace!("cascading cut detached {} ancestors", cuts);
        }
    }

    /// Lowers the key of `node`
    ///
    /// **Time Complexity**: O(1) amortized
    ///
    /// **Algorithm**:
    /// 1. Set the key
    /// 2. If the node now beats its parent, cut it to the root ring and
    ///    cascade from the former parent
    /// 3. Update the minimum
    fn decrease(&mut self, node: NodeKey, new_key: K) -> Result<(), QueueError> {
        if new_key >= self.nodes[node].key {
            log::debug!("fibonacci decrease rejected: key not smaller");
            return Err(QueueError::DirectionMismatch(Direction::Decrease));
        }

        self.nodes[node].key = new_key;

        if let Some(parent) = self.nodes[node].parent {
            if self.nodes[node].key < self.nodes[parent].key {
                self.cut(node, parent);
                self.cascading_cut(parent);
            }
        }

        if let Some(min) = self.min {
            if self.nodes[node].key < self.nodes[min].key {
                self.min = Some(node);
            }
        }

        self.audit();
        Ok(())
    }

    /// Raises the key of `node`
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// **Algorithm**:
    /// 1. Move every direct child of `node` to the root ring (they could now
    ///    beat it) and reset its degree
    /// 2. Set the key
    /// 3. A non-root is cut and cascades like decrease; a root that was the
    ///    minimum triggers a rescan of the root ring
    fn increase(&mut self, node: NodeKey, new_key: K) -> Result<(), QueueError> {
        if new_key <= self.nodes[node].key {
            log::debug!("fibonacci increase rejected: key not larger");
            return Err(QueueError::DirectionMismatch(Direction::Increase));
        }

        if let Some(child) = self.nodes[node].child.take() {
            self.release_children(child);
            RING.splice(&mut self.nodes, self.min, Some(child));
        }
        self.nodes[node].degree = 0;
        self.nodes[node].key = new_key;

        if let Some(parent) = self.nodes[node].parent {
            self.cut(node, parent);
            self.cascading_cut(parent);
        } else if self.min == Some(node) {
            self.rescan_min(node);
        }

        self.audit();
        Ok(())
    }

    /// Recomputes the minimum by walking the root ring containing `start`
    fn rescan_min(&mut self, start: NodeKey) {
        let mut best = start;
        RING.for_each(&self.nodes, start, |root| {
            if self.nodes[root].key < self.nodes[best].key {
                best = root;
            }
        });
        self.min = Some(best);
    }

    fn validate_ring(&self, start: NodeKey, limit: usize) -> Result<usize, InvariantViolation> {
        RING.validate(&self.nodes, start, limit)
            .map_err(|err| InvariantViolation::BrokenRing(err.to_string()))
    }

    #[inline]
    fn audit(&self) {
        #[cfg(feature = "strict-invariants")]
        if let Err(violation) = self.check_invariants() {
            panic!("fibonacci heap invariant broken: {violation}");
        }
    }
}

impl<K, V> FibonacciHeap<K, V>
where
    K: Ord + Clone + Sub<Output = K> + One,
    V: Eq,
{
    /// Removes the entry holding `vertex` and returns it with its key
    ///
    /// The entry is first decreased to two below the current minimum, which
    /// cuts it to the root ring and makes it the minimum, and then extracted.
    /// Returns `None` if no entry holds `vertex`.
    ///
    /// **Time Complexity**: O(n) search, then O(log n) amortized
    ///
    /// # Panics
    /// In debug builds, if `minimum - 2` overflows the key type (for example
    /// an unsigned key whose minimum is below 2). Where the subtraction wraps
    /// instead, the decrease is rejected and `None` is returned with the heap
    /// unchanged.
    pub fn remove(&mut self, vertex: &V) -> Option<(K, V)> {
        let node = self.search(vertex)?;
        let min = self.min?;

        let original = self.nodes[node].key.clone();
        let sentinel = self.nodes[min].key.clone() - K::one() - K::one();
        // Below every stored key, so only a wrapped subtraction is rejected
        self.decrease(node, sentinel).ok()?;

        let (_, vertex) = self.remove_min()?;
        Some((original, vertex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_count(heap: &FibonacciHeap<i32, i32>) -> usize {
        heap.min.map_or(0, |min| RING.count(&heap.nodes, min))
    }

    #[test]
    fn test_degree_slots_cover_small_sizes() {
        assert_eq!(degree_slots(0), 2);
        assert_eq!(degree_slots(1), 2);
        // log_φ(2) ≈ 1.44
        assert_eq!(degree_slots(2), 4);
        // log_φ(1000) ≈ 14.35
        assert_eq!(degree_slots(1000), 17);
    }

    #[test]
    fn test_insert_is_lazy() {
        let mut heap = FibonacciHeap::new();
        for i in 0..10 {
            heap.push(100 - i, i);
        }
        assert_eq!(root_count(&heap), 10);
        assert_eq!(heap.peek_min_entry(), Some((&91, &9)));
    }

    #[test]
    fn test_consolidate_leaves_unique_degrees() {
        let mut heap = FibonacciHeap::new();
        for i in 0..16 {
            heap.push(i, i);
        }
        assert_eq!(heap.remove_min(), Some((0, 0)));

        // 15 = 0b1111: one tree each of degree 0..=3
        assert_eq!(root_count(&heap), 4);
        let mut degrees = Vec::new();
        if let Some(min) = heap.min {
            RING.for_each(&heap.nodes, min, |root| degrees.push(heap.nodes[root].degree));
        }
        degrees.sort_unstable();
        assert_eq!(degrees, vec![0, 1, 2, 3]);
        assert_eq!(heap.check_invariants(), Ok(()));
    }

    #[test]
    fn test_cascading_cut_marks_then_cuts() {
        let mut heap = FibonacciHeap::new();
        for i in 0..9 {
            heap.push(i * 10, i);
        }
        // Consolidates the 8 remaining nodes into a single B₃-shaped tree
        heap.remove_min();
        assert_eq!(root_count(&heap), 1);

        let root = heap.min.unwrap();
        let deep = heap.search(&7).unwrap();
        let parent = heap.nodes[deep].parent.unwrap();
        assert_ne!(parent, root);

        // First cut marks the parent, second cut under it cascades
        heap.decrease_key(&7, -1).unwrap();
        assert!(heap.nodes[parent].marked);

        let sibling = heap.nodes[parent].child.unwrap();
        let sibling_vertex = heap.nodes[sibling].vertex;
        heap.decrease_key(&sibling_vertex, -2).unwrap();
        assert!(!heap.nodes[parent].marked);
        assert_eq!(heap.nodes[parent].parent, None);
        assert_eq!(heap.check_invariants(), Ok(()));
    }

    #[test]
    fn test_increase_of_min_root_rescans() {
        let mut heap = FibonacciHeap::new();
        heap.push(1, 1);
        heap.push(2, 2);
        heap.push(3, 3);

        heap.increase_key(&1, 10).unwrap();
        assert_eq!(heap.peek_min_entry(), Some((&2, &2)));
        assert_eq!(heap.check_invariants(), Ok(()));
    }
}
