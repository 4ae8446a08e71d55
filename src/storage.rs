//! Arena storage for heap nodes
//!
//! Every engine owns one [`NodeArena`]. Nodes refer to each other through
//! [`NodeKey`]s instead of pointers, so rewiring a parent, child, sibling or
//! ring link is a plain index write and a stale link can never dangle.
//!
//! # Design
//!
//! The arena is a `slotmap::SlotMap`:
//! - Contiguous node storage (better cache locality than one allocation per node)
//! - Generational keys, so a key of a removed node never aliases a later node
//! - Dropping the arena releases every node deterministically
//!
//! Merging two engines moves the donor's nodes into the receiving arena with
//! [`NodeArena::absorb`]. The moved nodes get new keys, and each node type
//! rewrites its own links through the translation table via [`Relink`].

use std::ops::{Index, IndexMut};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Stable index of a node inside a [`NodeArena`]
    pub struct NodeKey;
}

/// Translation table from donor keys to receiver keys produced by a merge
pub type KeyMap = SecondaryMap<NodeKey, NodeKey>;

/// Nodes that hold links to other nodes of the same arena
pub trait Relink {
    /// Rewrites every link of this node through `moved`
    fn relink(&mut self, moved: &KeyMap);
}

/// Translates one link; keys outside the table are left untouched
#[inline]
pub fn translate(moved: &KeyMap, key: NodeKey) -> NodeKey {
    moved.get(key).copied().unwrap_or(key)
}

/// Translates an optional link
#[inline]
pub fn translate_opt(moved: &KeyMap, key: Option<NodeKey>) -> Option<NodeKey> {
    key.map(|k| translate(moved, k))
}

/// Slotmap-backed node arena
#[derive(Debug, Clone)]
pub struct NodeArena<N> {
    nodes: SlotMap<NodeKey, N>,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeArena<N> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Stores a node and returns its key
    #[inline]
    pub fn insert(&mut self, node: N) -> NodeKey {
        self.nodes.insert(node)
    }

    /// Stores a node built from its own key (for self-referential links)
    #[inline]
    pub fn insert_with_key<F>(&mut self, f: F) -> NodeKey
    where
        F: FnOnce(NodeKey) -> N,
    {
        self.nodes.insert_with_key(f)
    }

    /// Removes a node, returning it if the key was live
    #[inline]
    pub fn remove(&mut self, key: NodeKey) -> Option<N> {
        self.nodes.remove(key)
    }

    /// Mutable access to two distinct nodes at once
    ///
    /// Returns `None` if the keys are equal or either is not live.
    #[inline]
    pub fn pair_mut(&mut self, a: NodeKey, b: NodeKey) -> Option<[&mut N; 2]> {
        self.nodes.get_disjoint_mut([a, b])
    }

    /// Releases every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<N: Relink> NodeArena<N> {
    /// Moves every node of `donor` into this arena
    ///
    /// Returns the table mapping donor keys to their new keys. Links inside
    /// the moved nodes are already rewritten; keys the caller kept outside
    /// the nodes (roots, minimum) must be translated with the returned table.
    pub fn absorb(&mut self, donor: NodeArena<N>) -> KeyMap {
        let mut moved = KeyMap::with_capacity(donor.len());
        let mut fresh = Vec::with_capacity(donor.len());

        for (old, node) in donor.nodes {
            let new = self.nodes.insert(node);
            moved.insert(old, new);
            fresh.push(new);
        }

        for key in fresh {
            self.nodes[key].relink(&moved);
        }

        log::trace!("relocated {} nodes into arena of {}", moved.len(), self.len());
        moved
    }
}

impl<N> Index<NodeKey> for NodeArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        &self.nodes[key]
    }
}

impl<N> IndexMut<NodeKey> for NodeArena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        &mut self.nodes[key]
    }
}
