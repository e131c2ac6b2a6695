//! Expansion keys for tree views

use std::collections::HashSet;

use crate::tree::traversal::{walk, TraversalOrder};
use crate::tree::{NodeKey, TreeNode};

/// Keys needed to expand every node of a forest
///
/// Keys come out in pre-order: a node's key precedes its children's, and
/// siblings keep their order. Each call returns a fresh vector.
pub fn expand_all(forest: &[TreeNode]) -> Vec<NodeKey> {
    let mut keys = Vec::new();
    expand_all_into(forest, &mut keys);
    keys
}

/// Append the pre-order keys of `forest` to an existing buffer
pub fn expand_all_into(forest: &[TreeNode], keys: &mut Vec<NodeKey>) {
    keys.extend(walk(forest, TraversalOrder::PreOrder).map(|(_, node)| node.key.clone()));
}

/// The set of keys a tree view currently shows as open
///
/// Insertion order is kept so the keys can be handed back to a renderer
/// in the order they were opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedKeys {
    order: Vec<NodeKey>,
    set: HashSet<NodeKey>,
}

impl ExpandedKeys {
    /// Create an empty expansion state (everything collapsed)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of keys, ignoring repeats
    pub fn from_keys(keys: impl IntoIterator<Item = NodeKey>) -> Self {
        let mut expanded = Self::new();
        for key in keys {
            expanded.expand(key);
        }
        expanded
    }

    /// Open a node; returns false if it was already open
    pub fn expand(&mut self, key: NodeKey) -> bool {
        if !self.set.insert(key.clone()) {
            return false;
        }
        self.order.push(key);
        true
    }

    /// Close a node; returns false if it was not open
    pub fn collapse(&mut self, key: &NodeKey) -> bool {
        if !self.set.remove(key) {
            return false;
        }
        self.order.retain(|k| k != key);
        true
    }

    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.set.contains(key)
    }

    /// Open keys in the order they were opened
    pub fn keys(&self) -> &[NodeKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Collapse everything
    pub fn clear(&mut self) {
        self.order.clear();
        self.set.clear();
    }

    /// Open every node of `forest`, keeping keys that are already open
    pub fn expand_all(&mut self, forest: &[TreeNode]) {
        for key in expand_all(forest) {
            self.expand(key);
        }
    }

    /// Collapse everything if anything is open, otherwise open everything
    ///
    /// Returns true if the forest ends up expanded.
    pub fn toggle_all(&mut self, forest: &[TreeNode]) -> bool {
        if self.is_empty() {
            self.expand_all(forest);
            true
        } else {
            self.clear();
            false
        }
    }

    /// Drop keys that no longer name a node of `forest`
    pub fn retain_present(&mut self, forest: &[TreeNode]) {
        let present: HashSet<NodeKey> = expand_all(forest).into_iter().collect();
        self.order.retain(|key| present.contains(key));
        self.set.retain(|key| present.contains(key));
    }
}
