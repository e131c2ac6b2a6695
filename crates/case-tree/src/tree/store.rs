//! In-memory case-node table with case assignments
//!
//! Holds the same rows the case-node endpoints edit (create, rename, move,
//! cascading delete, path lookup) plus which node each test case sits under,
//! and renders the nested tree from them.

use log::{debug, info};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Result, TreeError};
use crate::tree::builder::{build_tree, CaseCounts, NodeRecord};
use crate::tree::{NodeKey, TreeNode};

/// Case-node rows keyed by id, plus case-to-node assignments
#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: BTreeMap<i64, NodeRecord>,
    next_id: i64,
    /// case index -> node id
    cases: HashMap<String, i64>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            // 0 is the root sentinel for parent ids
            next_id: 1,
            cases: HashMap::new(),
        }
    }
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load existing rows; new ids continue after the largest one
    pub fn from_records(records: impl IntoIterator<Item = NodeRecord>) -> Result<Self> {
        let mut store = Self::new();
        for mut record in records {
            if store.nodes.contains_key(&record.id) {
                return Err(TreeError::DuplicateKey(NodeKey::from(record.id)));
            }
            record.parent_id = record.parent_id.filter(|&parent| parent != 0);
            let after = record.id.checked_add(1).ok_or(TreeError::IdsExhausted(record.id))?;
            store.next_id = store.next_id.max(after);
            store.nodes.insert(record.id, record);
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    /// Add a node under `parent_id` (`None` or `0` for a root)
    pub fn create(&mut self, name: impl Into<String>, parent_id: Option<i64>) -> Result<i64> {
        let parent_id = self.existing_parent(parent_id)?;
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(TreeError::IdsExhausted(id))?;
        self.nodes.insert(id, NodeRecord::new(id, name, parent_id));
        debug!("created node {} under {:?}", id, parent_id);
        Ok(id)
    }

    pub fn rename(&mut self, id: i64, name: impl Into<String>) -> Result<()> {
        let record = self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))?;
        record.name = name.into();
        Ok(())
    }

    /// Re-parent a node, refusing to place it below itself
    pub fn move_node(&mut self, id: i64, new_parent: Option<i64>) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::UnknownNode(id));
        }
        let new_parent = self.existing_parent(new_parent)?;
        if let Some(target) = new_parent {
            if target == id || self.descendants(id).contains(&target) {
                return Err(TreeError::InvalidMove { node: id, target });
            }
        }
        if let Some(record) = self.nodes.get_mut(&id) {
            record.parent_id = new_parent;
        }
        Ok(())
    }

    /// Delete a node and everything below it
    ///
    /// Cases under any removed node become unassigned. Returns the removed
    /// ids, the node itself first and then its descendants depth-first.
    pub fn remove(&mut self, id: i64) -> Result<Vec<i64>> {
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::UnknownNode(id));
        }
        let mut removed = vec![id];
        removed.extend(self.descendants(id));

        let doomed: HashSet<i64> = removed.iter().copied().collect();
        self.nodes.retain(|node_id, _| !doomed.contains(node_id));
        self.cases.retain(|_, node_id| !doomed.contains(node_id));

        info!("removed node {} and {} descendants", id, removed.len() - 1);
        Ok(removed)
    }

    /// Resolve a slash path such as `boards/usb/usb3`, creating missing levels
    pub fn get_or_create_path(&mut self, path: &str) -> Result<i64> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(TreeError::EmptyPath);
        }

        let mut parent = None;
        for name in segments {
            let existing = self
                .children_of(parent)
                .into_iter()
                .find(|&child| self.nodes[&child].name == name);
            let id = match existing {
                Some(id) => id,
                None => self.create(name, parent)?,
            };
            parent = Some(id);
        }
        parent.ok_or(TreeError::EmptyPath)
    }

    /// Place a test case under a node, returning its previous node
    pub fn assign_case(&mut self, case_index: impl Into<String>, node_id: i64) -> Result<Option<i64>> {
        if !self.nodes.contains_key(&node_id) {
            return Err(TreeError::UnknownNode(node_id));
        }
        Ok(self.cases.insert(case_index.into(), node_id))
    }

    pub fn unassign_case(&mut self, case_index: &str) -> Option<i64> {
        self.cases.remove(case_index)
    }

    pub fn case_node(&self, case_index: &str) -> Option<i64> {
        self.cases.get(case_index).copied()
    }

    /// Direct case counts per node, optionally restricted to `selected` cases
    pub fn case_counts(&self, selected: Option<&HashSet<String>>) -> CaseCounts {
        let mut counts = CaseCounts::new();
        for (case_index, &node_id) in &self.cases {
            if selected.map_or(true, |set| set.contains(case_index)) {
                *counts.entry(node_id).or_default() += 1;
            }
        }
        counts
    }

    /// Render the nested tree with case counts
    ///
    /// With `selected`, nodes also report how many of the selected cases
    /// they hold, the way a task's case picker shows them.
    pub fn tree(&self, selected: Option<&HashSet<String>>) -> Result<Vec<TreeNode>> {
        let records: Vec<NodeRecord> = self.nodes.values().cloned().collect();
        let counts = self.case_counts(None);
        let selected_counts = selected.map(|set| self.case_counts(Some(set)));
        build_tree(&records, &counts, selected_counts.as_ref())
    }

    fn existing_parent(&self, parent_id: Option<i64>) -> Result<Option<i64>> {
        match parent_id.filter(|&parent| parent != 0) {
            Some(parent) if !self.nodes.contains_key(&parent) => {
                Err(TreeError::UnknownNode(parent))
            }
            parent => Ok(parent),
        }
    }

    /// Direct children in id order (`None` lists the roots)
    fn children_of(&self, parent: Option<i64>) -> Vec<i64> {
        self.nodes
            .values()
            .filter(|record| record.parent_id == parent)
            .map(|record| record.id)
            .collect()
    }

    /// Every id below `id`, depth-first in id order
    fn descendants(&self, id: i64) -> Vec<i64> {
        let mut result = Vec::new();
        let mut stack: Vec<i64> = self.children_of(Some(id)).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            // Guards against rows loaded with looping parent links
            if result.contains(&current) || current == id {
                continue;
            }
            result.push(current);
            stack.extend(self.children_of(Some(current)).into_iter().rev());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_rename() {
        let mut store = NodeStore::new();
        let root = store.create("boards", None).unwrap();
        let child = store.create("usb", Some(root)).unwrap();

        assert_eq!((root, child), (1, 2));
        assert_eq!(store.get(child).unwrap().parent_id, Some(root));
        assert_eq!(store.create("x", Some(99)), Err(TreeError::UnknownNode(99)));

        store.rename(child, "usb2").unwrap();
        assert_eq!(store.get(child).unwrap().name, "usb2");
        assert_eq!(store.rename(42, "nope"), Err(TreeError::UnknownNode(42)));
    }

    #[test]
    fn test_from_records_continues_ids() {
        let mut store = NodeStore::from_records(vec![
            NodeRecord::new(4, "a", Some(0)),
            NodeRecord::new(9, "b", Some(4)),
        ])
        .unwrap();
        assert_eq!(store.get(4).unwrap().parent_id, None);
        assert_eq!(store.create("c", None).unwrap(), 10);
    }

    #[test]
    fn test_ids_exhausted_at_max() {
        let result = NodeStore::from_records(vec![NodeRecord::new(i64::MAX, "last", None)]);
        assert_eq!(result.err(), Some(TreeError::IdsExhausted(i64::MAX)));

        let mut store =
            NodeStore::from_records(vec![NodeRecord::new(i64::MAX - 1, "a", None)]).unwrap();
        assert_eq!(store.create("b", None), Err(TreeError::IdsExhausted(i64::MAX)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_move_node_rejects_descendant() {
        let mut store = NodeStore::new();
        let a = store.create("a", None).unwrap();
        let b = store.create("b", Some(a)).unwrap();
        let c = store.create("c", Some(b)).unwrap();

        assert_eq!(
            store.move_node(a, Some(c)),
            Err(TreeError::InvalidMove { node: a, target: c })
        );
        assert_eq!(
            store.move_node(a, Some(a)),
            Err(TreeError::InvalidMove { node: a, target: a })
        );

        store.move_node(c, None).unwrap();
        assert_eq!(store.get(c).unwrap().parent_id, None);
        store.move_node(a, Some(c)).unwrap();
        assert_eq!(store.get(a).unwrap().parent_id, Some(c));
    }

    #[test]
    fn test_remove_cascades() {
        let mut store = NodeStore::new();
        let a = store.create("a", None).unwrap();
        let b = store.create("b", Some(a)).unwrap();
        let c = store.create("c", Some(b)).unwrap();
        let d = store.create("d", Some(a)).unwrap();
        let other = store.create("other", None).unwrap();
        store.assign_case("case-1", c).unwrap();
        store.assign_case("case-2", other).unwrap();

        assert_eq!(store.remove(a).unwrap(), vec![a, b, c, d]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.case_node("case-1"), None);
        assert_eq!(store.case_node("case-2"), Some(other));
        assert_eq!(store.remove(a), Err(TreeError::UnknownNode(a)));
    }

    #[test]
    fn test_get_or_create_path() {
        let mut store = NodeStore::new();
        let leaf = store.get_or_create_path("/boards/usb/usb3/").unwrap();
        assert_eq!(store.len(), 3);

        let again = store.get_or_create_path("boards//usb/usb3").unwrap();
        assert_eq!(leaf, again);
        assert_eq!(store.len(), 3);

        let sibling = store.get_or_create_path("boards/pcie").unwrap();
        assert_eq!(store.get(sibling).unwrap().parent_id, Some(1));
        assert_eq!(store.get_or_create_path("//"), Err(TreeError::EmptyPath));
    }

    #[test]
    fn test_case_reassignment() {
        let mut store = NodeStore::new();
        let a = store.create("a", None).unwrap();
        let b = store.create("b", None).unwrap();

        assert_eq!(store.assign_case("TC-1", a).unwrap(), None);
        assert_eq!(store.assign_case("TC-1", b).unwrap(), Some(a));
        assert_eq!(store.case_node("TC-1"), Some(b));
        assert_eq!(store.assign_case("TC-1", 77), Err(TreeError::UnknownNode(77)));
        assert_eq!(store.unassign_case("TC-1"), Some(b));
        assert_eq!(store.unassign_case("TC-1"), None);
    }
}
