//! Assembly of nested case-node trees from flat parent-linked records

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Result, TreeError};
use crate::tree::{NodeKey, TreeNode};

/// One row of the case-node table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub name: String,
    /// `None` or `0` marks a root
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl NodeRecord {
    pub fn new(id: i64, name: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }
}

/// Number of test cases attached directly to each node
pub type CaseCounts = HashMap<i64, u64>;

/// Attribute holding a node's case count, descendants included
pub const CASE_COUNT: &str = "case_count";
/// Attribute holding how many of a node's cases are selected by a task
pub const SELECTED_CASE_COUNT: &str = "selected_case_count";

/// Build the nested tree the case pages display
///
/// Records are placed in id order. A record without a parent, with parent
/// `0`, or whose parent is not among `records` becomes a root. Every node
/// carries `case_count`, its own cases plus all of its descendants'. When
/// `selected` is given, nodes with a non-zero selected total also carry
/// `selected_case_count`.
///
/// Keys are emitted as strings, the way the listing endpoint sends them.
pub fn build_tree(
    records: &[NodeRecord],
    counts: &CaseCounts,
    selected: Option<&CaseCounts>,
) -> Result<Vec<TreeNode>> {
    let mut sorted: Vec<&NodeRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.id);

    let mut by_id = HashMap::with_capacity(sorted.len());
    for record in &sorted {
        if by_id.insert(record.id, *record).is_some() {
            return Err(TreeError::DuplicateKey(NodeKey::from(record.id)));
        }
    }

    let parent_of = |record: &NodeRecord| {
        record
            .parent_id
            .filter(|&parent| parent != 0 && by_id.contains_key(&parent))
    };

    check_acyclic(&sorted, &parent_of)?;

    let mut roots = Vec::new();
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for record in sorted.iter().copied() {
        match parent_of(record) {
            Some(parent) => children.entry(parent).or_default().push(record.id),
            None => {
                if let Some(missing) = record.parent_id.filter(|&parent| parent != 0) {
                    warn!(
                        "node {} references missing parent {}, placing it at the root",
                        record.id, missing
                    );
                }
                roots.push(record.id);
            }
        }
    }

    let layout = Layout {
        by_id: &by_id,
        children: &children,
        counts,
        selected,
    };
    let forest: Vec<TreeNode> = roots.iter().map(|&id| layout.node(id).0).collect();
    debug!(
        "built tree with {} roots from {} records",
        forest.len(),
        records.len()
    );
    Ok(forest)
}

/// Fail if following parent links from any record loops
fn check_acyclic<F>(records: &[&NodeRecord], parent_of: &F) -> Result<()>
where
    F: Fn(&NodeRecord) -> Option<i64>,
{
    let by_id: HashMap<i64, &NodeRecord> = records.iter().map(|r| (r.id, *r)).collect();
    let mut rooted: HashSet<i64> = HashSet::new();

    for record in records {
        let mut chain = HashSet::new();
        let mut current = *record;
        loop {
            if rooted.contains(&current.id) {
                break;
            }
            if !chain.insert(current.id) {
                return Err(TreeError::ParentCycle(record.id));
            }
            match parent_of(current).and_then(|parent| by_id.get(&parent).copied()) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        rooted.extend(chain);
    }
    Ok(())
}

struct Layout<'a> {
    by_id: &'a HashMap<i64, &'a NodeRecord>,
    children: &'a HashMap<i64, Vec<i64>>,
    counts: &'a CaseCounts,
    selected: Option<&'a CaseCounts>,
}

impl Layout<'_> {
    /// Build the subtree rooted at `id`, returning it with its totals
    fn node(&self, id: i64) -> (TreeNode, u64, u64) {
        let mut total = self.counts.get(&id).copied().unwrap_or(0);
        let mut selected = self
            .selected
            .and_then(|counts| counts.get(&id).copied())
            .unwrap_or(0);

        let child_ids = self.children.get(&id).map(Vec::as_slice).unwrap_or(&[]);
        let mut children = Vec::with_capacity(child_ids.len());
        for &child_id in child_ids {
            let (child, child_total, child_selected) = self.node(child_id);
            total += child_total;
            selected += child_selected;
            children.push(child);
        }

        let title = self
            .by_id
            .get(&id)
            .map(|record| record.name.clone())
            .unwrap_or_default();
        let mut node =
            TreeNode::branch(id.to_string(), title, children).with_attr(CASE_COUNT, total);
        if self.selected.is_some() && selected > 0 {
            node = node.with_attr(SELECTED_CASE_COUNT, selected);
        }
        (node, total, selected)
    }
}
