//! Search-box state for a tree view

use log::debug;

use crate::tree::builder::CASE_COUNT;
use crate::tree::expand::ExpandedKeys;
use crate::tree::search::{filter_tree, highlight, Highlight};
use crate::tree::traversal::{walk, TraversalOrder};
use crate::tree::TreeNode;

/// The original forest, the live query and what is currently displayed
///
/// Clearing the query restores the original forest. Refetching keeps the
/// query applied and forgets expanded keys that no longer exist.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    original: Vec<TreeNode>,
    displayed: Vec<TreeNode>,
    query: String,
    expanded: ExpandedKeys,
}

impl SearchTree {
    pub fn new(forest: Vec<TreeNode>) -> Self {
        Self {
            displayed: forest.clone(),
            original: forest,
            ..Self::default()
        }
    }

    /// Update the query and re-filter the original forest
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.displayed = filter_tree(&self.query, &self.original);
        debug!(
            "query {:?} displays {} root nodes",
            self.query,
            self.displayed.len()
        );
    }

    /// Swap in freshly fetched data, keeping the current query
    pub fn replace_data(&mut self, forest: Vec<TreeNode>) {
        self.original = forest;
        self.displayed = filter_tree(&self.query, &self.original);
        self.expanded.retain_present(&self.original);
    }

    pub fn original(&self) -> &[TreeNode] {
        &self.original
    }

    pub fn displayed(&self) -> &[TreeNode] {
        &self.displayed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn expanded(&self) -> &ExpandedKeys {
        &self.expanded
    }

    pub fn expanded_mut(&mut self) -> &mut ExpandedKeys {
        &mut self.expanded
    }

    /// Expand or collapse everything currently displayed
    pub fn toggle_expand_all(&mut self) -> bool {
        self.expanded.toggle_all(&self.displayed)
    }

    /// Highlight of `node`'s title for the current query
    pub fn highlight<'a>(&self, node: &'a TreeNode) -> Option<Highlight<'a>> {
        highlight(&node.title, &self.query)
    }

    /// Indented outline of the displayed forest
    pub fn outline(&self) -> String {
        outline(&self.displayed, &self.query)
    }
}

/// Render a forest as an indented outline
///
/// Nodes with children are marked `+`, leaves `-`. Search hits are wrapped
/// in brackets and case counts, when present, follow in parentheses.
pub fn outline(forest: &[TreeNode], query: &str) -> String {
    let mut out = String::new();
    for (depth, node) in walk(forest, TraversalOrder::PreOrder) {
        if !out.is_empty() {
            out.push('\n');
        }
        let marker = if node.is_leaf() { '-' } else { '+' };
        out.push_str(&"  ".repeat(depth));
        out.push(marker);
        out.push(' ');
        match highlight(&node.title, query) {
            Some(hit) => out.push_str(&format!("{}[{}]{}", hit.prefix, hit.matched, hit.suffix)),
            None => out.push_str(&node.title),
        }
        if let Some(count) = node.attr(CASE_COUNT) {
            out.push_str(&format!(" ({})", count));
        }
    }
    out
}
