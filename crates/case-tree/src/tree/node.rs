//! Core node types for the case tree

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Unique identifier for a node within a tree
///
/// The listing endpoints emit either integer or string keys, so both are
/// accepted and written back exactly as they were received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    /// Numeric key, e.g. `7`
    Int(i64),
    /// String key, e.g. `"7"`
    Str(String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Int(id) => write!(f, "{}", id),
            NodeKey::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for NodeKey {
    fn from(id: i64) -> Self {
        NodeKey::Int(id)
    }
}

impl From<&str> for NodeKey {
    fn from(id: &str) -> Self {
        NodeKey::Str(id.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(id: String) -> Self {
        NodeKey::Str(id)
    }
}

/// A single node in a case or task tree
///
/// Attributes other than `key`, `title` and `children` (case counts and the
/// like) are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique key of the node
    pub key: NodeKey,
    /// Display label, matched against search queries
    pub title: String,
    /// Child nodes; `None` and an empty list are both leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    /// Every other attribute of the node
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TreeNode {
    /// Create a node without a `children` attribute
    pub fn leaf(key: impl Into<NodeKey>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            children: None,
            extra: Map::new(),
        }
    }

    /// Create a node with the given children
    pub fn branch(
        key: impl Into<NodeKey>,
        title: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::leaf(key, title)
        }
    }

    /// Attach an opaque attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Look up an opaque attribute
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Children of this node (empty for leaves)
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Copy of this node with `children` replaced
    ///
    /// Key, title and every extra attribute are carried over; only the
    /// children differ from the original.
    pub fn with_children(&self, children: Vec<TreeNode>) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            children: Some(children),
            extra: self.extra.clone(),
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.key)
    }
}

/// Parse a forest in the listing endpoint's JSON shape
pub fn parse_forest(json: &str) -> Result<Vec<TreeNode>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a forest from a JSON file
pub fn read_forest(path: impl AsRef<Path>) -> Result<Vec<TreeNode>> {
    let json = std::fs::read_to_string(path)?;
    parse_forest(&json)
}

/// Serialize a forest back to JSON
pub fn forest_to_json(forest: &[TreeNode], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(forest)?
    } else {
        serde_json::to_string(forest)?
    };
    Ok(json)
}
