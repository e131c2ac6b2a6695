//! Error type shared by the tree modules

use derive_more::Display;

use crate::tree::NodeKey;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised while validating, assembling or editing a tree
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TreeError {
    /// Two nodes in the same tree share a key
    #[display(fmt = "duplicate node key {}", _0)]
    DuplicateKey(NodeKey),
    /// A record or operation referenced a node id that does not exist
    #[display(fmt = "unknown node {}", _0)]
    UnknownNode(i64),
    /// Following parent links from this node never reaches a root
    #[display(fmt = "parent links of node {} form a cycle", _0)]
    ParentCycle(i64),
    /// The node would end up below itself
    #[display(fmt = "cannot move node {} under node {}", node, target)]
    InvalidMove { node: i64, target: i64 },
    /// No node id is left after this one
    #[display(fmt = "node ids exhausted after {}", _0)]
    IdsExhausted(i64),
    /// A slash-separated node path had no segments
    #[display(fmt = "node path has no segments")]
    EmptyPath,
    /// Tree JSON did not have the `[{key, title, children}]` shape
    #[display(fmt = "malformed tree JSON: {}", _0)]
    Json(String),
    /// Reading a tree file failed
    #[display(fmt = "failed to read tree: {}", _0)]
    Io(String),
}

impl std::error::Error for TreeError {}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        TreeError::Json(err.to_string())
    }
}

impl From<std::io::Error> for TreeError {
    fn from(err: std::io::Error) -> Self {
        TreeError::Io(err.to_string())
    }
}
