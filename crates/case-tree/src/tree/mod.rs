//! Case and task node trees
//!
//! Nested `TreeNode` forests as the listing endpoints deliver them, with
//! title search, expansion keys, traversal, and assembly from flat rows.

pub mod builder;
pub mod expand;
mod node;
pub mod search;
pub mod store;
pub mod traversal;
pub mod view;

pub use builder::{build_tree, CaseCounts, NodeRecord};
pub use expand::{expand_all, expand_all_into, ExpandedKeys};
pub use node::{forest_to_json, parse_forest, read_forest, NodeKey, TreeNode};
pub use search::{filter_tree, find_match, highlight, search_data, title_matches, Highlight};
pub use store::NodeStore;
pub use traversal::{walk, TraversalOrder, TreeWalker};
pub use view::{outline, SearchTree};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        expand_all, filter_tree, search_data, ExpandedKeys, NodeKey, SearchTree, TraversalOrder,
        TreeNode,
    };
}
