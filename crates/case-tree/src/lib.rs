//! Case Tree Library
//!
//! Search and expansion over the hierarchical case-node and task-node trees
//! of the Test Station console.
//!
//! # Core Concepts
//!
//! - **TreeNode**: one folder in a case or task tree, with opaque extra attributes
//! - **search_data**: keep matching nodes whole, plus the ancestors leading to them
//! - **expand_all**: every key of a forest in pre-order, for "expand all"
//! - **NodeStore**: flat case-node rows that render into a nested tree
//!
//! # Example
//!
//! ```
//! use case_tree::prelude::*;
//!
//! let forest = vec![TreeNode::branch(
//!     1,
//!     "Alpha",
//!     vec![TreeNode::leaf(2, "Beta"), TreeNode::leaf(3, "Gamma")],
//! )];
//!
//! let filtered = search_data("gamma", &forest);
//! assert_eq!(filtered[0].children().len(), 1);
//! assert_eq!(expand_all(&forest).len(), 3);
//! ```

mod error;
pub mod tree;

pub use error::{Result, TreeError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::TreeError;
    pub use crate::tree::prelude::*;
}
