#![forbid(unsafe_code)]

//! Mind map tree model (headless).
//!
//! Design goals:
//! - immutable, `Arc`-shared nodes: an edit produces a new tree that shares every untouched
//!   subtree with the previous one
//! - ids are unique across the whole tree, so edits address nodes by id
//! - the `item` default for a missing node type is resolved once, at construction time

pub mod error;
pub mod seed;
pub mod tree;

pub use error::{Error, Result};
pub use tree::{MindTree, NodeKind, TreeNode};
