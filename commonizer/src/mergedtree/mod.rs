//! Merged declaration tree
//!
//! One tree per run aligns the declarations of every leaf target by
//! identity. Each node holds one slot per target and a commonized slot that
//! the visitor fills in.

pub mod key;
pub mod merger;
pub mod node;
pub mod tree;

pub use key::NodeKey;
pub use merger::{DependencyTreeMerger, TreeMergeResult, TreeMerger};
pub use node::{CommonSlot, Declaration, MergedNode, ModuleHeader, Slot};
pub use tree::{MergedTree, NodeId};
