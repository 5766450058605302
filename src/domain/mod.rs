//! Domain layer: entities and ordering logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod search;
pub mod sorter;

pub use arena::{CategoryForest, NodeData, TreeNode, MAX_TREE_DEPTH};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use search::filter_by_query;
pub use sorter::{find_orphans, sort_hierarchically, sort_refs, sort_with_depth};
