//! Domain layer: entities and tree reconstruction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod parser;

pub use arena::{DecisionTree, TreeNode};
pub use builder::{BuildReport, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use parser::{ParsedLog, RecordParser};
