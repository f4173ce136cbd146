//! Domain layer: comments, the forest and its reconstruction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod cache;
pub mod entities;
pub mod error;
pub mod forest;
pub mod ordering;
pub mod render;
pub mod resolver;

pub use builder::{build_forest, ForestBuilder};
pub use cache::FlatCache;
pub use entities::{Comment, Record};
pub use error::{DomainError, DomainResult};
pub use forest::{CommentThread, Forest, ForestNode};
pub use ordering::BuildOrder;
pub use render::{render_text, render_tree, TreeNodeConvert};
pub use resolver::AncestorResolver;
