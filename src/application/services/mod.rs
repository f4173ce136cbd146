//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (CommentSource)
//! but are themselves concrete structs, not traits.

mod comments;

pub use comments::{CommentService, ForestSummary};
