//! comtree: rebuild comment threads from flat, parent-linked records.
//!
//! Layers, inner to outer:
//! - [`domain`]: comments, the forest, the builder and its ancestor resolver
//! - [`application`]: services orchestrating sources and the builder
//! - [`infrastructure`]: comment sources and dependency wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_forest, BuildOrder, Comment, DomainError, Forest, ForestBuilder};
