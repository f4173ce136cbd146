//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;
use crate::domain::BuildOrder;

/// Rebuild comment threads from flat parent-linked records
#[derive(Parser, Debug)]
#[command(name = "comtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding a local .comtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Comment data file (overrides config)
    #[arg(long, global = true, env = "COMTREE_DATA", value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the comment forest
    Show {
        /// Output format: text, tree or json
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// Processing order: as-given, parent-id or topological
        #[arg(short, long)]
        order: Option<BuildOrder>,
        /// Spaces per nesting level (text format)
        #[arg(short, long)]
        indent: Option<usize>,
    },

    /// Add a comment
    Add {
        /// Comment text
        text: String,
        /// Id of the comment being replied to
        #[arg(short, long)]
        parent: Option<i64>,
    },

    /// Build the forest and report its shape
    Check {
        /// Processing order: as-given, parent-id or topological
        #[arg(short, long)]
        order: Option<BuildOrder>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show config file locations
    Path,
}
