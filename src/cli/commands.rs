//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - validate: check a pipeline file's referential integrity
//! - render: print a pipeline as a Mermaid flowchart
//! - fmt: print a pipeline in canonical YAML
//! - walk: dry-run a pipeline with a team of persona walkers

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Origami - declarative graph pipelines walked by persona agents
#[derive(Parser, Debug)]
#[command(name = "origami")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a pipeline file
    Validate {
        /// Pipeline YAML file
        file: PathBuf,
    },

    /// Render a pipeline as a Mermaid flowchart
    Render {
        /// Pipeline YAML file
        file: PathBuf,
    },

    /// Print a pipeline in canonical form
    Fmt {
        /// Pipeline YAML file
        file: PathBuf,

        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,
    },

    /// Dry-run a pipeline with passthrough nodes
    Walk {
        /// Pipeline YAML file
        file: PathBuf,

        /// Start node (defaults to the pipeline's start)
        #[arg(short, long)]
        start: Option<String>,

        /// Step limit (defaults to the configured walk.max_steps)
        #[arg(short, long)]
        max_steps: Option<usize>,

        /// Persona to field; repeat for a team (defaults to walk.personas)
        #[arg(short, long = "persona")]
        personas: Vec<String>,
    },
}
