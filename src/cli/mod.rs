//! CLI module for origami - command-line interface and subcommands.
//!
//! Provides subcommands for checking, rendering, normalizing, and dry-running
//! pipeline files.

pub mod commands;
pub mod dryrun;

pub use commands::Cli;
