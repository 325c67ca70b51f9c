//! CLI module for redsift - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for corpus collection,
//! analysis, the combined run, and the task listing.

pub mod commands;

pub use commands::Cli;
