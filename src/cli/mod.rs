//! CLI module for planr - command-line interface and subcommands.
//!
//! Provides subcommands for managing assignments, importing/exporting them
//! and running the scheduler.

pub mod commands;

pub use commands::Cli;
