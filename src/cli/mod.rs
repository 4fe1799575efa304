//! Command-line interface for itunes-search.
//!
//! Thin front end over the library: each subcommand maps to one client
//! operation and prints the results as text or JSON.

mod commands;

pub use commands::{CacheAction, Cli, Commands, ConfigAction, GlobalArgs, OutputFormat, run_command};
