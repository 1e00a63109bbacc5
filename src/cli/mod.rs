//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `check` - Test the credentials against the API
//! - `discover` - Print the catalog
//! - `sync` - Extract data from streams
//! - `streams` - List stream names in sync order

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
