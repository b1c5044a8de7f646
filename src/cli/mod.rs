//! CLI module for biztime
//!
//! Provides command-line interface for:
//! - init: Create the database file and the companies table
//! - serve: Start the HTTP server

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
