//! CLI argument definitions using clap
//!
//! Commands:
//! - biztime init [--config <path>] [--database <path>]
//! - biztime serve [--config <path>] [--port <port>] [--database <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// biztime - A small company registry served over HTTP
#[derive(Parser, Debug)]
#[command(name = "biztime")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and the companies table
    Init {
        /// Path to configuration file (default: ./biztime.json if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Database file, overriding the configuration
        #[arg(long)]
        database: Option<String>,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file (default: ./biztime.json if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,

        /// Database file, overriding the configuration
        #[arg(long)]
        database: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
