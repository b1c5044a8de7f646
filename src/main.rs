//! biztime CLI entry point
//!
//! Parses arguments, dispatches to the CLI commands and exits non-zero
//! with the error on stderr when a command fails.

use biztime::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
