//! CLI module for windowcharmer.
//!
//! This module parses the command line, installs logging and runs either a
//! single action or the chord daemon.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::CharmerError;
use crate::logging;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), CharmerError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli.execute()
}
