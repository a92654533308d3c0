//! # sitecheck CLI
//!
//! Binary entry point for the `sitecheck` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Executing the selected command and turning its result into an exit
//!   code. Commands that wrap an external tool pass that tool's exit code
//!   through.
//!
//! The core logic lives in the `sitecheck` library crate.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    cli.execute()
}
