//! # Compare Command Implementation
//!
//! Compares two directory trees and lists every difference.
//!
//! - **Ignore set**: directory names from the config (`ignore_dirs`) plus any
//!   `--ignore` flags, skipped at every depth.
//! - **Output**: one line per difference, sorted, or a JSON array with
//!   `--json`.
//! - **Exit Codes**: 0 if the trees match, 1 if any difference exists.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;

use sitecheck::compare::compare_directories;
use sitecheck::output::{format_difference, summarize};

use crate::cli::Context;

/// Compare two directory trees and list every difference
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Left-hand (expected) directory
    pub left: PathBuf,

    /// Right-hand (actual) directory
    pub right: PathBuf,

    /// Additional directory name to skip at every depth (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Do not apply the configured ignore list
    #[arg(long)]
    pub no_default_ignores: bool,

    /// Print differences as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Execute the `compare` command.
pub fn execute(args: CompareArgs, ctx: &Context) -> Result<ExitCode> {
    let mut ignore_dirs = if args.no_default_ignores {
        Default::default()
    } else {
        ctx.config.ignore_set()
    };
    ignore_dirs.extend(args.ignore);

    let mut differences = compare_directories(&args.left, &args.right, &ignore_dirs)
        .with_context(|| {
            format!(
                "Failed to compare {} with {}",
                args.left.display(),
                args.right.display()
            )
        })?;
    differences.sort();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&differences)?);
    } else if differences.is_empty() {
        println!("No differences found.");
    } else {
        for difference in &differences {
            println!("{}", format_difference(&ctx.output, difference, &args.left));
        }
        println!();
        println!("{}", summarize(&differences));
    }

    Ok(if differences.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
