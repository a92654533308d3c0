//! # Clone Command Implementation
//!
//! Copies a directory tree into another location, creating the destination
//! and merging into it if it already exists.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;

use sitecheck::compare::clone_directory;

/// Copy a directory tree into another location
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Directory to copy
    pub src: PathBuf,

    /// Destination (created if missing)
    pub dst: PathBuf,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs) -> Result<ExitCode> {
    if !args.src.is_dir() {
        anyhow::bail!("Source directory not found: {}", args.src.display());
    }
    clone_directory(&args.src, &args.dst).with_context(|| {
        format!(
            "Failed to clone {} into {}",
            args.src.display(),
            args.dst.display()
        )
    })?;
    println!("Cloned {} -> {}", args.src.display(), args.dst.display());
    Ok(ExitCode::SUCCESS)
}
