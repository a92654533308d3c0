//! # Build Command Implementation
//!
//! Runs `<generator> build --source DIR [--destination DIR]` once, echoes its
//! output and exits with the generator's exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use sitecheck::generator::Generator;
use sitecheck::suggestions;

use crate::cli::Context;
use crate::commands::{echo, exit_code};

/// Run a one-shot site generator build
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Site source directory
    #[arg(default_value = ".")]
    pub source: PathBuf,

    /// Output directory (generator default when omitted)
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<PathBuf>,
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs, ctx: &Context) -> Result<ExitCode> {
    // The generator runs from the source directory, so relative paths are
    // resolved against ours first.
    let source = std::path::absolute(&args.source)?;
    let destination = args
        .destination
        .as_deref()
        .map(std::path::absolute)
        .transpose()?;

    let generator = Generator::new(&ctx.config.generator.program);
    let output = generator
        .build(&source, destination.as_deref())
        .map_err(suggestions::explain)?;
    echo(&output);
    Ok(exit_code(&output))
}
