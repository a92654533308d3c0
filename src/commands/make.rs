//! # Make Command Implementation
//!
//! Runs a Makefile target, passing the exit code of `make` through. The
//! makefile is found by searching upward from the working directory unless
//! given with `-f` or in the config.
//!
//! `--print-config` parses `Key: value` lines from the target's output and
//! prints them as a JSON object instead of echoing the raw output.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use sitecheck::make::{parse_config_output, MakeInvocation};
use sitecheck::suggestions;

use crate::cli::Context;
use crate::commands::{echo, exit_code};

/// Run a Makefile target
#[derive(Args, Debug)]
pub struct MakeArgs {
    /// Target to run
    pub target: String,

    /// Print the commands without running them (`make -n`)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Makefile to use instead of searching upward
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub makefile: Option<PathBuf>,

    /// Directory to run from
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Parse `Key: value` output lines and print them as JSON
    #[arg(long)]
    pub print_config: bool,

    /// Extra arguments passed to make after the target
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

/// Execute the `make` command.
pub fn execute(args: MakeArgs, ctx: &Context) -> Result<ExitCode> {
    let mut invocation = MakeInvocation::new(&args.target)
        .program(&ctx.config.make.program)
        .dry_run(args.dry_run)
        .extra_args(args.extra_args);
    if let Some(directory) = args.directory {
        invocation = invocation.cwd(std::path::absolute(directory)?);
    }
    if let Some(makefile) = args.makefile.or_else(|| ctx.config.make.makefile.clone()) {
        invocation = invocation.makefile(std::path::absolute(makefile)?);
    }

    let output = invocation.run().map_err(suggestions::explain)?;
    if args.print_config && output.success() {
        let values = parse_config_output(&output.stdout);
        println!("{}", serde_json::to_string_pretty(&values)?);
        eprint!("{}", output.stderr);
    } else {
        echo(&output);
    }
    Ok(exit_code(&output))
}
