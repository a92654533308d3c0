//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sitecheck::config::{self, Config};
use sitecheck::defaults::DEFAULT_CONFIG_FILE;
use sitecheck::output::OutputConfig;
use sitecheck::suggestions;

use crate::commands;

/// sitecheck - Verify a static blog build pipeline
#[derive(Parser, Debug)]
#[command(name = "sitecheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "SITECHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two directory trees and list every difference
    Compare(commands::compare::CompareArgs),
    /// Copy a directory tree into another location
    Clone(commands::clone::CloneArgs),
    /// Run a one-shot site generator build
    Build(commands::build::BuildArgs),
    /// Run the site generator preview server in the foreground
    Serve(commands::serve::ServeArgs),
    /// Serve a built site directory over HTTP
    ServeStatic(commands::serve_static::ServeStaticArgs),
    /// Run a Makefile target
    Make(commands::make::MakeArgs),
    /// Show the git remote and the GitHub user/repository derived from it
    Remote(commands::remote::RemoteArgs),
    /// Pull and build the Docker image for the current repository
    Image(commands::image::ImageArgs),
}

/// Shared state handed to every command.
pub struct Context {
    pub config: Config,
    pub output: OutputConfig,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        init_logging(&self.log_level);

        let config = match &self.config {
            Some(path) if !path.exists() => return Err(suggestions::config_not_found(path)),
            Some(path) => config::from_file(path)?,
            None => config::load_or_default(DEFAULT_CONFIG_FILE)?,
        };
        let ctx = Context {
            config,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Compare(args) => commands::compare::execute(args, &ctx),
            Commands::Clone(args) => commands::clone::execute(args),
            Commands::Build(args) => commands::build::execute(args, &ctx),
            Commands::Serve(args) => commands::serve::execute(args, &ctx),
            Commands::ServeStatic(args) => commands::serve_static::execute(args, &ctx),
            Commands::Make(args) => commands::make::execute(args, &ctx),
            Commands::Remote(args) => commands::remote::execute(args),
            Commands::Image(args) => commands::image::execute(args, &ctx),
        }
    }
}

/// Install `env_logger` at `level`; `RUST_LOG` takes precedence.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
