//! # Remote Command Implementation
//!
//! Prints the `origin` remote URL and the GitHub user, repository name and
//! branch derived from it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use sitecheck::git;

/// Show the git remote and the GitHub user/repository derived from it
#[derive(Args, Debug)]
pub struct RemoteArgs {
    /// Repository directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,
}

/// Execute the `remote` command.
pub fn execute(args: RemoteArgs) -> Result<ExitCode> {
    let url = git::remote_url(&args.cwd);
    println!("Remote URL: {}", url);
    println!("GitHub User: {}", git::github_user(&url));
    println!("Repository Name: {}", git::github_repo_name(&url));
    println!(
        "Git Branch: {}",
        git::current_branch(&args.cwd).unwrap_or_else(|| "unknown".to_string())
    );
    Ok(ExitCode::SUCCESS)
}
