//! # Image Command Implementation
//!
//! Pulls and builds the Docker image for the current repository. The image
//! name is derived from the `origin` remote and the current branch:
//! `<registry>/<user>/<repo>:<branch>_<flavor>`.
//!
//! With `--dry-run` the docker commands are printed, not run.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use sitecheck::docker::{image_name_in, DockerBuild, ImageFlavor};
use sitecheck::{git, suggestions};

use crate::cli::Context;
use crate::commands::{echo, exit_code};

/// Pull and build the Docker image for the current repository
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image flavor (jupyter or testing)
    pub flavor: String,

    /// Branch used in the tag (defaults to the current branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Skip `docker pull` before building
    #[arg(long)]
    pub no_pull: bool,

    /// Pass `--no-cache` to `docker build`
    #[arg(long)]
    pub no_cache: bool,

    /// Print the docker commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Dockerfile to build
    #[arg(long, value_name = "FILE", default_value = "Dockerfile")]
    pub dockerfile: PathBuf,

    /// Build context (also the repository queried for the remote)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub context: PathBuf,
}

/// Execute the `image` command.
pub fn execute(args: ImageArgs, ctx: &Context) -> Result<ExitCode> {
    let flavor: ImageFlavor = args
        .flavor
        .parse()
        .map_err(|_| suggestions::unknown_flavor(&args.flavor))?;

    let url = git::remote_url(&args.context);
    let user = git::github_user(&url);
    let repo = git::github_repo_name(&url);
    if user.starts_with("Invalid GitHub remote URL") {
        anyhow::bail!("{}", user);
    }
    let branch = match args.branch {
        Some(branch) => branch,
        None => git::current_branch(&args.context)
            .ok_or_else(|| anyhow::anyhow!("Could not determine the current git branch"))?,
    };

    let image = image_name_in(&ctx.config.docker.registry, &user, &repo, &branch, flavor);
    let build = DockerBuild::new(image)
        .program(&ctx.config.docker.program)
        .dockerfile(args.dockerfile)
        .context(args.context)
        .pull(!args.no_pull)
        .no_cache(args.no_cache);

    if args.dry_run {
        for line in build.render() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    log::info!("Building {}", build.image());
    let outputs = build.run().map_err(suggestions::explain)?;
    for output in &outputs {
        echo(output);
    }
    Ok(outputs.last().map(exit_code).unwrap_or(ExitCode::SUCCESS))
}
