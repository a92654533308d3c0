//! # Docker Image Helpers
//!
//! Image names follow `<registry>/<user>/<repo>:<branch>_<flavor>`, one
//! image per flavor (the Jupyter conversion image and the testing image).
//! [`DockerBuild`] produces the `docker pull` / `docker build` sequence for
//! one image and can either print it (dry run) or run it.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use crate::defaults::{DEFAULT_DOCKER, DEFAULT_REGISTRY};
use crate::error::Result;
use crate::process::{self, ProcessOutput};

/// Which image to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFlavor {
    Jupyter,
    Testing,
}

impl ImageFlavor {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFlavor::Jupyter => "jupyter",
            ImageFlavor::Testing => "testing",
        }
    }
}

impl fmt::Display for ImageFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFlavor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jupyter" => Ok(ImageFlavor::Jupyter),
            "testing" | "tests" => Ok(ImageFlavor::Testing),
            other => Err(format!(
                "unknown image flavor '{}' (expected 'jupyter' or 'testing')",
                other
            )),
        }
    }
}

/// `ghcr.io/<user>/<repo>:<branch>_<flavor>`
pub fn image_name(user: &str, repo: &str, branch: &str, flavor: ImageFlavor) -> String {
    image_name_in(DEFAULT_REGISTRY, user, repo, branch, flavor)
}

/// [`image_name`] with an explicit registry.
pub fn image_name_in(
    registry: &str,
    user: &str,
    repo: &str,
    branch: &str,
    flavor: ImageFlavor,
) -> String {
    format!("{}/{}/{}:{}_{}", registry, user, repo, branch, flavor)
}

/// The pull/build sequence for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerBuild {
    program: OsString,
    image: String,
    dockerfile: PathBuf,
    context: PathBuf,
    pull: bool,
    no_cache: bool,
}

impl DockerBuild {
    /// Pull enabled, cache enabled, `Dockerfile` in the current directory.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_DOCKER.into(),
            image: image.into(),
            dockerfile: PathBuf::from("Dockerfile"),
            context: PathBuf::from("."),
            pull: true,
            no_cache: false,
        }
    }

    /// Use a different container-tool executable.
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn dockerfile(mut self, dockerfile: impl Into<PathBuf>) -> Self {
        self.dockerfile = dockerfile.into();
        self
    }

    pub fn context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    /// Whether to `docker pull` the image first.
    pub fn pull(mut self, pull: bool) -> Self {
        self.pull = pull;
        self
    }

    /// Whether to pass `--no-cache` to `docker build`.
    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Argument lists (after `docker`) in execution order.
    pub fn commands(&self) -> Vec<Vec<String>> {
        let mut commands = Vec::with_capacity(2);
        if self.pull {
            commands.push(vec!["pull".to_string(), self.image.clone()]);
        }
        let mut build = vec!["build".to_string()];
        if self.no_cache {
            build.push("--no-cache".to_string());
        }
        build.extend([
            "-t".to_string(),
            self.image.clone(),
            "-f".to_string(),
            path_str(&self.dockerfile),
            path_str(&self.context),
        ]);
        commands.push(build);
        commands
    }

    /// The command lines a dry run prints.
    pub fn render(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .map(|args| format!("{} {}", self.program.to_string_lossy(), args.join(" ")))
            .collect()
    }

    /// Run each command in order, stopping at the first failure.
    ///
    /// Returns the output of every command run; the last one is the failure,
    /// if any.
    pub fn run(&self) -> Result<Vec<ProcessOutput>> {
        let mut outputs = Vec::new();
        for args in self.commands() {
            let output = process::run_to_completion(Command::new(&self.program).args(&args))?;
            let failed = !output.success();
            outputs.push(output);
            if failed {
                log::warn!(
                    "{} {} failed; not running the remaining commands",
                    self.program.to_string_lossy(),
                    args.first().map(String::as_str).unwrap_or_default()
                );
                break;
            }
        }
        Ok(outputs)
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
