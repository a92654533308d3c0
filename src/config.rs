//! # Configuration
//!
//! This module defines the `.sitecheck.yaml` configuration file and the
//! logic for loading it. Every field is optional; anything left out falls
//! back to the values in [`crate::defaults`]. CLI flags take precedence over
//! whatever is loaded here.
//!
//! ```yaml
//! generator:
//!   program: jekyll
//!   host: 127.0.0.1
//!   port: 4000
//! ignore_dirs: [".github", ".jekyll-cache", ".git"]
//! make:
//!   program: make
//!   makefile: Makefile
//! docker:
//!   program: docker
//!   registry: ghcr.io
//! ```
//!
//! Unknown keys are rejected so that a typo does not silently fall back to a
//! default.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Generator (`jekyll`) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Executable name or path.
    pub program: String,
    /// Host the preview server binds to.
    pub host: String,
    /// Port the preview server binds to.
    pub port: u16,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: defaults::DEFAULT_GENERATOR.to_string(),
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

/// Build tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MakeConfig {
    pub program: String,
    /// Explicit makefile; when absent one is searched for upward from the
    /// working directory.
    pub makefile: Option<PathBuf>,
}

impl Default for MakeConfig {
    fn default() -> Self {
        Self {
            program: defaults::DEFAULT_MAKE.to_string(),
            makefile: None,
        }
    }
}

/// Docker image settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DockerConfig {
    pub program: String,
    pub registry: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            program: defaults::DEFAULT_DOCKER.to_string(),
            registry: defaults::DEFAULT_REGISTRY.to_string(),
        }
    }
}

/// Top-level `.sitecheck.yaml` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub generator: GeneratorConfig,
    /// Directory names skipped at every depth by `compare`.
    pub ignore_dirs: Vec<String>,
    pub make: MakeConfig,
    pub docker: DockerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            ignore_dirs: defaults::DEFAULT_IGNORE_DIRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            make: MakeConfig::default(),
            docker: DockerConfig::default(),
        }
    }
}

impl Config {
    /// The ignore list as a set, ready for [`crate::compare::compare_directories`].
    pub fn ignore_set(&self) -> HashSet<String> {
        self.ignore_dirs.iter().cloned().collect()
    }
}

/// Parse configuration from a YAML string.
///
/// An empty (or comment-only) document yields [`Config::default`].
pub fn parse(yaml_content: &str) -> Result<Config> {
    let is_blank = yaml_content
        .lines()
        .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'));
    if is_blank {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: Some(
            "Valid top-level keys are: generator, ignore_dirs, make, docker".to_string(),
        ),
    })?;

    if config.generator.port == 0 {
        return Err(Error::Config {
            message: "generator.port must not be 0".to_string(),
            hint: Some("Use a port between 1 and 65535".to_string()),
        });
    }

    Ok(config)
}

/// Read and parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Like [`from_file`], but a missing file yields the defaults.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    from_file(path)
}
