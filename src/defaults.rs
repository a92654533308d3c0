//! Default values for sitecheck configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::collections::HashSet;

/// Generator executable invoked for `serve` and `build`.
pub const DEFAULT_GENERATOR: &str = "jekyll";

/// Host the preview and static servers bind to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port the generator preview server binds to.
pub const DEFAULT_PORT: u16 = 4000;

/// Build tool executable.
pub const DEFAULT_MAKE: &str = "make";

/// Container tool used to pull and build images.
pub const DEFAULT_DOCKER: &str = "docker";

/// Registry prefix for derived Docker image names.
pub const DEFAULT_REGISTRY: &str = "ghcr.io";

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".sitecheck.yaml";

/// Directory names skipped when comparing a project tree with a copy of it.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".github",
    ".jekyll-cache",
    ".mypy_cache",
    ".pytest_cache",
    ".git",
];

/// [`DEFAULT_IGNORE_DIRS`] as an owned set.
pub fn default_ignore_dirs() -> HashSet<String> {
    DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignore_dirs_contains_generator_cache() {
        let dirs = default_ignore_dirs();
        assert!(dirs.contains(".jekyll-cache"));
        assert_eq!(dirs.len(), DEFAULT_IGNORE_DIRS.len());
    }
}
