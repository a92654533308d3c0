//! # Error Handling
//!
//! This module defines the centralized error type for the `sitecheck`
//! library. It uses the `thiserror` library to build an `Error` enum that
//! covers the failures the harness itself can hit, with enough context to
//! tell which external tool or path was involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one failure
//!   category and carries contextual fields (`program`, `path`, `message`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Note that a subprocess exiting with a non-zero status is *not* an error
//! here. Such results are returned as
//! [`ProcessOutput`](crate::process::ProcessOutput) so callers can assert
//! on the exit code and captured streams. Only a failure to launch the
//! process at all is reported through [`Error::Spawn`].

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sitecheck operations
#[derive(Error, Debug)]
pub enum Error {
    /// An external program could not be launched (usually: not on `PATH`).
    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The `.sitecheck.yaml` configuration could not be interpreted.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// No `Makefile` was found walking upward from `start`.
    #[error("Could not find a Makefile in {} or any parent directory", start.display())]
    MakefileNotFound { start: PathBuf },

    /// The static file server failed to bind or to start its runtime.
    #[error("Static server error: {message}")]
    StaticServer { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build a [`Error::Spawn`] for `program` from the launch failure.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Error::Spawn {
            program: program.into(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
