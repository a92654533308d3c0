//! # sitecheck
//!
//! Verification tooling for a static blog build pipeline. The heavy lifting
//! (site generation, image builds, variable substitution) is done by external
//! tools; this library drives them and checks what they leave behind.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::collections::HashSet;
//! use std::path::Path;
//! use sitecheck::compare::compare_directories;
//!
//! let ignore: HashSet<String> = [".jekyll-cache".to_string()].into();
//! let differences = compare_directories(Path::new("site"), Path::new("copy"), &ignore)?;
//! for difference in &differences {
//!     println!("{:?}: {}", difference.kind, difference.left.display());
//! }
//! # Ok::<(), sitecheck::error::Error>(())
//! ```
//!
//! ## Modules
//!
//! - **`compare`**: recursive directory reconciliation and tree cloning.
//! - **`process`**: run-to-completion helper and the [`process::ManagedProcess`]
//!   start/stop supervisor.
//! - **`generator`**: `jekyll serve` / `jekyll build` wrappers.
//! - **`static_server`**: serve a built site over HTTP.
//! - **`make`**, **`git`**, **`docker`**: argument builders and queries for
//!   the surrounding build tooling.
//! - **`config`** / **`defaults`**: `.sitecheck.yaml` and its defaults.

pub mod compare;
pub mod config;
pub mod defaults;
pub mod docker;
pub mod error;
pub mod generator;
pub mod git;
pub mod make;
pub mod output;
pub mod process;
pub mod static_server;
pub mod suggestions;

#[cfg(test)]
mod compare_proptest;
