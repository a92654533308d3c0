//! # Git Remote Helpers
//!
//! Read-only queries against the system `git` used to derive the GitHub
//! user, repository and branch that image names are built from.
//!
//! These helpers report problems as human-readable strings rather than
//! errors, since callers only ever print or assert on them.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

/// Run `git <args>` in `cwd`, returning trimmed stdout on success.
///
/// A missing `git` binary is treated like a failing command.
fn git_output(cwd: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .ok()?;
    if !output.status.success() {
        log::debug!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// URL of the `origin` remote, or a message describing why there is none.
///
/// Falls back to listing the available remotes when `origin` is not
/// configured, and to a generic message outside a Git repository.
pub fn remote_url(cwd: &Path) -> String {
    match git_output(cwd, &["config", "--get", "remote.origin.url"]) {
        Some(url) if url.is_empty() => {
            "Missing `origin` remote URL: No URL set for remote 'origin'.".to_string()
        }
        Some(url) => url,
        None => match git_output(cwd, &["remote", "-v"]) {
            Some(remotes) => format!("Missing `origin` remote. Available remotes: {}", remotes),
            None => "Error: Unable to fetch remote details. \
                     Ensure you are inside a valid Git repository."
                .to_string(),
        },
    }
}

/// Current branch name (`git rev-parse --abbrev-ref HEAD`).
pub fn current_branch(cwd: &Path) -> Option<String> {
    git_output(cwd, &["rev-parse", "--abbrev-ref", "HEAD"]).filter(|b| !b.is_empty())
}

fn github_remote_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:https://github\.com/|git@github\.com:)([^/]+)/([^/]+?)(?:\.git)?/?$")
            .expect("static regex is valid")
    })
}

fn github_parts(remote_url: &str) -> Option<(String, String)> {
    let captures = github_remote_regex().captures(remote_url.trim())?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

/// Lowercased GitHub user from an HTTPS or SSH remote URL.
///
/// Anything else yields `"Invalid GitHub remote URL: <input>"`.
pub fn github_user(remote_url: &str) -> String {
    match github_parts(remote_url) {
        Some((user, _)) => user.to_lowercase(),
        None => invalid(remote_url),
    }
}

/// Repository name (without `.git`) from an HTTPS or SSH remote URL.
///
/// Anything else yields `"Invalid GitHub remote URL: <input>"`.
pub fn github_repo_name(remote_url: &str) -> String {
    match github_parts(remote_url) {
        Some((_, repo)) => repo,
        None => invalid(remote_url),
    }
}

fn invalid(remote_url: &str) -> String {
    format!("Invalid GitHub remote URL: {}", remote_url)
}
