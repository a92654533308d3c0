//! # Error Suggestions
//!
//! Helpers that turn failures into user-facing errors carrying `hint:`
//! lines: what went wrong AND how to fix it.
//!
//! ```rust,ignore
//! use sitecheck::suggestions;
//!
//! return Err(suggestions::tool_not_found("jekyll"));
//! ```

use std::path::Path;

use crate::error::Error;

/// An explicitly requested configuration file does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .sitecheck.yaml file in your project root\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set SITECHECK_CONFIG environment variable",
        path = path.display()
    )
}

/// An external tool could not be launched.
pub fn tool_not_found(program: &str) -> anyhow::Error {
    let install = match Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program)
    {
        "jekyll" => "hint: Install it with `gem install jekyll bundler`",
        "make" | "gmake" => "hint: Install GNU make from your system package manager",
        "docker" => "hint: Install Docker and make sure the daemon is running",
        "git" => "hint: Install git from your system package manager",
        _ => "hint: Check that the program is installed",
    };
    anyhow::anyhow!(
        "Could not run `{program}`: not found on PATH\n\n\
         {install}\n\
         hint: Set the program path in .sitecheck.yaml"
    )
}

/// Map a library error to a user-facing one, adding hints where we have them.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::Spawn { program, source } if source.kind() == std::io::ErrorKind::NotFound => {
            tool_not_found(&program)
        }
        Error::MakefileNotFound { start } => anyhow::anyhow!(
            "Could not find a Makefile in {} or any parent directory\n\n\
             hint: Use -f/--file to point at the Makefile\n\
             hint: Use -C/--directory to run from the project root",
            start.display()
        ),
        other => other.into(),
    }
}

/// Unknown image flavor, with a "did you mean" for near misses.
pub fn unknown_flavor(flavor: &str) -> anyhow::Error {
    let valid = ["jupyter", "testing"];
    let did_you_mean = find_similar(flavor, &valid)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown image flavor: {flavor}{did_you_mean}\n\n\
         Valid flavors are: {flavors}",
        flavors = valid.join(", ")
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, single-row variant.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = diagonal + usize::from(a_char != *b_char);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }

    row[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_includes_hints() {
        let message = config_not_found(Path::new("/p/.sitecheck.yaml")).to_string();
        assert!(message.contains("Configuration file not found"));
        assert!(message.contains("/p/.sitecheck.yaml"));
        assert!(message.contains("SITECHECK_CONFIG"));
    }

    #[test]
    fn test_tool_not_found_hints_per_tool() {
        assert!(tool_not_found("jekyll").to_string().contains("gem install jekyll"));
        assert!(tool_not_found("/usr/local/bin/docker")
            .to_string()
            .contains("Install Docker"));
        assert!(tool_not_found("weird").to_string().contains("Check that the program"));
    }

    #[test]
    fn test_explain_spawn_not_found() {
        let error = Error::spawn(
            "jekyll",
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        );
        assert!(explain(error).to_string().contains("not found on PATH"));
    }

    #[test]
    fn test_explain_passes_other_errors_through() {
        let error = Error::StaticServer {
            message: "boom".to_string(),
        };
        assert!(explain(error).to_string().contains("Static server error: boom"));
    }

    #[test]
    fn test_unknown_flavor_suggests_similar() {
        let message = unknown_flavor("jupiter").to_string();
        assert!(message.contains("Did you mean 'jupyter'?"));

        let message = unknown_flavor("xyz").to_string();
        assert!(!message.contains("Did you mean"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("testing", "testing"), 0);
        assert_eq!(edit_distance("testng", "testing"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }
}
