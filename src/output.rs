//! # Output Formatting
//!
//! Terminal rendering for comparison results, with color support decided
//! from the `--color` flag and the environment.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::path::Path;

use console::style;

use crate::compare::{Difference, DifferenceKind};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether ANSI colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` and `never` win outright; anything else auto-detects.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

fn describe_kind(kind: DifferenceKind) -> &'static str {
    match kind {
        DifferenceKind::ContentDiffers => "content differs",
        DifferenceKind::TypeMismatch => "file vs directory",
        DifferenceKind::LeftOnly => "only in left",
        DifferenceKind::RightOnly => "only in right",
        DifferenceKind::Subdirectory => "directory has differences",
    }
}

/// One line for a difference: marker, path relative to the roots, reason.
///
/// ```text
/// ~ file2.txt  (content differs)
/// ```
pub fn format_difference(config: &OutputConfig, difference: &Difference, left_root: &Path) -> String {
    let relative = difference
        .left
        .strip_prefix(left_root)
        .unwrap_or(&difference.left);
    let marker = difference.kind.marker();
    let marker = if config.use_color {
        let styled = match difference.kind {
            DifferenceKind::ContentDiffers => style(marker).yellow(),
            DifferenceKind::TypeMismatch => style(marker).magenta(),
            DifferenceKind::LeftOnly => style(marker).red(),
            DifferenceKind::RightOnly => style(marker).green(),
            DifferenceKind::Subdirectory => style(marker).cyan(),
        };
        styled.force_styling(true).to_string()
    } else {
        marker.to_string()
    };
    format!(
        "{} {}  ({})",
        marker,
        relative.display(),
        describe_kind(difference.kind)
    )
}

/// Summary line, e.g. `3 difference(s): 1 changed, 1 left-only, 1 right-only`.
pub fn summarize(differences: &[Difference]) -> String {
    let count = |kind| differences.iter().filter(|d| d.kind == kind).count();
    format!(
        "{} difference(s): {} changed, {} left-only, {} right-only, {} type mismatch(es)",
        differences.len(),
        count(DifferenceKind::ContentDiffers),
        count(DifferenceKind::LeftOnly),
        count(DifferenceKind::RightOnly),
        count(DifferenceKind::TypeMismatch),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    fn difference(name: &str, kind: DifferenceKind) -> Difference {
        Difference {
            left: PathBuf::from("/l").join(name),
            right: PathBuf::from("/r").join(name),
            kind,
        }
    }

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    #[serial]
    fn test_no_color_env_disables_auto() {
        let previous = env::var_os("NO_COLOR");
        env::set_var("NO_COLOR", "");
        let config = OutputConfig::from_env_and_flag("auto");
        match previous {
            Some(value) => env::set_var("NO_COLOR", value),
            None => env::remove_var("NO_COLOR"),
        }
        assert!(!config.use_color);
    }

    #[test]
    #[serial]
    fn test_always_beats_no_color_env() {
        let previous = env::var_os("NO_COLOR");
        env::set_var("NO_COLOR", "1");
        let config = OutputConfig::from_env_and_flag("ALWAYS");
        match previous {
            Some(value) => env::set_var("NO_COLOR", value),
            None => env::remove_var("NO_COLOR"),
        }
        assert!(config.use_color);
    }

    #[test]
    fn test_format_difference_plain() {
        let config = OutputConfig::without_color();
        let line = format_difference(
            &config,
            &difference("sub/file3.txt", DifferenceKind::LeftOnly),
            Path::new("/l"),
        );
        assert_eq!(line, "- sub/file3.txt  (only in left)");
    }

    #[test]
    fn test_format_difference_colored_contains_escape() {
        let config = OutputConfig::with_color();
        let line = format_difference(
            &config,
            &difference("file4.txt", DifferenceKind::RightOnly),
            Path::new("/l"),
        );
        assert!(line.contains("\u{1b}["));
        assert!(line.contains("file4.txt"));
    }

    #[test]
    fn test_summarize_counts() {
        let differences = vec![
            difference("a", DifferenceKind::ContentDiffers),
            difference("b", DifferenceKind::RightOnly),
            difference("c", DifferenceKind::Subdirectory),
            difference("c/d", DifferenceKind::LeftOnly),
        ];
        assert_eq!(
            summarize(&differences),
            "4 difference(s): 1 changed, 1 left-only, 1 right-only, 0 type mismatch(es)"
        );
    }
}
