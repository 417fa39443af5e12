//! Console reporting for build and check runs.
//!
//! # Output Format
//!
//! ```text
//! ============================================================
//! VALIDATION ERRORS (2)
//! ============================================================
//!   ✗ content/tools/x/index.md: missing required field 'slug'
//!   ✗ content/draft/index.md: no frontmatter found
//!
//! Generated manifest.jsonl (12 articles)
//! Generated categories.json (4 categories)
//!
//! ============================================================
//! BUILD SUMMARY
//! ============================================================
//!   Articles:   12
//!   Categories: 4
//!   Errors:     2
//!
//! Build completed with 2 error(s).
//! ```
//!
//! The exact wording is advisory; the exit status is the machine-readable
//! signal.
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure — no I/O, no side effects.

use crate::collect::ValidationError;

const RULE_WIDTH: usize = 60;

/// Counts shown in the closing summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub scanned: usize,
    pub articles: usize,
    pub categories: usize,
    pub errors: usize,
}

/// Which command produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Build,
    Check,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Mode::Build => "Build",
            Mode::Check => "Check",
        }
    }
}

fn banner(title: &str) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    vec![rule.clone(), title.to_string(), rule]
}

/// Format the error section. Empty when there are no errors.
pub fn format_errors(errors: &[ValidationError]) -> Vec<String> {
    if errors.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new()];
    lines.extend(banner(&format!("VALIDATION ERRORS ({})", errors.len())));
    lines.extend(errors.iter().map(|e| format!("  ✗ {e}")));
    lines.push(String::new());
    lines
}

/// Format the line announcing a written artifact.
pub fn format_generated(path: &str, count: usize, noun: &str) -> String {
    format!("Generated {path} ({count} {noun})")
}

/// Format the closing summary with the final status line.
pub fn format_summary(summary: &Summary, mode: Mode) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.scanned == 0 {
        lines.push("WARNING: No index.md files found".to_string());
    }
    lines.push(String::new());
    lines.extend(banner(&format!(
        "{} SUMMARY",
        mode.label().to_ascii_uppercase()
    )));
    lines.push(format!("  Articles:   {}", summary.articles));
    lines.push(format!("  Categories: {}", summary.categories));
    lines.push(format!("  Errors:     {}", summary.errors));
    lines.push(String::new());
    if summary.errors == 0 {
        lines.push(format!("{} completed successfully.", mode.label()));
    } else {
        lines.push(format!(
            "{} completed with {} error(s).",
            mode.label(),
            summary.errors
        ));
    }
    lines
}

pub fn print_errors(errors: &[ValidationError]) {
    for line in format_errors(errors) {
        println!("{}", line);
    }
}

pub fn print_generated(path: &str, count: usize, noun: &str) {
    println!("{}", format_generated(path, count, noun));
}

pub fn print_summary(summary: &Summary, mode: Mode) {
    for line in format_summary(summary, mode) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(msg: &str) -> ValidationError {
        ValidationError {
            post: "content/x/index.md".into(),
            message: msg.into(),
        }
    }

    #[test]
    fn no_errors_no_section() {
        assert!(format_errors(&[]).is_empty());
    }

    #[test]
    fn error_section_lists_every_error() {
        let lines = format_errors(&[error("a: one"), error("b: two")]);
        assert!(lines.contains(&"VALIDATION ERRORS (2)".to_string()));
        assert!(lines.contains(&"  ✗ a: one".to_string()));
        assert!(lines.contains(&"  ✗ b: two".to_string()));
        assert_eq!(lines.iter().filter(|l| l.starts_with("  ✗")).count(), 2);
    }

    #[test]
    fn banner_rules_are_sixty_wide() {
        let lines = banner("X");
        assert_eq!(lines[0].len(), 60);
        assert_eq!(lines[0], lines[2]);
    }

    #[test]
    fn generated_line() {
        assert_eq!(
            format_generated("manifest.jsonl", 3, "articles"),
            "Generated manifest.jsonl (3 articles)"
        );
    }

    #[test]
    fn summary_success() {
        let summary = Summary {
            scanned: 3,
            articles: 3,
            categories: 2,
            errors: 0,
        };
        let lines = format_summary(&summary, Mode::Build);
        assert!(lines.contains(&"BUILD SUMMARY".to_string()));
        assert!(lines.contains(&"  Articles:   3".to_string()));
        assert!(lines.contains(&"  Categories: 2".to_string()));
        assert_eq!(lines.last().unwrap(), "Build completed successfully.");
        assert!(!lines.iter().any(|l| l.starts_with("WARNING")));
    }

    #[test]
    fn summary_with_errors() {
        let summary = Summary {
            scanned: 2,
            articles: 1,
            categories: 1,
            errors: 4,
        };
        let lines = format_summary(&summary, Mode::Check);
        assert!(lines.contains(&"CHECK SUMMARY".to_string()));
        assert_eq!(lines.last().unwrap(), "Check completed with 4 error(s).");
    }

    #[test]
    fn summary_warns_on_empty_tree() {
        let summary = Summary {
            scanned: 0,
            articles: 0,
            categories: 0,
            errors: 0,
        };
        let lines = format_summary(&summary, Mode::Build);
        assert_eq!(lines[0], "WARNING: No index.md files found");
    }
}
