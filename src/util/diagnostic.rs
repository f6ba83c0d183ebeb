//! User-friendly diagnostic messages.
//!
//! Every fatal export error is printed with its root cause, the context
//! that explains it and the edits that would make the export go through.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the descriptor cannot be read.
    pub const REGENERATE_DESC: &str =
        "Regenerate it with `gn desc <out_dir> //* --format=json > desc.json`";

    /// Suggestion when the configuration file is invalid.
    pub const CHECK_CONFIG: &str = "Check gnport.toml, or pass `--config` explicitly";

    /// Suggestion for everything else.
    pub const VERBOSE: &str = "Run with `--verbose` for more details";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("`//a:a` depends on unrecognized vendored package `//third_party/foo`")
            .with_context("package `third_party/foo` is not in the policy table")
            .with_suggestion("Add it to `[policy] allowed_vendored`")
            .with_location("gnport.toml");

        let output = diag.format(false);
        assert!(output.starts_with("error: `//a:a` depends on"));
        assert!(output.contains("  --> gnport.toml"));
        assert!(output.contains("  = package `third_party/foo`"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Add it to"));
    }

    #[test]
    fn test_no_suggestions_block() {
        let output = Diagnostic::error("boom").format(false);
        assert_eq!(output, "error: boom\n");
    }

    #[test]
    fn test_color_output() {
        let output = Diagnostic::error("boom").format(true);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m: boom"));
    }
}
