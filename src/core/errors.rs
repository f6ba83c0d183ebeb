//! Export error types and diagnostics.

use thiserror::Error;

use crate::core::{Label, TargetKind};
use crate::util::diagnostic::Diagnostic;

/// Fatal error while building, merging or emitting the target graph.
///
/// Every variant describes input the exporter does not know how to handle;
/// none of them are retried.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ExportError {
    #[error("`{label}` is reachable but missing from the GN descriptor")]
    #[diagnostic(code(gnport::closure::missing_target))]
    MissingTarget { label: Label },

    #[error("`{from}` depends on `{label}`, which already names an external repository")]
    #[diagnostic(code(gnport::policy::unexpected_repository))]
    UnexpectedRepository { label: Label, from: Label },

    #[error("`{label}` has unsupported GN target type `{kind}`")]
    #[diagnostic(code(gnport::closure::unsupported_kind))]
    UnsupportedKind { label: Label, kind: String },

    #[error("`{from}` depends on unrecognized vendored package `{label}`")]
    #[diagnostic(code(gnport::policy::unknown_vendored))]
    UnknownVendoredDependency { label: Label, from: Label },

    #[error("`{label}` is a {first_kind} under `{first_condition}` but a {second_kind} under `{second_condition}`")]
    #[diagnostic(code(gnport::merge::kind_mismatch))]
    KindMismatch {
        label: Label,
        first_condition: String,
        first_kind: TargetKind,
        second_condition: String,
        second_kind: TargetKind,
    },

    #[error("`{from}` depends on `{to}`, which is not a declared target")]
    #[diagnostic(code(gnport::validate::dangling_reference))]
    DanglingReference { from: Label, to: Label },

    #[error("`{label}` is referenced but never given a rule kind")]
    #[diagnostic(code(gnport::validate::untyped_target))]
    UntypedTarget { label: Label },

    #[error("formatter `{program}` failed on package `{package}`: {message}")]
    #[diagnostic(code(gnport::emit::formatter_failed))]
    FormatterFailed {
        program: String,
        package: String,
        message: String,
    },
}

impl ExportError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ExportError::MissingTarget { .. } => diag
                .with_context("every label reachable from the roots must have a descriptor entry")
                .with_suggestion("Regenerate the descriptor with `gn desc <out> //* --format=json`")
                .with_suggestion("Check the `roots` list in gnport.toml"),

            ExportError::UnexpectedRepository { .. } => diag
                .with_context("GN descriptors only reference targets in the main repository")
                .with_suggestion("Check that the descriptor was produced by `gn desc`"),

            ExportError::UnsupportedKind { kind, .. } => diag
                .with_context(format!(
                    "only `source_set`, `static_library` and `executable` are exported, got `{}`",
                    kind
                ))
                .with_suggestion("Drop the dependency with a `[policy.labels]` entry"),

            ExportError::UnknownVendoredDependency { label, .. } => diag
                .with_context(format!("package `{}` is not in the policy table", label.package()))
                .with_suggestion(format!(
                    "Add \"{}\" to `policy.allowed_vendored` to export it",
                    label.package()
                ))
                .with_suggestion("Add a `[[policy.redirects]]` or `[[policy.aliases]]` entry to map it to an external repository"),

            ExportError::KindMismatch { .. } => diag
                .with_context("a target must be the same rule kind on every platform")
                .with_suggestion("Check the GN build files for platform-dependent target types"),

            ExportError::DanglingReference { to, .. } => diag
                .with_context(format!("`{}` was kept by policy but nothing declares it", to))
                .with_suggestion("Declare it with a `[[workarounds]]` entry")
                .with_suggestion("Or drop it with a `[policy.labels]` entry"),

            ExportError::UntypedTarget { .. } => {
                diag.with_suggestion("Set `kind` in the matching `[[workarounds]]` entry")
            }

            ExportError::FormatterFailed { program, .. } => diag
                .with_suggestion(format!("Check that `{}` is installed and on PATH", program))
                .with_suggestion("Re-run with `--no-format` to inspect the unformatted output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_vendored_diagnostic() {
        let err = ExportError::UnknownVendoredDependency {
            label: Label::new("third_party/zlib", "zlib"),
            from: Label::new("rtc_base", "compression"),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("unrecognized vendored package"));
        assert!(output.contains("policy.allowed_vendored"));
        assert!(output.contains("third_party/zlib"));
    }

    #[test]
    fn test_kind_mismatch_message() {
        let err = ExportError::KindMismatch {
            label: Label::new("a", "t"),
            first_condition: "x".to_string(),
            first_kind: TargetKind::Library,
            second_condition: "y".to_string(),
            second_kind: TargetKind::Binary,
        };
        assert_eq!(
            err.to_string(),
            "`//a:t` is a cc_library under `x` but a cc_binary under `y`"
        );
    }
}
