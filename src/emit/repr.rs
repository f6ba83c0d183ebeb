//! Starlark literal rendering.

use crate::core::Label;

/// A quoted Starlark string.
pub fn string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

/// A sorted list of quoted strings.
pub fn strings<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut quoted: Vec<String> = items.into_iter().map(|s| string(s.as_ref())).collect();
    quoted.sort();
    format!("[{}]", quoted.join(", "))
}

/// Dependency labels as seen from `package`.
pub fn labels(package: &str, labels: &[Label]) -> String {
    strings(labels.iter().map(|l| l.format_relative(package)))
}

/// Source file labels as seen from `package`: bare file names for files in
/// the package itself.
pub fn source_labels(package: &str, labels: &[Label]) -> String {
    strings(labels.iter().map(|l| l.format_source(package)))
}
