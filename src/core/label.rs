//! Label - the canonical address of a build target.
//!
//! A label names a target inside a package, optionally in another
//! repository: `@repo//package/path:target`. When the target name equals the
//! last package segment it may be omitted, so `//foo/bar` and `//foo/bar:bar`
//! parse to the same value.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced when a label string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
#[error("malformed label `{label}`: {reason}")]
#[diagnostic(code(gnport::label::malformed))]
pub struct LabelError {
    pub label: String,
    pub reason: &'static str,
}

impl LabelError {
    fn new(label: &str, reason: &'static str) -> Self {
        LabelError {
            label: label.to_string(),
            reason,
        }
    }
}

/// A normalized target address.
///
/// Equality, hashing and ordering are structural, so labels can be used
/// directly as map keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label {
    repository: Option<String>,
    package: String,
    target: String,
}

impl Label {
    /// Create a label in the main repository.
    pub fn new(package: impl Into<String>, target: impl Into<String>) -> Self {
        Label {
            repository: None,
            package: package.into(),
            target: target.into(),
        }
    }

    /// Create a label that points into an external repository.
    pub fn external(
        repository: impl Into<String>,
        package: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Label {
            repository: Some(repository.into()),
            package: package.into(),
            target: target.into(),
        }
    }

    /// Parse an absolute label (`//pkg:target`, `//pkg` or `@repo//pkg:target`).
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        Self::parse_inner(s, None)
    }

    /// Parse a label that may be relative (`:target` or `target`) to `base_package`.
    pub fn parse_relative(s: &str, base_package: &str) -> Result<Self, LabelError> {
        Self::parse_inner(s, Some(base_package))
    }

    fn parse_inner(s: &str, base_package: Option<&str>) -> Result<Self, LabelError> {
        let (repository, rest) = if let Some(after_at) = s.strip_prefix('@') {
            let (repo, rest) = after_at
                .split_once("//")
                .ok_or_else(|| LabelError::new(s, "missing `//` after repository"))?;
            if repo.is_empty() {
                return Err(LabelError::new(s, "empty repository name"));
            }
            (Some(repo.to_string()), rest)
        } else if let Some(rest) = s.strip_prefix("//") {
            (None, rest)
        } else {
            let Some(base) = base_package else {
                return Err(LabelError::new(s, "missing leading `//`"));
            };
            let target = s.strip_prefix(':').unwrap_or(s);
            if target.contains(':') {
                return Err(LabelError::new(s, "more than one `:` separator"));
            }
            if target.is_empty() {
                return Err(LabelError::new(s, "empty target name"));
            }
            return Ok(Label::new(base, target));
        };

        let (package, target) = match rest.split_once(':') {
            Some((_, target)) if target.contains(':') => {
                return Err(LabelError::new(s, "more than one `:` separator"));
            }
            Some((package, target)) => (package, target),
            None => (rest, rest.rsplit('/').next().unwrap_or(rest)),
        };

        if target.is_empty() {
            return Err(LabelError::new(s, "empty target name"));
        }

        Ok(Label {
            repository,
            package: package.to_string(),
            target: target.to_string(),
        })
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// True when the label points outside the main repository.
    pub fn is_external(&self) -> bool {
        self.repository.is_some()
    }

    /// Canonical absolute form; the target is omitted when it matches the
    /// last package segment.
    pub fn format(&self) -> String {
        let mut out = String::new();
        if let Some(repo) = &self.repository {
            out.push('@');
            out.push_str(repo);
        }
        out.push_str("//");
        out.push_str(&self.package);
        let implicit = self.package.rsplit('/').next().unwrap_or(&self.package);
        if self.target != implicit {
            out.push(':');
            out.push_str(&self.target);
        }
        out
    }

    /// Format relative to `from_package`: `:target` when the label lives in
    /// that package, the absolute form otherwise.
    pub fn format_relative(&self, from_package: &str) -> String {
        if self.repository.is_none() && self.package == from_package {
            format!(":{}", self.target)
        } else {
            self.format()
        }
    }

    /// Like [`Label::format_relative`], but a same-package reference is the
    /// bare file name, as Bazel expects in `srcs` and `hdrs`.
    pub fn format_source(&self, from_package: &str) -> String {
        let formatted = self.format_relative(from_package);
        match formatted.strip_prefix(':') {
            Some(name) => name.to_string(),
            None => formatted,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.format())
    }
}

impl std::str::FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::parse(s)
    }
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.format().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Label::parse(&s).map_err(serde::de::Error::custom)
    }
}
