//! Redirect/exclude policy for dependencies.
//!
//! While the closure is built, every dependency edge goes through
//! [`DependencyPolicy::resolve`], which either drops it, rewrites it to a
//! terminal reference that is not traversed further, or lets it through.
//! Vendored packages that the table does not mention are a hard error: a new
//! third-party dependency needs a human decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{ExportError, Label};

/// Outcome of applying the policy to one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Remove the edge entirely
    Drop,
    /// Keep the (possibly rewritten) edge but do not traverse it
    Terminal(Label),
    /// Keep the edge and traverse the dependency
    Follow(Label),
}

/// Rewrite every package under `prefix` into `repository`, with the prefix
/// removed from the package path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub prefix: String,
    pub repository: String,
}

/// Replace any dependency on one of `packages` with `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub packages: Vec<String>,
    pub label: Label,
}

/// What to do with a dependency on an exact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    /// Keep the edge but do not traverse it
    Keep,
    /// Remove the edge
    Drop,
}

/// The redirect/exclude table, checked in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyPolicy {
    pub redirects: Vec<Redirect>,
    pub drop_packages: Vec<String>,
    pub aliases: Vec<Alias>,
    /// Package prefix under which only `allowed_vendored` packages may appear
    pub vendored_prefix: Option<String>,
    pub allowed_vendored: Vec<String>,
    pub labels: BTreeMap<Label, LabelAction>,
}

impl Default for DependencyPolicy {
    fn default() -> Self {
        DependencyPolicy {
            redirects: vec![Redirect {
                prefix: "third_party/abseil-cpp/".to_string(),
                repository: "com_google_absl".to_string(),
            }],
            drop_packages: vec!["third_party/protobuf".to_string()],
            aliases: vec![Alias {
                packages: vec![
                    "third_party/libevent".to_string(),
                    "base/third_party/libevent".to_string(),
                ],
                label: Label::external("pkg_config", "libevent", "libevent"),
            }],
            vendored_prefix: Some("third_party".to_string()),
            allowed_vendored: vec![
                "third_party/rnnoise".to_string(),
                "third_party/pffft".to_string(),
            ],
            labels: [
                ("//experiments:registered_field_trials", LabelAction::Keep),
                ("//modules/audio_processing:audioproc_debug_proto", LabelAction::Keep),
                ("//:poison_default_task_queue", LabelAction::Drop),
                ("//build/config:executable_deps", LabelAction::Drop),
            ]
            .into_iter()
            .filter_map(|(label, action)| Label::parse(label).ok().map(|l| (l, action)))
            .collect(),
        }
    }
}

impl DependencyPolicy {
    /// A policy that follows every dependency unchanged.
    pub fn permissive() -> Self {
        DependencyPolicy {
            redirects: Vec::new(),
            drop_packages: Vec::new(),
            aliases: Vec::new(),
            vendored_prefix: None,
            allowed_vendored: Vec::new(),
            labels: BTreeMap::new(),
        }
    }

    /// Decide what happens to the edge `from -> dep`.
    pub fn resolve(&self, dep: &Label, from: &Label) -> Result<Resolution, ExportError> {
        if dep.is_external() {
            return Err(ExportError::UnexpectedRepository {
                label: dep.clone(),
                from: from.clone(),
            });
        }

        let package = dep.package();

        for redirect in &self.redirects {
            if let Some(rest) = package.strip_prefix(redirect.prefix.as_str()) {
                return Ok(Resolution::Terminal(Label::external(
                    redirect.repository.as_str(),
                    rest,
                    dep.target(),
                )));
            }
        }

        if self.drop_packages.iter().any(|p| p == package) {
            return Ok(Resolution::Drop);
        }

        if let Some(alias) = self
            .aliases
            .iter()
            .find(|a| a.packages.iter().any(|p| p == package))
        {
            return Ok(Resolution::Terminal(alias.label.clone()));
        }

        if let Some(prefix) = &self.vendored_prefix {
            if package.starts_with(prefix.as_str()) {
                if self.allowed_vendored.iter().any(|p| p == package) {
                    return Ok(Resolution::Follow(dep.clone()));
                }
                return Err(ExportError::UnknownVendoredDependency {
                    label: dep.clone(),
                    from: from.clone(),
                });
            }
        }

        Ok(match self.labels.get(dep) {
            Some(LabelAction::Keep) => Resolution::Terminal(dep.clone()),
            Some(LabelAction::Drop) => Resolution::Drop,
            None => Resolution::Follow(dep.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(dep: &str) -> Result<Resolution, ExportError> {
        DependencyPolicy::default().resolve(&Label::parse(dep).unwrap(), &Label::new("x", "x"))
    }

    #[test]
    fn test_abseil_redirect() {
        assert_eq!(
            resolve("//third_party/abseil-cpp/absl/strings").unwrap(),
            Resolution::Terminal(Label::external("com_google_absl", "absl/strings", "strings"))
        );
    }

    #[test]
    fn test_protobuf_dropped() {
        assert_eq!(resolve("//third_party/protobuf:protobuf_lite").unwrap(), Resolution::Drop);
    }

    #[test]
    fn test_libevent_aliases() {
        let expected = Resolution::Terminal(Label::parse("@pkg_config//libevent").unwrap());
        assert_eq!(resolve("//third_party/libevent").unwrap(), expected);
        assert_eq!(resolve("//base/third_party/libevent:libevent").unwrap(), expected);
    }

    #[test]
    fn test_allowed_vendored_followed() {
        assert_eq!(
            resolve("//third_party/rnnoise:rnn_vad").unwrap(),
            Resolution::Follow(Label::new("third_party/rnnoise", "rnn_vad"))
        );
    }

    #[test]
    fn test_unknown_vendored_is_fatal() {
        match resolve("//third_party/zlib") {
            Err(ExportError::UnknownVendoredDependency { label, from }) => {
                assert_eq!(label.package(), "third_party/zlib");
                assert_eq!(from, Label::new("x", "x"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_labels() {
        assert_eq!(
            resolve("//experiments:registered_field_trials").unwrap(),
            Resolution::Terminal(Label::new("experiments", "registered_field_trials"))
        );
        assert_eq!(resolve("//:poison_default_task_queue").unwrap(), Resolution::Drop);
        assert_eq!(resolve("//build/config:executable_deps").unwrap(), Resolution::Drop);
    }

    #[test]
    fn test_plain_dependency_followed() {
        assert_eq!(
            resolve("//rtc_base:checks").unwrap(),
            Resolution::Follow(Label::new("rtc_base", "checks"))
        );
    }

    #[test]
    fn test_external_dependency_rejected() {
        assert!(matches!(
            resolve("@foo//bar"),
            Err(ExportError::UnexpectedRepository { .. })
        ));
    }

    #[test]
    fn test_default_labels_all_parse() {
        assert_eq!(DependencyPolicy::default().labels.len(), 4);
    }

    #[test]
    fn test_policy_from_toml() {
        let policy: DependencyPolicy = toml::from_str(
            r#"
vendored_prefix = "third_party"
allowed_vendored = ["third_party/zlib"]

[[redirects]]
prefix = "third_party/boringssl/"
repository = "boringssl"

[labels]
"//a:b" = "drop"
"#,
        )
        .unwrap();

        let from = Label::new("x", "x");
        assert_eq!(
            policy.resolve(&Label::parse("//third_party/zlib").unwrap(), &from).unwrap(),
            Resolution::Follow(Label::new("third_party/zlib", "zlib"))
        );
        assert_eq!(
            policy.resolve(&Label::parse("//a:b").unwrap(), &from).unwrap(),
            Resolution::Drop
        );
        assert!(matches!(
            policy.resolve(&Label::parse("//third_party/boringssl/src:ssl").unwrap(), &from),
            Ok(Resolution::Terminal(l)) if l.repository() == Some("boringssl")
        ));
    }
}
