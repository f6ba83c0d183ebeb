//! Decoding of `gn desc --format=json` output.
//!
//! The descriptor is a JSON object keyed by target label. Only the fields the
//! exporter needs are decoded; everything else GN emits is ignored.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::{Label, LabelError};

/// Error while decoding a descriptor.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum DescError {
    #[error("invalid descriptor JSON")]
    #[diagnostic(code(gnport::desc::json))]
    Json(#[from] serde_json::Error),

    #[error("invalid label in {context}")]
    #[diagnostic(code(gnport::desc::label))]
    InvalidLabel {
        context: String,
        #[source]
        source: LabelError,
    },

    #[error("`{label}` has invalid `public` value `{value}` (expected a list or \"*\")")]
    #[diagnostic(code(gnport::desc::public))]
    InvalidPublic { label: Label, value: String },
}

/// GN target type (the `type` field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum GnTargetType {
    SourceSet,
    StaticLibrary,
    SharedLibrary,
    Executable,
    Group,
    Action,
    ActionForeach,
    Copy,
    GeneratedFile,
    Other(String),
}

impl From<String> for GnTargetType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "source_set" => GnTargetType::SourceSet,
            "static_library" => GnTargetType::StaticLibrary,
            "shared_library" => GnTargetType::SharedLibrary,
            "executable" => GnTargetType::Executable,
            "group" => GnTargetType::Group,
            "action" => GnTargetType::Action,
            "action_foreach" => GnTargetType::ActionForeach,
            "copy" => GnTargetType::Copy,
            "generated_file" => GnTargetType::GeneratedFile,
            _ => GnTargetType::Other(s),
        }
    }
}

impl GnTargetType {
    pub fn as_str(&self) -> &str {
        match self {
            GnTargetType::SourceSet => "source_set",
            GnTargetType::StaticLibrary => "static_library",
            GnTargetType::SharedLibrary => "shared_library",
            GnTargetType::Executable => "executable",
            GnTargetType::Group => "group",
            GnTargetType::Action => "action",
            GnTargetType::ActionForeach => "action_foreach",
            GnTargetType::Copy => "copy",
            GnTargetType::GeneratedFile => "generated_file",
            GnTargetType::Other(s) => s,
        }
    }
}

impl fmt::Display for GnTargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of a target's headers are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicHeaders {
    /// GN's `"*"`: every source is public; nothing extra to record
    All,
    /// An explicit list of public header paths
    Listed(Vec<String>),
}

/// One target as described by GN. Read-only input to the closure builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTarget {
    pub label: Label,
    pub deps: Vec<Label>,
    pub testonly: bool,
    pub kind: GnTargetType,
    /// Source paths relative to the source root
    pub sources: Vec<String>,
    pub public: PublicHeaders,
}

#[derive(Deserialize)]
struct RawTarget {
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    testonly: bool,
    #[serde(rename = "type")]
    kind: GnTargetType,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    public: Option<RawPublic>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPublic {
    Wildcard(String),
    Listed(Vec<String>),
}

/// A decoded descriptor for one platform variant.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    targets: HashMap<Label, ExternalTarget>,
}

impl Descriptor {
    /// Decode a descriptor from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DescError> {
        let raw: HashMap<String, RawTarget> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Decode a descriptor from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, DescError> {
        let raw: HashMap<String, RawTarget> = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Load and decode a descriptor file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open descriptor: {}", path.display()))?;
        let desc = Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("failed to decode descriptor: {}", path.display()))?;
        tracing::debug!("decoded {} GN targets from {}", desc.len(), path.display());
        Ok(desc)
    }

    fn from_raw(raw: HashMap<String, RawTarget>) -> Result<Self, DescError> {
        let mut targets = HashMap::with_capacity(raw.len());
        for (key, raw_target) in raw {
            let label = Label::parse(&key).map_err(|source| DescError::InvalidLabel {
                context: "descriptor key".to_string(),
                source,
            })?;
            let target = decode_target(label.clone(), raw_target)?;
            targets.insert(label, target);
        }
        Ok(Descriptor { targets })
    }

    pub fn get(&self, label: &Label) -> Option<&ExternalTarget> {
        self.targets.get(label)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

fn decode_target(label: Label, raw: RawTarget) -> Result<ExternalTarget, DescError> {
    let deps = raw
        .deps
        .iter()
        .map(|dep| {
            Label::parse_relative(dep, label.package()).map_err(|source| DescError::InvalidLabel {
                context: format!("deps of `{}`", label),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let public = match raw.public {
        None => PublicHeaders::All,
        Some(RawPublic::Wildcard(s)) if s == "*" => PublicHeaders::All,
        Some(RawPublic::Wildcard(value)) => return Err(DescError::InvalidPublic { label, value }),
        Some(RawPublic::Listed(paths)) => {
            PublicHeaders::Listed(paths.iter().map(|p| source_path(p)).collect())
        }
    };

    Ok(ExternalTarget {
        deps,
        testonly: raw.testonly,
        kind: raw.kind,
        sources: raw.sources.iter().map(|p| source_path(p)).collect(),
        public,
        label,
    })
}

/// GN writes source-absolute paths (`//a/b.cc`); the exporter works with
/// paths relative to the source root.
fn source_path(path: &str) -> String {
    path.strip_prefix("//").unwrap_or(path).to_string()
}
