//! Configuration file support for gnport.
//!
//! An export is described by `gnport.toml`:
//!
//! ```toml
//! roots = ["//modules/audio_processing"]
//! source_root = "../webrtc/src"
//!
//! [variants]
//! "@platforms//cpu:x86_64" = "desc.json"
//! "//:neon_build" = "descarm.json"
//!
//! [policy]
//! allowed_vendored = ["third_party/rnnoise", "third_party/pffft"]
//!
//! [emit]
//! formatter = { program = "buildifier", args = ["-type=build"] }
//! ```
//!
//! Every key is optional; missing keys take the values of the WebRTC audio
//! processing export.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Label;
use crate::emit::{EmitConfig, LicenseScanner};
use crate::ops::workarounds::{default_workarounds, Workaround};
use crate::resolver::DependencyPolicy;

/// File name looked up in the `--from` directory.
pub const CONFIG_FILE: &str = "gnport.toml";

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Labels the closure starts from
    pub roots: Vec<Label>,

    /// Condition key -> descriptor file, relative to the `--from` directory
    pub variants: BTreeMap<String, PathBuf>,

    /// Source checkout; relative paths are resolved against `--from`
    pub source_root: Option<PathBuf>,

    /// Redirect/exclude policy for dependencies
    pub policy: DependencyPolicy,

    /// Output settings
    pub emit: EmitConfig,

    /// Targets added after the variants are merged
    pub workarounds: Vec<Workaround>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            roots: [
                "//modules/audio_processing",
                "//api/audio:aec3_factory",
                "//api/task_queue:default_task_queue_factory",
                "//rtc_tools:unpack_aecdump",
            ]
            .into_iter()
            .filter_map(|l| Label::parse(l).ok())
            .collect(),
            variants: [
                ("@platforms//cpu:x86_64", "desc.json"),
                ("//:neon_build", "descarm.json"),
            ]
            .into_iter()
            .map(|(cond, file)| (cond.to_string(), PathBuf::from(file)))
            .collect(),
            source_root: None,
            policy: DependencyPolicy::default(),
            emit: EmitConfig::default(),
            workarounds: default_workarounds(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load the configuration for an export from `from`.
    ///
    /// Order of precedence:
    /// 1. `explicit` (an error if it cannot be loaded)
    /// 2. `<from>/gnport.toml`
    /// 3. Defaults
    pub fn locate(from: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("using config {}", path.display());
            return Self::load(path);
        }

        let path = from.join(CONFIG_FILE);
        if path.exists() {
            tracing::debug!("using config {}", path.display());
            Self::load(&path)
        } else {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, from.display());
            Ok(Self::default())
        }
    }

    /// Reject configurations that cannot produce an export.
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            bail!("no root labels configured");
        }
        if self.variants.is_empty() {
            bail!("no variants configured");
        }
        if let Some(cond) = self.variants.keys().find(|c| c.is_empty()) {
            bail!("variant condition `{}` must not be empty", cond);
        }
        if self.emit.build_file_name.is_empty() {
            bail!("emit.build_file_name must not be empty");
        }
        LicenseScanner::new(&self.emit.license_patterns, &self.emit.readme_prefix)?;
        Ok(())
    }

    /// The source checkout for an export read from `from`.
    pub fn source_root(&self, from: &Path) -> PathBuf {
        match &self.source_root {
            Some(root) => from.join(root),
            None => from.to_path_buf(),
        }
    }
}
