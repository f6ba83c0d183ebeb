//! Package - a directory's worth of targets.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{Label, Target};

/// A Bazel package: the targets declared in one directory's BUILD file and
/// the files it exports to other packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    name: String,

    /// Targets keyed by name
    targets: BTreeMap<String, Target>,

    /// File names (relative to the package) referenced from other packages
    pub export_files: BTreeSet<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            targets: BTreeMap::new(),
            export_files: BTreeSet::new(),
        }
    }

    /// Package path relative to the workspace root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Targets sorted by name.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn targets_mut(&mut self) -> impl Iterator<Item = &mut Target> {
        self.targets.values_mut()
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// Get the named target, creating it if this is the first reference.
    pub fn target_mut(&mut self, name: &str) -> &mut Target {
        let package = &self.name;
        self.targets
            .entry(name.to_string())
            .or_insert_with(|| Target::new(Label::new(package.as_str(), name)))
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}
