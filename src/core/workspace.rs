//! Workspace - the whole target graph for one export.
//!
//! A Workspace owns every package and target. Packages and targets are
//! created on first reference through [`Workspace::package_mut`] and
//! [`Workspace::target_mut`]; nothing outside the workspace holds mutable
//! graph state, so independent workspaces can be built on separate threads.

use std::collections::{BTreeMap, HashSet};

use crate::core::errors::ExportError;
use crate::core::{Label, Package, Target};

/// A build graph: packages, the flat list of files to copy, and generated
/// file contents that replace files from the source tree.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    packages: BTreeMap<String, Package>,

    /// Every file to copy into the output, in first-seen order
    sources: Vec<String>,
    seen_sources: HashSet<String>,

    /// Generated content keyed by source path
    source_overrides: BTreeMap<String, String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packages sorted by name.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn packages_mut(&mut self) -> impl Iterator<Item = &mut Package> {
        self.packages.values_mut()
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Get the named package, creating it if this is the first reference.
    pub fn package_mut(&mut self, name: &str) -> &mut Package {
        self.packages
            .entry(name.to_string())
            .or_insert_with(|| Package::new(name))
    }

    pub fn target(&self, label: &Label) -> Option<&Target> {
        self.packages.get(label.package())?.target(label.target())
    }

    /// Get the target for `label`, creating it (and its package) on first
    /// reference. The repository part of the label is ignored.
    pub fn target_mut(&mut self, label: &Label) -> &mut Target {
        self.package_mut(label.package()).target_mut(label.target())
    }

    /// Labels of every declared target, sorted.
    pub fn labels(&self) -> Vec<Label> {
        self.packages
            .values()
            .flat_map(|p| p.targets().map(|t| t.label().clone()))
            .collect()
    }

    pub fn target_count(&self) -> usize {
        self.packages.values().map(Package::target_count).sum()
    }

    /// Files to copy, in first-seen order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Add a file to the copy list unless it is already there.
    pub fn push_source(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.seen_sources.insert(path.clone()) {
            self.sources.push(path);
        }
    }

    /// Attach a raw source path to a target and list it for copying.
    pub fn add_source(&mut self, label: &Label, path: impl Into<String>) {
        let path = path.into();
        self.target_mut(label).raw_sources.append(path.clone());
        self.push_source(path);
    }

    /// Attach a source whose content is generated instead of copied.
    pub fn add_source_override(
        &mut self,
        label: &Label,
        path: impl Into<String>,
        content: impl Into<String>,
    ) {
        let path = path.into();
        self.add_source(label, path.clone());
        self.source_overrides.insert(path, content.into());
    }

    pub fn source_override(&self, path: &str) -> Option<&str> {
        self.source_overrides.get(path).map(String::as_str)
    }

    pub fn source_overrides(&self) -> &BTreeMap<String, String> {
        &self.source_overrides
    }

    pub(crate) fn insert_source_override(&mut self, path: String, content: String) {
        self.source_overrides.insert(path, content);
    }

    /// List each package's GN build file (e.g. `BUILD.gn`) for copying.
    pub fn add_gn_files(&mut self, file_name: &str) {
        let files: Vec<String> = self
            .packages
            .keys()
            .map(|pkg| {
                if pkg.is_empty() {
                    file_name.to_string()
                } else {
                    format!("{}/{}", pkg, file_name)
                }
            })
            .collect();
        for file in files {
            self.push_source(file);
        }
    }

    /// Check that the graph can be emitted: every target has a kind and every
    /// internal dependency names a declared target.
    pub fn validate(&self) -> Result<(), ExportError> {
        for target in self.packages.values().flat_map(Package::targets) {
            if target.kind.is_none() {
                return Err(ExportError::UntypedTarget {
                    label: target.label().clone(),
                });
            }
            for (_, dep) in target.deps.items() {
                if !dep.is_external() && self.target(dep).is_none() {
                    return Err(ExportError::DanglingReference {
                        from: target.label().clone(),
                        to: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
