//! Source file ownership.
//!
//! GN lists sources as paths relative to the source root; Bazel needs them as
//! labels in the package that owns the file. The owner is the package whose
//! directory is the longest prefix of the path. Files outside every package
//! directory are addressed through a synthetic package named after their
//! directory, and any file referenced from another package gets exported by
//! its owner.

use crate::core::{Label, Package, Workspace};

/// Suffix that routes a source into `hdrs` instead of `srcs`.
pub const HEADER_SUFFIX: &str = ".h";

/// Package directories with a trailing `/`, sorted for [`resolve_source`].
///
/// The trailing separator keeps `a/` from matching `ab/file.cc`.
pub fn package_dirs<'a>(packages: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut dirs: Vec<String> = packages.into_iter().map(|p| format!("{}/", p)).collect();
    dirs.sort();
    dirs.dedup();
    dirs
}

/// Find the label for `source` given sorted package directories.
///
/// The insertion point of a file in the sorted list comes right after the
/// package that contains it, as long as package directories do not nest.
pub fn resolve_source(package_dirs: &[String], source: &str) -> Label {
    let i = package_dirs.partition_point(|dir| dir.as_str() < source);
    if i == 0 {
        return resolve_orphan_source(source);
    }
    let dir = &package_dirs[i - 1];
    match source.strip_prefix(dir.as_str()) {
        Some(rest) if !rest.is_empty() => Label::new(dir.trim_end_matches('/'), rest),
        _ => resolve_orphan_source(source),
    }
}

/// Label for a file that belongs to no package: its directory becomes the
/// package and its basename the target.
pub fn resolve_orphan_source(source: &str) -> Label {
    match source.rsplit_once('/') {
        Some((dir, name)) => Label::new(dir.trim_end_matches('/'), name),
        None => Label::new("", source),
    }
}

pub fn is_header(path: &str) -> bool {
    path.ends_with(HEADER_SUFFIX)
}

/// Resolve every target's raw sources into `srcs`/`hdrs` labels, keeping
/// their conditions, and export cross-package files from their owners.
///
/// Returns the number of files exported across packages.
pub fn resolve_sources(ws: &mut Workspace) -> usize {
    let dirs = package_dirs(ws.packages().map(Package::name));
    let mut exports = Vec::new();

    for pkg in ws.packages_mut() {
        let pkg_name = pkg.name().to_string();
        for target in pkg.targets_mut() {
            let resolved: Vec<(String, Label, bool)> = target
                .raw_sources
                .items()
                .map(|(cond, source)| {
                    (cond.to_string(), resolve_source(&dirs, source), is_header(source))
                })
                .collect();

            for (cond, label, header) in resolved {
                if label.package() != pkg_name {
                    exports.push(label.clone());
                }
                if header {
                    target.hdrs.append_conditional(&cond, label);
                } else {
                    target.srcs.append_conditional(&cond, label);
                }
            }
        }
    }

    let count = exports.len();
    for label in exports {
        tracing::debug!("exporting {} from package `{}`", label.target(), label.package());
        ws.package_mut(label.package())
            .export_files
            .insert(label.target().to_string());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetKind;
    use proptest::prelude::*;

    fn dirs(names: &[&str]) -> Vec<String> {
        package_dirs(names.iter().copied())
    }

    /// Reference implementation: scan every package for the longest match.
    fn brute_force(packages: &[&str], source: &str) -> Label {
        packages
            .iter()
            .filter_map(|p| {
                let rest = source.strip_prefix(&format!("{}/", p))?;
                (!rest.is_empty()).then(|| (p.len(), Label::new(*p, rest)))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, label)| label)
            .unwrap_or_else(|| resolve_orphan_source(source))
    }

    #[test]
    fn test_resolve_in_package() {
        let dirs = dirs(&["api", "api/audio", "rtc_base"]);
        assert_eq!(resolve_source(&dirs, "rtc_base/checks.cc"), Label::new("rtc_base", "checks.cc"));
        assert_eq!(resolve_source(&dirs, "api/audio/echo.h"), Label::new("api/audio", "echo.h"));
    }

    #[test]
    fn test_resolve_nested_path_in_package() {
        let dirs = dirs(&["modules/audio_processing"]);
        assert_eq!(
            resolve_source(&dirs, "modules/audio_processing/aec3/fft.cc"),
            Label::new("modules/audio_processing", "aec3/fft.cc")
        );
    }

    #[test]
    fn test_sibling_with_shared_prefix() {
        let dirs = dirs(&["a", "ab"]);
        assert_eq!(resolve_source(&dirs, "ab/x.cc"), Label::new("ab", "x.cc"));
        assert_eq!(resolve_source(&dirs, "a/x.cc"), Label::new("a", "x.cc"));
        assert_eq!(resolve_source(&dirs, "abc/x.cc"), Label::new("abc", "x.cc"));
    }

    #[test]
    fn test_orphan_source() {
        let dirs = dirs(&["a", "a/b"]);
        assert_eq!(resolve_source(&dirs, "z/w.cc"), Label::new("z", "w.cc"));
        assert_eq!(resolve_source(&dirs, "top.cc"), Label::new("", "top.cc"));
        assert_eq!(resolve_source(&[], "x/y/z.h"), Label::new("x/y", "z.h"));
    }

    #[test]
    fn test_resolve_sources_classifies_and_exports() {
        let mut ws = Workspace::new();
        let a = Label::new("a", "a");
        ws.target_mut(&a).kind = Some(TargetKind::Library);
        ws.add_source(&a, "a/x.cc");
        ws.add_source(&a, "a/x.h");
        ws.add_source(&a, "common/util.cc");
        ws.target_mut(&a)
            .raw_sources
            .append_conditional("//:neon_build", "a/neon.cc".to_string());

        let exported = resolve_sources(&mut ws);
        assert_eq!(exported, 1);

        let target = ws.target(&a).unwrap();
        assert!(target.hdrs.unconditioned().contains(&Label::new("a", "x.h")));
        assert!(target.srcs.unconditioned().contains(&Label::new("a", "x.cc")));
        assert!(target.srcs.unconditioned().contains(&Label::new("common", "util.cc")));
        assert!(target.srcs.conditional()["//:neon_build"].contains(&Label::new("a", "neon.cc")));

        let common = ws.package("common").unwrap();
        assert!(common.export_files.contains("util.cc"));
        assert_eq!(common.target_count(), 0);
    }

    const POOL: &[&str] = &["a", "ab", "a-b", "b/c", "b/d", "ba", "c/x/y", "d"];

    proptest! {
        #[test]
        fn prop_matches_brute_force(
            mask in prop::collection::vec(any::<bool>(), POOL.len()),
            order in Just(POOL.to_vec()).prop_shuffle(),
            dir_index in 0..POOL.len() + 3,
            file in "[a-z]{1,3}(/[a-z]{1,3})?\\.(cc|h)",
        ) {
            let packages: Vec<&str> = order
                .iter()
                .copied()
                .filter(|p| mask[POOL.iter().position(|q| q == p).unwrap()])
                .collect();
            let extra = ["", "b", "zz"];
            let dir = POOL.get(dir_index).copied().unwrap_or_else(|| extra[dir_index - POOL.len()]);
            let source = if dir.is_empty() { file.clone() } else { format!("{}/{}", dir, file) };

            let sorted = package_dirs(packages.iter().copied());
            prop_assert_eq!(resolve_source(&sorted, &source), brute_force(&packages, &source));
        }
    }
}
