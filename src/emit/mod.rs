//! Emission of the Bazel workspace.
//!
//! - [`build_file`] renders one package to BUILD text.
//! - [`format`] pipes that text through an external formatter.
//! - [`files`] copies sources and license files into the output tree.
//! - [`repr`] renders Starlark literals.

pub mod build_file;
pub mod files;
pub mod format;
pub mod repr;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{ExportError, Label, Workspace};
use crate::util::fs::write_string;

pub use build_file::render_package;
pub use files::{apply_rewrites, copy_sources, IncludeRewrite, LicenseScanner};
pub use format::{Formatter, FormatterConfig};

const DEFAULT_PREAMBLE: &str = r#"# Copyright 2023 The ChromiumOS Authors
# Use of this source code is governed by a BSD-style license that can be
# found in the LICENSE file.

load("//:defs.bzl", "COPTS", "AVX2_COPTS", "require_condition")

package(
    default_visibility = ["//:__subpackages__"],
)

buildozer_template(
    name = "avx2_template",
    copts = COPTS + AVX2_COPTS,
    target_compatible_with = ["@platforms//cpu:x86_64"],
)

buildozer_template(
    name = "neon_template",
    target_compatible_with = require_condition("//:neon_build"),
)
"#;

/// How the output tree is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Formatter for generated BUILD files; `None` writes them unformatted
    pub formatter: Option<FormatterConfig>,

    /// Name of the generated build file in each package
    pub build_file_name: String,

    /// Name of the GN build file copied from each package
    pub gn_file_name: String,

    /// Text at the top of every generated build file
    pub preamble: String,

    /// Expression assigned to `copts` of C/C++ rules
    pub copts: Option<String>,

    /// Substitutions applied to every copied source
    pub include_rewrites: Vec<IncludeRewrite>,

    /// Per-target `visibility` overrides
    pub visibility: BTreeMap<Label, Vec<String>>,

    /// Case-insensitive file name patterns of license files to copy
    pub license_patterns: Vec<String>,

    /// File name prefix of readme files to copy
    pub readme_prefix: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            formatter: Some(FormatterConfig::default()),
            build_file_name: "BUILD.bazel".to_string(),
            gn_file_name: "BUILD.gn".to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            copts: Some("COPTS".to_string()),
            include_rewrites: files::default_include_rewrites(),
            visibility: [(
                Label::new("rtc_tools", "unpack_aecdump"),
                vec![
                    "//:__subpackages__".to_string(),
                    "@adhd//:__subpackages__".to_string(),
                ],
            )]
            .into_iter()
            .collect(),
            license_patterns: files::default_license_patterns(),
            readme_prefix: "README".to_string(),
        }
    }
}

/// Render, format and write the build file of every package. Returns the
/// number of files written.
///
/// Packages are rendered and formatted in parallel; nothing is written
/// unless all of them succeed.
pub fn write_packages(
    ws: &Workspace,
    to: &Path,
    config: &EmitConfig,
    formatter: Option<&Formatter>,
) -> Result<usize> {
    let packages: Vec<_> = ws.packages().collect();
    let rendered = packages
        .par_iter()
        .map(|pkg| {
            let text = render_package(pkg, config)?;
            match formatter {
                Some(f) => f.format(pkg.name(), &text),
                None => Ok(text),
            }
        })
        .collect::<Result<Vec<String>, ExportError>>()?;

    for (pkg, text) in packages.iter().zip(&rendered) {
        let path = to.join(pkg.name()).join(&config.build_file_name);
        tracing::debug!("writing {}", path.display());
        write_string(&path, text)?;
    }

    tracing::info!("wrote {} build files", rendered.len());
    Ok(rendered.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetKind;
    use tempfile::TempDir;

    #[test]
    fn test_write_packages_unformatted() {
        let tmp = TempDir::new().unwrap();
        let mut ws = Workspace::new();
        ws.target_mut(&Label::new("", "root")).kind = Some(TargetKind::Library);
        ws.target_mut(&Label::new("a/b", "b")).kind = Some(TargetKind::Binary);

        let written = write_packages(&ws, tmp.path(), &EmitConfig::default(), None).unwrap();
        assert_eq!(written, 2);

        let root = std::fs::read_to_string(tmp.path().join("BUILD.bazel")).unwrap();
        assert!(root.contains("cc_library(\n    name = \"root\","));
        let nested = std::fs::read_to_string(tmp.path().join("a/b/BUILD.bazel")).unwrap();
        assert!(nested.contains("cc_binary("));
    }

    #[test]
    fn test_emit_config_from_toml() {
        let config: EmitConfig = toml::from_str(
            r#"
            build_file_name = "BUILD"
            copts = "MY_COPTS"

            [formatter]
            program = "buildifier"
            args = ["-type=build", "-lint=off"]

            [visibility]
            "//a:a" = ["//visibility:public"]
            "#,
        )
        .unwrap();

        assert_eq!(config.build_file_name, "BUILD");
        assert_eq!(config.gn_file_name, "BUILD.gn");
        assert_eq!(config.formatter.unwrap().args.len(), 2);
        assert_eq!(config.visibility.len(), 1);
        assert_eq!(config.include_rewrites, files::default_include_rewrites());
    }
}
