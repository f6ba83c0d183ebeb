//! Copying of source, build and license files into the output tree.

use std::path::Path;

use anyhow::{Context, Result};
use regex::bytes::{NoExpand, Regex};
use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::core::Workspace;
use crate::util::fs::{list_files, read_bytes, write_bytes};

/// Literal text substitution applied to copied sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeRewrite {
    pub from: String,
    pub to: String,
}

impl IncludeRewrite {
    fn new(from: &str, to: &str) -> Self {
        IncludeRewrite {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Point vendored libevent and protobuf includes at the system copies.
pub fn default_include_rewrites() -> Vec<IncludeRewrite> {
    vec![
        IncludeRewrite::new(r#"#include "third_party/libevent/event.h""#, "#include <event.h>"),
        IncludeRewrite::new(
            r#"#include "base/third_party/libevent/event.h""#,
            "#include <event.h>",
        ),
        IncludeRewrite::new(
            r#"#include "third_party/protobuf/src/google/protobuf"#,
            r#"#include "google/protobuf"#,
        ),
    ]
}

/// License file names recognized by chromite's licensing scanner.
pub fn default_license_patterns() -> Vec<String> {
    [
        "^copyright$",
        "^copyright[.]txt$",
        "^copyright[.]regex$",
        "^copying.*$",
        "^licen[cs]e.*$",
        "^licensing.*$",
        "^ipa_font_license_agreement_v1[.]0[.]txt$",
        "^MIT-LICENSE$",
        "^PKG-INFO$",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

/// Rewrites compiled for matching on raw bytes, so files that are not
/// UTF-8 are still copied and rewritten.
struct CompiledRewrites(Vec<(Regex, Vec<u8>)>);

impl CompiledRewrites {
    fn new(rewrites: &[IncludeRewrite]) -> Result<Self> {
        let compiled = rewrites
            .iter()
            .map(|r| {
                let re = Regex::new(&regex::escape(&r.from))
                    .with_context(|| format!("invalid include rewrite `{}`", r.from))?;
                Ok((re, r.to.as_bytes().to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CompiledRewrites(compiled))
    }

    fn apply(&self, content: &[u8]) -> Vec<u8> {
        self.0.iter().fold(content.to_vec(), |acc, (re, to)| {
            re.replace_all(&acc, NoExpand(to)).into_owned()
        })
    }
}

/// Apply every rewrite, in order, to all occurrences in `content`.
pub fn apply_rewrites(content: &[u8], rewrites: &[IncludeRewrite]) -> Result<Vec<u8>> {
    Ok(CompiledRewrites::new(rewrites)?.apply(content))
}

/// Write every listed source into `to`: override content when the workspace
/// has one, the file under `from` otherwise. Returns the number of files.
pub fn copy_sources(
    ws: &Workspace,
    from: &Path,
    to: &Path,
    rewrites: &[IncludeRewrite],
) -> Result<usize> {
    let rewrites = CompiledRewrites::new(rewrites)?;
    for source in ws.sources() {
        let content = match ws.source_override(source) {
            Some(content) => content.as_bytes().to_vec(),
            None => read_bytes(&from.join(source))?,
        };
        write_bytes(&to.join(source), &rewrites.apply(&content))?;
    }
    tracing::info!("copied {} files", ws.sources().len());
    Ok(ws.sources().len())
}

/// Finds license and readme files by name.
#[derive(Debug, Clone)]
pub struct LicenseScanner {
    patterns: RegexSet,
    readme_prefix: String,
}

impl LicenseScanner {
    /// Patterns match the whole file name, case-insensitively.
    pub fn new(patterns: &[String], readme_prefix: &str) -> Result<Self> {
        let patterns = patterns.iter().map(|p| format!("(?i){}", p));
        let patterns = RegexSet::new(patterns).context("invalid license file pattern")?;
        Ok(LicenseScanner {
            patterns,
            readme_prefix: readme_prefix.to_string(),
        })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        (!self.readme_prefix.is_empty() && file_name.starts_with(&self.readme_prefix))
            || self.patterns.is_match(file_name)
    }

    /// Matching files directly inside each package directory under `root`,
    /// as paths relative to `root`. Missing directories are skipped.
    pub fn scan<'a>(
        &self,
        root: &Path,
        packages: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for pkg in packages {
            let dir = root.join(pkg);
            if !dir.is_dir() {
                tracing::debug!("skipping license scan of missing {}", dir.display());
                continue;
            }
            for path in list_files(&dir)? {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if self.matches(name) {
                    found.push(if pkg.is_empty() {
                        name.to_string()
                    } else {
                        format!("{}/{}", pkg, name)
                    });
                }
            }
        }
        Ok(found)
    }
}
