//! Implementation of `gnport`: the whole export pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use rayon::prelude::*;

use crate::core::Workspace;
use crate::emit::{copy_sources, write_packages, Formatter, LicenseScanner};
use crate::gn::Descriptor;
use crate::ops::closure::load_desc;
use crate::ops::merge::merge;
use crate::ops::workarounds::apply_workarounds;
use crate::resolver::resolve_sources;
use crate::util::config::ExportConfig;

/// Options for an export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Directory holding the descriptors (and `gnport.toml`)
    pub from: PathBuf,

    /// Output directory
    pub to: PathBuf,

    /// Explicit configuration file
    pub config: Option<PathBuf>,

    /// Source checkout, overriding the configured one
    pub source_root: Option<PathBuf>,

    /// Skip the BUILD file formatter
    pub no_format: bool,
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub variants: usize,
    pub targets: usize,
    pub packages: usize,
    pub files: usize,
}

/// Run the export described by `opts`.
pub fn export(opts: &ExportOptions) -> Result<ExportSummary> {
    let config = ExportConfig::locate(&opts.from, opts.config.as_deref())?;
    config.validate()?;

    let source_root = opts
        .source_root
        .clone()
        .unwrap_or_else(|| config.source_root(&opts.from));

    let mut ws = build_workspace(&config, opts)?;

    let formatter = match (&config.emit.formatter, opts.no_format) {
        (Some(formatter), false) => Some(Formatter::new(formatter)),
        _ => None,
    };
    let packages = write_packages(&ws, &opts.to, &config.emit, formatter.as_ref())?;

    let scanner = LicenseScanner::new(&config.emit.license_patterns, &config.emit.readme_prefix)?;
    let names: Vec<String> = ws.packages().map(|p| p.name().to_string()).collect();
    for file in scanner.scan(&source_root, names.iter().map(String::as_str))? {
        ws.push_source(file);
    }

    let files = copy_sources(&ws, &source_root, &opts.to, &config.emit.include_rewrites)?;

    Ok(ExportSummary {
        variants: config.variants.len(),
        targets: ws.target_count(),
        packages,
        files,
    })
}

/// Load every variant, merge them and prepare the result for emission.
pub fn build_workspace(config: &ExportConfig, opts: &ExportOptions) -> Result<Workspace> {
    let variants = config
        .variants
        .par_iter()
        .map(|(condition, file)| -> Result<(String, Workspace)> {
            let desc = Descriptor::load(&opts.from.join(file))?;
            tracing::info!("{}: {} GN targets", condition, desc.len());
            let ws = load_desc(&desc, &config.roots, &config.policy)?;
            Ok((condition.clone(), ws))
        })
        .collect::<Result<BTreeMap<String, Workspace>>>()?;

    let mut ws = merge(&variants)?;
    ws.add_gn_files(&config.emit.gn_file_name);
    apply_workarounds(&mut ws, &config.workarounds);
    ws.validate()?;

    let exported = resolve_sources(&mut ws);
    tracing::debug!("{} sources exported across packages", exported);

    Ok(ws)
}
