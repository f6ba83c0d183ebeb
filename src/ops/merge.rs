//! Merging of per-platform workspaces into one conditional workspace.
//!
//! Each variant workspace is keyed by the condition (a `config_setting`
//! label) under which it applies. Every target field is merged with
//! [`merge_conditional`], so values shared by all variants stay flat and the
//! rest end up in one `select()` branch per variant.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{
    merge_conditional, ConditionalSet, ExportError, Label, Target, TargetKind, Workspace,
};

/// Merge single-variant workspaces keyed by condition.
///
/// A target missing from a variant contributes an empty input for that
/// variant. Targets must have the same kind in every variant that defines
/// them.
pub fn merge(variants: &BTreeMap<String, Workspace>) -> Result<Workspace, ExportError> {
    let mut merged = Workspace::new();

    for ws in variants.values() {
        for source in ws.sources() {
            merged.push_source(source.as_str());
        }
        for (path, content) in ws.source_overrides() {
            merged.insert_source_override(path.clone(), content.clone());
        }
        for pkg in ws.packages() {
            merged
                .package_mut(pkg.name())
                .export_files
                .extend(pkg.export_files.iter().cloned());
        }
    }

    let labels: BTreeSet<Label> = variants.values().flat_map(Workspace::labels).collect();

    for label in &labels {
        let kind = merged_kind(label, variants)?;

        let target = merged.target_mut(label);
        target.kind = kind;
        target.deps = merge_field(label, variants, |t| &t.deps);
        target.srcs = merge_field(label, variants, |t| &t.srcs);
        target.hdrs = merge_field(label, variants, |t| &t.hdrs);
        target.raw_sources = merge_field(label, variants, |t| &t.raw_sources);
    }

    tracing::info!(
        "merged {} variants into {} targets",
        variants.len(),
        merged.target_count()
    );

    Ok(merged)
}

fn merged_kind(
    label: &Label,
    variants: &BTreeMap<String, Workspace>,
) -> Result<Option<TargetKind>, ExportError> {
    let mut first: Option<(&str, TargetKind)> = None;
    for (condition, ws) in variants {
        let Some(kind) = ws.target(label).and_then(|t| t.kind) else {
            continue;
        };
        match first {
            None => first = Some((condition.as_str(), kind)),
            Some((first_condition, first_kind)) if first_kind != kind => {
                return Err(ExportError::KindMismatch {
                    label: label.clone(),
                    first_condition: first_condition.to_string(),
                    first_kind,
                    second_condition: condition.clone(),
                    second_kind: kind,
                });
            }
            Some(_) => {}
        }
    }
    Ok(first.map(|(_, kind)| kind))
}

fn merge_field<T, F>(
    label: &Label,
    variants: &BTreeMap<String, Workspace>,
    field: F,
) -> ConditionalSet<T>
where
    T: Ord + Clone,
    F: Fn(&Target) -> &ConditionalSet<T>,
{
    let inputs: BTreeMap<String, BTreeSet<T>> = variants
        .iter()
        .map(|(condition, ws)| {
            let values = ws
                .target(label)
                .map(|t| field(t).values())
                .unwrap_or_default();
            (condition.clone(), values)
        })
        .collect();
    merge_conditional(&inputs)
}
