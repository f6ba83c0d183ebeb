//! BUILD file rendering.

use crate::core::{ExportError, Label, Package, Target};
use crate::emit::{repr, EmitConfig};

/// Render `pkg` as BUILD text: the preamble, its exported files, then one
/// rule per target sorted by name. The output is valid but unformatted.
pub fn render_package(pkg: &Package, config: &EmitConfig) -> Result<String, ExportError> {
    let mut out = String::new();
    out.push_str(&config.preamble);

    if !pkg.export_files.is_empty() {
        out.push_str(&format!("\nexports_files({})\n", repr::strings(&pkg.export_files)));
    }

    for target in pkg.targets() {
        render_target(&mut out, target, config)?;
    }

    Ok(out)
}

fn render_target(out: &mut String, target: &Target, config: &EmitConfig) -> Result<(), ExportError> {
    let kind = target.kind.ok_or_else(|| ExportError::UntypedTarget {
        label: target.label().clone(),
    })?;
    let package = target.label().package();

    out.push_str(&format!("\n{}(\n", kind.rule_name()));
    out.push_str(&format!("    name = {},\n", repr::string(target.name())));

    if !target.deps.is_empty() {
        let deps = target
            .deps
            .render(|labels: &[Label]| repr::labels(package, labels));
        out.push_str(&format!("    deps = {},\n", deps));
    }
    if !target.hdrs.is_empty() {
        let hdrs = target
            .hdrs
            .render(|labels: &[Label]| repr::source_labels(package, labels));
        out.push_str(&format!("    hdrs = {},\n", hdrs));
    }
    if !target.srcs.is_empty() {
        let srcs = target
            .srcs
            .render(|labels: &[Label]| repr::source_labels(package, labels));
        out.push_str(&format!("    srcs = {},\n", srcs));
    }

    if kind.is_cc() {
        if let Some(copts) = &config.copts {
            out.push_str(&format!("    copts = {},\n", copts));
        }
    }
    if let Some(visibility) = config.visibility.get(target.label()) {
        out.push_str(&format!("    visibility = {},\n", repr::strings(visibility)));
    }

    out.push_str(")\n");
    Ok(())
}
