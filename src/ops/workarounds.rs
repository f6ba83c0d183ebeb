//! Hand-written targets patched into the merged workspace.
//!
//! Some targets cannot be derived from the descriptors: generated headers
//! whose generator is not exported, and protobuf rules GN expresses as
//! actions. They are configured as [`Workaround`]s and applied after the
//! variants are merged.

use serde::{Deserialize, Serialize};

use crate::core::{Label, TargetKind, Workspace};

/// A source file whose content is written out instead of copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOverride {
    pub path: String,
    pub content: String,
}

/// An extra target, or extra attributes for an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workaround {
    pub label: Label,

    #[serde(default)]
    pub kind: Option<TargetKind>,

    #[serde(default)]
    pub deps: Vec<Label>,

    /// Source paths relative to the source root
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub overrides: Vec<SourceOverride>,
}

impl Workaround {
    pub fn new(label: Label, kind: TargetKind) -> Self {
        Workaround {
            label,
            kind: Some(kind),
            deps: Vec::new(),
            sources: Vec::new(),
            overrides: Vec::new(),
        }
    }

    fn with_dep(mut self, dep: Label) -> Self {
        self.deps.push(dep);
        self
    }

    fn with_source(mut self, path: &str) -> Self {
        self.sources.push(path.to_string());
        self
    }

    fn with_override(mut self, path: &str, content: &str) -> Self {
        self.overrides.push(SourceOverride {
            path: path.to_string(),
            content: content.to_string(),
        });
        self
    }
}

const REGISTERED_FIELD_TRIALS_H: &str = r#"// This file was automatically generated. Do not edit.

#ifndef GEN_REGISTERED_FIELD_TRIALS_H_
#define GEN_REGISTERED_FIELD_TRIALS_H_

#include "absl/strings/string_view.h"

namespace webrtc {

inline constexpr absl::string_view kRegisteredFieldTrials[] = {
    "",
};

}  // namespace webrtc

#endif  // GEN_REGISTERED_FIELD_TRIALS_H_
"#;

/// Targets needed by the audio processing export.
pub fn default_workarounds() -> Vec<Workaround> {
    let debug_proto = Label::new("modules/audio_processing", "debug_proto");
    vec![
        Workaround::new(
            Label::new("experiments", "registered_field_trials"),
            TargetKind::Library,
        )
        .with_override(
            "experiments/registered_field_trials.h",
            REGISTERED_FIELD_TRIALS_H,
        ),
        Workaround::new(debug_proto.clone(), TargetKind::ProtoLibrary)
            .with_source("modules/audio_processing/debug.proto"),
        Workaround::new(
            Label::new("modules/audio_processing", "audioproc_debug_proto"),
            TargetKind::CcProtoLibrary,
        )
        .with_dep(debug_proto),
    ]
}

/// Apply `workarounds` in order. Targets are created if missing; a kind, when
/// given, replaces the traversed one.
pub fn apply_workarounds(ws: &mut Workspace, workarounds: &[Workaround]) {
    for workaround in workarounds {
        tracing::debug!("applying workaround for `{}`", workaround.label);

        let target = ws.target_mut(&workaround.label);
        if let Some(kind) = workaround.kind {
            target.kind = Some(kind);
        }
        for dep in &workaround.deps {
            target.append_dep(dep.clone());
        }

        for source in &workaround.sources {
            ws.add_source(&workaround.label, source.as_str());
        }
        for o in &workaround.overrides {
            ws.add_source_override(&workaround.label, o.path.as_str(), o.content.as_str());
        }
    }
}
