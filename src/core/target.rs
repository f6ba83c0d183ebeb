//! Target definitions - what gets emitted.
//!
//! A Target is one Bazel rule instance inside a package. Its list attributes
//! are [`ConditionalSet`]s so that a merged, multi-platform target can carry
//! platform-specific entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::conditional::ConditionalSet;
use crate::core::Label;

/// The kind of rule a target is emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// C/C++ library (`cc_library`)
    #[serde(alias = "cc_library")]
    Library,

    /// C/C++ executable (`cc_binary`)
    #[serde(alias = "cc_binary")]
    Binary,

    /// Protocol buffer definitions (`proto_library`)
    ProtoLibrary,

    /// C++ bindings for a `proto_library` (`cc_proto_library`)
    CcProtoLibrary,
}

impl TargetKind {
    /// The Bazel rule name.
    pub fn rule_name(&self) -> &'static str {
        match self {
            TargetKind::Library => "cc_library",
            TargetKind::Binary => "cc_binary",
            TargetKind::ProtoLibrary => "proto_library",
            TargetKind::CcProtoLibrary => "cc_proto_library",
        }
    }

    /// Whether the rule takes C/C++ compiler options.
    pub fn is_cc(&self) -> bool {
        matches!(self, TargetKind::Library | TargetKind::Binary)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// A build target under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    label: Label,

    /// Rule kind; unset until the target is traversed or configured
    pub kind: Option<TargetKind>,

    /// Non-header sources, resolved to labels
    pub srcs: ConditionalSet<Label>,

    /// Header sources, resolved to labels
    pub hdrs: ConditionalSet<Label>,

    /// Dependencies on other targets
    pub deps: ConditionalSet<Label>,

    /// Source paths relative to the source root, before resolution
    pub raw_sources: ConditionalSet<String>,
}

impl Target {
    /// Create an empty target with no kind.
    pub fn new(label: Label) -> Self {
        Target {
            label,
            kind: None,
            srcs: ConditionalSet::new(),
            hdrs: ConditionalSet::new(),
            deps: ConditionalSet::new(),
            raw_sources: ConditionalSet::new(),
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Target name within its package.
    pub fn name(&self) -> &str {
        self.label.target()
    }

    /// Record an unconditional dependency.
    pub fn append_dep(&mut self, dep: Label) {
        self.deps.append(dep);
    }
}
