//! Dependency closure of the root targets for one platform variant.
//!
//! Starting from the roots, every reachable GN target becomes a Bazel target
//! with its dependencies (after the redirect/exclude policy) and raw sources.
//! Labels are marked as queued before they are processed, so cyclic input
//! terminates and each label is visited once.

use std::collections::{HashSet, VecDeque};

use crate::core::{ExportError, Label, TargetKind, Workspace};
use crate::gn::{Descriptor, ExternalTarget, GnTargetType, PublicHeaders};
use crate::resolver::{DependencyPolicy, Resolution};

/// Order in which queued labels are popped. The resulting graph is the same
/// either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueueOrder {
    #[default]
    Lifo,
    Fifo,
}

/// A traversed variant.
#[derive(Debug, Clone)]
pub struct Closure {
    pub workspace: Workspace,

    /// Labels in the order they were processed
    pub visited: Vec<Label>,
}

/// Build the workspace for one descriptor.
pub fn load_desc(
    desc: &Descriptor,
    roots: &[Label],
    policy: &DependencyPolicy,
) -> Result<Workspace, ExportError> {
    build_closure(desc, roots, policy, QueueOrder::default()).map(|c| c.workspace)
}

/// Traverse `desc` from `roots`, popping the worklist in `order`.
pub fn build_closure(
    desc: &Descriptor,
    roots: &[Label],
    policy: &DependencyPolicy,
    order: QueueOrder,
) -> Result<Closure, ExportError> {
    let mut queue = VecDeque::new();
    let mut queued = HashSet::new();
    for root in roots {
        if queued.insert(root.clone()) {
            queue.push_back(root.clone());
        }
    }

    let mut ws = Workspace::new();
    let mut visited = Vec::new();

    loop {
        let next = match order {
            QueueOrder::Lifo => queue.pop_back(),
            QueueOrder::Fifo => queue.pop_front(),
        };
        let Some(label) = next else { break };

        let gn_target = desc.get(&label).ok_or_else(|| ExportError::MissingTarget {
            label: label.clone(),
        })?;
        if gn_target.testonly {
            tracing::warn!("testonly target `{}` is reachable from the roots", label);
        }

        for dep in &gn_target.deps {
            let (dep, follow) = match policy.resolve(dep, &label)? {
                Resolution::Drop => {
                    tracing::debug!("dropping dependency `{}` -> `{}`", label, dep);
                    continue;
                }
                Resolution::Terminal(dep) => (dep, false),
                Resolution::Follow(dep) => (dep, true),
            };

            ws.target_mut(&label).append_dep(dep.clone());

            if follow && !dep.is_external() && queued.insert(dep.clone()) {
                queue.push_back(dep);
            }
        }

        ws.target_mut(&label).kind = Some(target_kind(gn_target)?);

        for source in &gn_target.sources {
            ws.add_source(&label, source.as_str());
        }
        if let PublicHeaders::Listed(headers) = &gn_target.public {
            for header in headers {
                ws.add_source(&label, header.as_str());
            }
        }

        visited.push(label);
    }

    tracing::info!(
        "loaded {} Bazel targets out of {} GN targets",
        visited.len(),
        desc.len()
    );

    Ok(Closure {
        workspace: ws,
        visited,
    })
}

fn target_kind(gn_target: &ExternalTarget) -> Result<TargetKind, ExportError> {
    match gn_target.kind {
        GnTargetType::SourceSet | GnTargetType::StaticLibrary => Ok(TargetKind::Library),
        GnTargetType::Executable => Ok(TargetKind::Binary),
        ref other => Err(ExportError::UnsupportedKind {
            label: gn_target.label.clone(),
            kind: other.to_string(),
        }),
    }
}
