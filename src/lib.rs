//! gnport - Export a GN build graph as Bazel BUILD files
//!
//! This crate provides the library behind the `gnport` command: decoding
//! `gn desc` output, building the dependency closure of a set of root targets
//! per platform, merging the platforms into `select()` conditionals and
//! writing the resulting Bazel workspace.

pub mod core;
pub mod emit;
pub mod gn;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for gnport unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides descriptor builders and source-tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{ConditionalSet, ExportError, Label, Package, Target, TargetKind, Workspace};
pub use gn::Descriptor;
pub use ops::{export, ExportOptions, ExportSummary};
pub use util::config::ExportConfig;
