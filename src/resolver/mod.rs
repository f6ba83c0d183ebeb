//! Resolution of GN references into Bazel ones.
//!
//! - [`policy`] decides what each dependency edge becomes.
//! - [`sources`] assigns source files to the package that owns them.

pub mod policy;
pub mod sources;

pub use policy::{Alias, DependencyPolicy, LabelAction, Redirect, Resolution};
pub use sources::{resolve_orphan_source, resolve_source, resolve_sources};
