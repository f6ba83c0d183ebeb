//! Core data structures for gnport.
//!
//! This module contains the foundational types used throughout gnport:
//! - Labels (target addresses)
//! - Conditional sets and the variant merge algorithm
//! - The package/target/workspace graph
//! - Export errors

pub mod conditional;
pub mod errors;
pub mod label;
pub mod package;
pub mod target;
pub mod workspace;

pub use conditional::{merge_conditional, ConditionalSet};
pub use errors::ExportError;
pub use label::{Label, LabelError};
pub use package::Package;
pub use target::{Target, TargetKind};
pub use workspace::Workspace;
