//! High-level operations.
//!
//! This module contains the stages of an export, from descriptor traversal
//! to the full pipeline behind the `gnport` command.

pub mod closure;
pub mod export;
pub mod merge;
pub mod workarounds;

pub use closure::{build_closure, load_desc, Closure, QueueOrder};
pub use export::{build_workspace, export, ExportOptions, ExportSummary};
pub use merge::merge;
pub use workarounds::{apply_workarounds, default_workarounds, SourceOverride, Workaround};
