//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod fs;
pub mod process;

pub use config::ExportConfig;
pub use diagnostic::Diagnostic;
