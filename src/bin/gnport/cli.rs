//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use gnport::ExportOptions;

/// gnport - Export a GN build graph as Bazel BUILD files
#[derive(Parser)]
#[command(name = "gnport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the `gn desc` JSON descriptors
    #[arg(long, value_name = "DIR")]
    pub from: PathBuf,

    /// Directory the Bazel workspace is written to
    #[arg(long, value_name = "DIR")]
    pub to: PathBuf,

    /// Configuration file (defaults to <FROM>/gnport.toml when present)
    #[arg(long, value_name = "FILE", env = "GNPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source checkout to copy files from (defaults to the configured root)
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Write BUILD files without running the formatter
    #[arg(long)]
    pub no_format: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            from: self.from.clone(),
            to: self.to.clone(),
            config: self.config.clone(),
            source_root: self.source_root.clone(),
            no_format: self.no_format,
        }
    }
}
