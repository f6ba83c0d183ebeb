//! gnport CLI - Export a GN build graph as Bazel BUILD files

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use gnport::gn::DescError;
use gnport::util::config::CONFIG_FILE;
use gnport::util::diagnostic::{emit, suggestions, Diagnostic};
use gnport::ExportError;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("gnport=debug")
    } else {
        EnvFilter::new("gnport=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .init();

    if let Err(e) = run(&cli) {
        emit(&diagnose(&e, &cli), !cli.no_color);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let summary = gnport::export(&cli.export_options())?;
    tracing::info!(
        "exported {} targets from {} variants: {} build files, {} copied files",
        summary.targets,
        summary.variants,
        summary.packages,
        summary.files
    );
    Ok(())
}

fn diagnose(e: &anyhow::Error, cli: &Cli) -> Diagnostic {
    if let Some(err) = e.downcast_ref::<ExportError>() {
        return err.to_diagnostic();
    }

    let diag = Diagnostic::error(format!("{:#}", e));
    if e.downcast_ref::<DescError>().is_some() {
        diag.with_suggestion(suggestions::REGENERATE_DESC)
    } else if e.downcast_ref::<toml::de::Error>().is_some() {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| cli.from.join(CONFIG_FILE));
        diag.with_location(path)
            .with_suggestion(suggestions::CHECK_CONFIG)
    } else {
        diag.with_suggestion(suggestions::VERBOSE)
    }
}
