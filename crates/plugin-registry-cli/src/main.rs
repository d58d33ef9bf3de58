use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use plugin_registry_core::{Pipeline, RegistryConfig, Result, RunMode, RunReport};

mod args;
mod logging;
mod report;

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let root = resolve_root(cli.root);
    let mode = if cli.check {
        RunMode::Check
    } else {
        RunMode::Write
    };

    match run(root, mode) {
        Ok((report, config)) => {
            report::print(&report, &config);
            ExitCode::from(report.exit_code() as u8)
        }
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(root: PathBuf, mode: RunMode) -> Result<(RunReport, RegistryConfig)> {
    let config = RegistryConfig::load(&root)?;
    tracing::debug!(root = %config.root.display(), ?mode, "starting index generation");

    let pipeline = Pipeline::from_config(config, mode);
    let report = pipeline.run()?;
    Ok((report, pipeline.config().clone()))
}

fn resolve_root(cli_root: Option<PathBuf>) -> PathBuf {
    if let Some(root) = cli_root {
        return root;
    }

    if let Ok(root) = std::env::var("PLUGIN_REGISTRY_ROOT") {
        return PathBuf::from(root);
    }

    PathBuf::from(".")
}
