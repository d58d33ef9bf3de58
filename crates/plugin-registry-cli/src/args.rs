use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "generate-index")]
#[command(about = "Validate registry plugins and generate index.yaml")]
#[command(version)]
pub struct Cli {
    /// Validate only, don't write the index (for CI)
    #[arg(long)]
    pub check: bool,

    /// Registry root (default: $PLUGIN_REGISTRY_ROOT or current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
