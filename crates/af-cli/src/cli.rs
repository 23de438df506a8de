//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Ageflow - snapshot-age enrichment ETL with data-quality checkpoints
#[derive(Parser, Debug)]
#[command(name = "ageflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path
    #[arg(short, long, global = true, env = "AGEFLOW_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the schema and seed sample data
    Setup(SetupArgs),

    /// Run extract, transform, and load only
    Etl(EtlArgs),

    /// Run data-quality checks only
    Validate(ValidateArgs),

    /// Run the full pipeline: ETL, then data-quality checks
    Run(RunArgs),

    /// Regenerate (and optionally serve) the data-docs site
    Docs(DocsArgs),
}

/// Arguments for the setup command
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Snapshot date for seeded target rows (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    pub snapshot_date: Option<String>,
}

/// Arguments for the etl command
#[derive(Args, Debug)]
pub struct EtlArgs {
    /// Process only this snapshot date (YYYY-MM-DD, default: all)
    #[arg(short, long)]
    pub snapshot_date: Option<String>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Pre-declared checkpoint to run (default: first in config)
    #[arg(long)]
    pub checkpoint: Option<String>,

    /// Validate this snapshot date via a programmatic checkpoint
    /// instead of the pre-declared scope
    #[arg(short, long)]
    pub snapshot_date: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Snapshot date for ETL and validation (YYYY-MM-DD, default: all
    /// snapshots, validated at the pre-declared scope)
    #[arg(short, long)]
    pub snapshot_date: Option<String>,
}

/// Arguments for the docs command
#[derive(Args, Debug)]
pub struct DocsArgs {
    /// Serve the generated site over HTTP
    #[arg(long)]
    pub serve: bool,

    /// Host to bind when serving
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind when serving
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Do not open a browser when serving
    #[arg(long)]
    pub no_browser: bool,
}
