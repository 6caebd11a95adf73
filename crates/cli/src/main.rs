//! # Studio Analytics CLI
//!
//! Command-line entry point.
//!
//! - `run`: load sessions and schedule, recompute, print ranked rows
//! - `validate`: check an engine configuration file
//! - `info`: summarize a dataset and schedule

mod cli;
mod commands;
mod error;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_analytics, run_info, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "studio-analytics starting");

    let result = match &cli.command {
        Commands::Run(args) => run_analytics(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Map verbosity and format flags onto the shared subscriber setup
fn init_logging(cli: &Cli) -> Result<()> {
    let (level, env_override) = match (cli.quiet, cli.verbose) {
        (true, _) => ("warn", false),
        (false, 0) => ("info", true),
        (false, 1) => ("debug", true),
        (false, _) => ("trace", true),
    };

    let log_format = match cli.log_format {
        cli::LogFormat::Json => observability::LogFormat::Json,
        cli::LogFormat::Pretty => observability::LogFormat::Pretty,
        cli::LogFormat::Compact => observability::LogFormat::Compact,
    };

    observability::init(observability::ObservabilityConfig {
        log_format,
        level: level.to_string(),
        env_override,
        metrics_port: None,
    })
}
