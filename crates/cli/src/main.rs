//! # Syncpost CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - Target list and default payload management
//! - Synchronized broadcast with a printed report

mod cli;
mod commands;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_payload, run_send, run_send_data, run_status, run_targets, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "Syncpost CLI starting");

    let recorder = match cli.metrics_file {
        Some(_) => Some(observability::install_recorder()?),
        None => None,
    };

    // Execute command
    let result = match &cli.command {
        Commands::Send(args) => run_send(&cli.config, args).await,
        Commands::SendData(args) => run_send_data(&cli.config, args).await,
        Commands::Targets(command) => run_targets(&cli.config, command),
        Commands::Payload(command) => run_payload(&cli.config, command),
        Commands::Status(args) => run_status(&cli.config, args),
        Commands::Validate(args) => run_validate(&cli.config, args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    if let (Some(recorder), Some(path)) = (&recorder, &cli.metrics_file) {
        if let Err(e) = observability::write_metrics_snapshot(recorder, path) {
            tracing::warn!(error = %e, "Failed to write metrics snapshot");
        }
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let (default_log_level, force_level) = if cli.quiet {
        ("warn", true)
    } else {
        let level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        (level, false)
    };

    observability::init_with_config(observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: default_log_level.to_string(),
        force_level,
    })
}
