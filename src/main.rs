// Patient Import - CSV to PostgreSQL patient loader
// Copyright (c) 2025 Patient Import Contributors
// Licensed under the MIT License

use clap::Parser;
use patient_import::cli::{Cli, Commands};
use patient_import::config::{load_config, LoggingConfig};
use patient_import::logging::init_logging;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Patient Import - CSV to PostgreSQL"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Log level and file settings for this invocation
///
/// The configuration file is consulted when it loads; commands report their
/// own configuration errors, so a failure here just falls back to defaults.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let loaded = match &cli.command {
        Commands::Init(_) => None,
        _ => load_config(&cli.config).ok(),
    };

    let (config_level, logging_config) = match loaded {
        Some(config) => (config.application.log_level, config.logging),
        None => ("info".to_string(), LoggingConfig::default()),
    };

    (cli.log_level.clone().unwrap_or(config_level), logging_config)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Import(args) => args.execute(&cli.config).await,
        Commands::CheckSeed(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
