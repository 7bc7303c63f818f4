//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the importer configuration file.

use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after applying env overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Input File: {}", config.input.path);
        println!("  Delimiter: {:?}", config.input.delimiter);
        println!(
            "  PostgreSQL Connection: {}",
            config
                .postgresql
                .connection_string
                .expose_secret()
                .redacted_connection_string()
        );
        println!("  SSL Mode: {}", config.postgresql.ssl_mode);
        println!(
            "  Statement Timeout: {}",
            match config.postgresql.statement_timeout_seconds {
                0 => "server default".to_string(),
                secs => format!("{secs}s"),
            }
        );
        println!("  Tracker Description: {}", config.import.tracker_description);
        println!(
            "  Missing Source Id Policy: {:?}",
            config.import.missing_source_id
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}
