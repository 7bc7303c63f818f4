//! Check-seed command implementation
//!
//! Resolves every lookup id the importer needs, inside a transaction that is
//! always rolled back, and reports what was found.

use super::{exit_code_for, print_error};
use crate::adapters::database::traits::ImportTransaction;
use crate::adapters::postgresql::PostgreSQLClient;
use crate::config::load_config;
use crate::core::import::ReferenceCache;
use clap::Args;

/// Arguments for the check-seed command
#[derive(Args, Debug)]
pub struct CheckSeedArgs {}

impl CheckSeedArgs {
    /// Execute the check-seed command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Checking seed data");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let mut client = match PostgreSQLClient::connect(&config.postgresql).await {
            Ok(c) => c,
            Err(e) => {
                print_error(&e);
                return Ok(exit_code_for(&e));
            }
        };

        println!("🔍 Checking seed data on {}", client.connection_string_safe());
        println!();

        if let Err(e) = client.test_connection().await {
            print_error(&e);
            return Ok(exit_code_for(&e));
        }

        let mut tx = match client.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                print_error(&e);
                return Ok(exit_code_for(&e));
            }
        };

        let resolved = ReferenceCache::resolve(&mut tx).await;

        if let Err(e) = tx.rollback().await {
            tracing::warn!(error = %e, "Rollback after seed check failed");
        }

        match resolved {
            Ok(refs) => {
                for (key, id) in refs.entries() {
                    let lookup = key.lookup();
                    println!(
                        "  ✅ {:<18} {}.{} = '{}' -> {}",
                        key.as_str(),
                        lookup.table,
                        lookup.column,
                        lookup.value,
                        id
                    );
                }
                println!();
                println!("✅ All seed data present");
                Ok(0)
            }
            Err(e) => {
                print_error(&e);
                Ok(exit_code_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_is_configuration_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let code = CheckSeedArgs {}
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
