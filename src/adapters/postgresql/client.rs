//! PostgreSQL client implementation
//!
//! This module provides the single connection an import run uses.

use super::transaction::PgImportTransaction;
use crate::config::schema::PostgreSQLConfig;
use crate::domain::{ImportError, Result};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode;
use tokio_postgres::{Client, Connection, NoTls, Socket};

const APPLICATION_NAME: &str = "patient-import";

/// PostgreSQL client for the importer
///
/// Wraps one `tokio_postgres` connection. The connection driver runs as a
/// task on the current runtime and is aborted when the client is dropped.
pub struct PostgreSQLClient {
    client: Client,
    connection_task: JoinHandle<()>,
    safe_connection_string: String,
}

impl PostgreSQLClient {
    /// Connect to PostgreSQL
    ///
    /// # Arguments
    ///
    /// * `config` - PostgreSQL configuration
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Configuration`] for an unparseable connection
    /// string and [`ImportError::Connection`] if the server cannot be reached.
    pub async fn connect(config: &PostgreSQLConfig) -> Result<Self> {
        let connection_string = config.connection_string.expose_secret();
        let safe_connection_string = connection_string.redacted_connection_string();

        let raw: &str = connection_string.as_ref();
        let mut pg_config: tokio_postgres::Config = raw.parse().map_err(|e| {
            ImportError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;

        pg_config
            .application_name(APPLICATION_NAME)
            .connect_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .ssl_mode(parse_ssl_mode(&config.ssl_mode)?);

        tracing::debug!(
            target_db = %safe_connection_string,
            ssl_mode = %config.ssl_mode,
            "Connecting to PostgreSQL"
        );

        let (client, connection_task) = if config.ssl_mode == "disable" {
            let (client, connection) = pg_config
                .connect(NoTls)
                .await
                .map_err(|e| connection_error(&safe_connection_string, e))?;
            (client, spawn_connection(connection))
        } else {
            let connector = native_tls::TlsConnector::new().map_err(|e| {
                ImportError::Connection(format!("Failed to initialize TLS: {}", e))
            })?;
            let (client, connection) = pg_config
                .connect(MakeTlsConnector::new(connector))
                .await
                .map_err(|e| connection_error(&safe_connection_string, e))?;
            (client, spawn_connection(connection))
        };

        if config.statement_timeout_seconds > 0 {
            client
                .batch_execute(&format!(
                    "SET statement_timeout = {}",
                    config.statement_timeout_seconds * 1000
                ))
                .await?;
        }

        tracing::info!(target_db = %safe_connection_string, "Connected to PostgreSQL");

        Ok(Self {
            client,
            connection_task,
            safe_connection_string,
        })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        self.client.query_one("SELECT 1", &[]).await?;
        tracing::debug!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Begin the import transaction and prepare its statements
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or a statement
    /// fails to prepare against the target schema.
    pub async fn begin(&mut self) -> Result<PgImportTransaction<'_>> {
        let tx = self.client.transaction().await?;
        PgImportTransaction::prepare(tx).await
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> &str {
        &self.safe_connection_string
    }
}

impl Drop for PostgreSQLClient {
    fn drop(&mut self) {
        self.connection_task.abort();
    }
}

fn spawn_connection<S>(connection: Connection<Socket, S>) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "PostgreSQL connection error");
        }
    })
}

fn connection_error(target: &str, e: tokio_postgres::Error) -> ImportError {
    ImportError::Connection(format!("Failed to connect to {}: {}", target, e))
}

fn parse_ssl_mode(mode: &str) -> Result<SslMode> {
    match mode {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(ImportError::Configuration(format!(
            "Invalid postgresql.ssl_mode '{}'. Must be one of: disable, prefer, require",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_parse_ssl_mode() {
        assert!(matches!(parse_ssl_mode("disable"), Ok(SslMode::Disable)));
        assert!(matches!(parse_ssl_mode("prefer"), Ok(SslMode::Prefer)));
        assert!(matches!(parse_ssl_mode("require"), Ok(SslMode::Require)));
        assert!(parse_ssl_mode("verify-full").is_err());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_connection_string() {
        let config = PostgreSQLConfig {
            connection_string: secret_string("postgresql://user@host:notaport/db".to_string()),
            connection_timeout_seconds: 1,
            statement_timeout_seconds: 0,
            ssl_mode: "disable".to_string(),
        };

        match PostgreSQLClient::connect(&config).await {
            Err(ImportError::Configuration(msg)) => {
                assert!(msg.contains("Invalid PostgreSQL connection string"));
            }
            Err(other) => panic!("expected configuration error, got {other:?}"),
            Ok(_) => panic!("expected configuration error"),
        }
    }
}
