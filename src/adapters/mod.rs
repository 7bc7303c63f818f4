//! External system integrations.
//!
//! - [`csv`] - Patient record file reader
//! - [`database`] - Transaction seam the importer writes through (trait-based)
//! - [`postgresql`] - PostgreSQL implementation of that seam
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations.
//!
//! ```rust,no_run
//! use patient_import::adapters::postgresql::PostgreSQLClient;
//! use patient_import::config::{secret_string, PostgreSQLConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PostgreSQLConfig {
//!     connection_string: secret_string("postgresql://postgres:pw@localhost/patients".to_string()),
//!     connection_timeout_seconds: 30,
//!     statement_timeout_seconds: 0,
//!     ssl_mode: "disable".to_string(),
//! };
//!
//! let mut client = PostgreSQLClient::connect(&config).await?;
//! let tx = client.begin().await?;
//! # drop(tx);
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod database;
pub mod postgresql;
