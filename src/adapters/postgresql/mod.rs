//! PostgreSQL database integration
//!
//! One connection, one transaction per run, with the import statements
//! prepared up front.

pub mod client;
pub mod statements;
pub mod transaction;

pub use client::PostgreSQLClient;
pub use transaction::PgImportTransaction;
