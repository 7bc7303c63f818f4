//! Domain error types
//!
//! This module defines the error hierarchy for the importer. Errors are
//! domain-specific and don't expose third-party types; database failures are
//! reduced to the message, detail and hint the server reported.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main importer error type
///
/// Every fatal condition of a run maps to one of these variants. The only
/// condition that is not an error is a tracker upsert that returns no id
/// under the `skip` policy; that is absorbed by the row writer.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The input file does not exist
    #[error("CSV not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A required lookup row is absent from the target schema
    #[error("Missing seed data: {table}.{column} = '{value}'")]
    MissingSeedData {
        table: String,
        column: String,
        value: String,
    },

    /// A row lacks a usable value for a required column
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Tracker upsert returned no identifier and the policy is `fail`
    #[error("Tracker '{tracker}' upsert returned no source_id")]
    MissingSourceId { tracker: String },

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Errors reported by the database engine
    #[error("PostgreSQL error: {0}")]
    Database(DatabaseErrorDetail),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ImportError {
    /// Whether the error is a precondition failure (input file or seed data)
    ///
    /// Precondition failures abort the run before any row is written.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ImportError::InputNotFound(_) | ImportError::MissingSeedData { .. }
        )
    }

    /// Database error details, if this is a database error
    pub fn database_detail(&self) -> Option<&DatabaseErrorDetail> {
        match self {
            ImportError::Database(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Database error details
///
/// Captures what the engine reported about a failed statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseErrorDetail {
    /// Primary error message
    pub message: String,

    /// Optional detail line (e.g. the conflicting key)
    pub detail: Option<String>,

    /// Optional hint from the server
    pub hint: Option<String>,

    /// SQLSTATE code
    pub code: Option<String>,
}

impl DatabaseErrorDetail {
    /// Creates a new detail with only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Sets the detail line
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Sets the SQLSTATE code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for DatabaseErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (SQLSTATE {code})")?;
        }
        Ok(())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => ImportError::Io(err.to_string()),
            _ => ImportError::Csv(err.to_string()),
        }
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ImportError {
    fn from(err: toml::de::Error) -> Self {
        ImportError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from tokio_postgres::Error
impl From<tokio_postgres::Error> for ImportError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db) = err.as_db_error() {
            let mut detail =
                DatabaseErrorDetail::new(db.message()).with_code(db.code().code());
            if let Some(d) = db.detail() {
                detail = detail.with_detail(d);
            }
            if let Some(h) = db.hint() {
                detail = detail.with_hint(h);
            }
            return ImportError::Database(detail);
        }

        if err.is_closed() {
            return ImportError::Connection(err.to_string());
        }

        ImportError::Database(DatabaseErrorDetail::new(err.to_string()))
    }
}
