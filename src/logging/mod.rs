//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - A human-readable console layer filtered by log level
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use patient_import::logging::init_logging;
//! use patient_import::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an import run
///
/// # Example
///
/// ```no_run
/// use patient_import::log_import_start;
/// use std::path::Path;
///
/// log_import_start!(Path::new("medical_records.csv").display(), false);
/// ```
#[macro_export]
macro_rules! log_import_start {
    ($path:expr, $dry_run:expr) => {
        tracing::info!(
            input = %$path,
            dry_run = $dry_run,
            "Starting import"
        );
    };
}

/// Log the completion of an import run
///
/// # Example
///
/// ```no_run
/// use patient_import::log_import_complete;
/// use std::time::Duration;
///
/// log_import_complete!(100, Duration::from_secs(2));
/// ```
#[macro_export]
macro_rules! log_import_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Import completed"
        );
    };
}

/// Log a tracker whose source upsert produced no id
///
/// # Example
///
/// ```no_run
/// use patient_import::log_tracker_skipped;
///
/// log_tracker_skipped!(42, "Fitbit", 7u64);
/// ```
#[macro_export]
macro_rules! log_tracker_skipped {
    ($patient_id:expr, $tracker:expr, $line:expr) => {
        tracing::warn!(
            patient_id = %$patient_id,
            tracker = %$tracker,
            line = $line,
            "Tracker insert failed or already existed, patient link skipped"
        );
    };
}
