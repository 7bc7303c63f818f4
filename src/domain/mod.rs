//! Domain models and types for the importer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`SourceId`], [`TrackerName`])
//! - **Input model** ([`PatientRecord`], [`PersonName`])
//! - **Error types** ([`ImportError`], [`DatabaseErrorDetail`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ImportError>`]:
//!
//! ```rust
//! use patient_import::domain::{ImportError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = patient_import::config::load_config("patient-import.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DatabaseErrorDetail, ImportError};
pub use ids::{PatientId, SourceId, TrackerName};
pub use record::{PatientRecord, PersonName};
pub use result::Result;
