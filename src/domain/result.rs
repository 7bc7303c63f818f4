//! Result type alias for the importer
//!
//! This module provides a convenient Result type alias that uses ImportError
//! as the error type.

use super::errors::ImportError;

/// Result type alias for import operations
///
/// # Examples
///
/// ```
/// use patient_import::domain::result::Result;
/// use patient_import::domain::errors::ImportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ImportError::Other("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ImportError>;
