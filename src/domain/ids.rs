//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow between the reader, the
//! row writer and the database. Each type keeps one kind of id from being
//! passed where another is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient identifier newtype wrapper
///
/// Externally supplied by the input file and stable across runs; it is the
/// conflict target of the patient upsert.
///
/// # Examples
///
/// ```
/// use patient_import::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str(" 1042 ").unwrap();
/// assert_eq!(id.value(), 1042);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(i32);

impl PatientId {
    /// Creates a new PatientId
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw integer value
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("patient_id cannot be empty".to_string());
        }
        trimmed
            .parse::<i32>()
            .map(Self)
            .map_err(|e| format!("Invalid patient_id '{trimmed}': {e}"))
    }
}

/// Source definition identifier
///
/// Returned by the `source_definition` upsert and used to link a patient to a
/// data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(i32);

impl SourceId {
    /// Creates a new SourceId
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw integer value
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracker (wearable device) name
///
/// Always trimmed and never empty. Two rows naming the same tracker resolve
/// to the same source definition because the trimmed name is the conflict
/// target of the upsert.
///
/// # Examples
///
/// ```
/// use patient_import::domain::ids::TrackerName;
///
/// let name = TrackerName::new("  Fitbit Charge 5 ").unwrap();
/// assert_eq!(name.as_str(), "Fitbit Charge 5");
/// assert!(TrackerName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackerName(String);

impl TrackerName {
    /// Creates a new TrackerName, trimming surrounding whitespace
    pub fn new(name: impl AsRef<str>) -> Result<Self, String> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err("Tracker name cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the tracker name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TrackerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
