//! Patient record model
//!
//! A `PatientRecord` is one denormalized input row after parsing and
//! trimming. Optional text fields are `None` when the column is absent or
//! blank, so the row writer only has to check for presence.

use super::ids::{PatientId, TrackerName};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First and last name derived from the combined `name` column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// Everything before the first space
    pub first: String,

    /// Everything after the first space (trimmed)
    pub last: String,
}

impl PersonName {
    /// Splits a combined name at the first space only
    ///
    /// # Examples
    ///
    /// ```
    /// use patient_import::domain::record::PersonName;
    ///
    /// let name = PersonName::split("Jane Doe");
    /// assert_eq!((name.first.as_str(), name.last.as_str()), ("Jane", "Doe"));
    ///
    /// let name = PersonName::split("Madonna");
    /// assert_eq!((name.first.as_str(), name.last.as_str()), ("Madonna", ""));
    /// ```
    pub fn split(full: &str) -> Self {
        let full = full.trim();
        match full.split_once(' ') {
            Some((first, last)) => Self {
                first: first.to_string(),
                last: last.trim().to_string(),
            },
            None => Self {
                first: full.to_string(),
                last: String::new(),
            },
        }
    }
}

/// One parsed input row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Line number in the input file (header is line 1)
    pub line: u64,

    /// Patient identifier
    pub patient_id: PatientId,

    /// Split name
    pub name: PersonName,

    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// Gender, written as a health metric
    pub gender: Option<String>,

    /// Medical conditions, written as a reported outcome
    pub medical_conditions: Option<String>,

    /// Medications, written as an EHR prescription note
    pub medications: Option<String>,

    /// Allergies, written as a reported outcome
    pub allergies: Option<String>,

    /// Date of the last appointment
    pub last_appointment_date: NaiveDate,

    /// Wearable tracker name
    pub tracker: Option<TrackerName>,
}

impl PatientRecord {
    /// Creates a record with only the required fields set
    pub fn new(
        line: u64,
        patient_id: PatientId,
        name: PersonName,
        date_of_birth: NaiveDate,
        last_appointment_date: NaiveDate,
    ) -> Self {
        Self {
            line,
            patient_id,
            name,
            date_of_birth,
            gender: None,
            medical_conditions: None,
            medications: None,
            allergies: None,
            last_appointment_date,
            tracker: None,
        }
    }

    /// Sets the gender
    pub fn with_gender(mut self, gender: impl AsRef<str>) -> Self {
        self.gender = non_blank(gender.as_ref());
        self
    }

    /// Sets the medical conditions
    pub fn with_medical_conditions(mut self, conditions: impl AsRef<str>) -> Self {
        self.medical_conditions = non_blank(conditions.as_ref());
        self
    }

    /// Sets the medications
    pub fn with_medications(mut self, medications: impl AsRef<str>) -> Self {
        self.medications = non_blank(medications.as_ref());
        self
    }

    /// Sets the allergies
    pub fn with_allergies(mut self, allergies: impl AsRef<str>) -> Self {
        self.allergies = non_blank(allergies.as_ref());
        self
    }

    /// Sets the tracker; blank names clear it
    pub fn with_tracker(mut self, tracker: impl AsRef<str>) -> Self {
        self.tracker = TrackerName::new(tracker).ok();
        self
    }
}

/// Returns the trimmed value, or `None` when it is blank
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Jane Doe", "Jane", "Doe" ; "first and last")]
    #[test_case("Madonna", "Madonna", "" ; "single word")]
    #[test_case("", "", "" ; "empty")]
    #[test_case("Mary Ann Smith", "Mary", "Ann Smith" ; "split at first space only")]
    #[test_case("  John   Smith ", "John", "Smith" ; "surrounding and repeated spaces")]
    fn test_person_name_split(input: &str, first: &str, last: &str) {
        let name = PersonName::split(input);
        assert_eq!(name.first, first);
        assert_eq!(name.last, last);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  Penicillin "), Some("Penicillin".to_string()));
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(""), None);
    }

    #[test]
    fn test_record_builder_blank_optionals() {
        let date = NaiveDate::from_ymd_opt(1980, 1, 2).unwrap();
        let record = PatientRecord::new(2, PatientId::new(1), PersonName::split("A B"), date, date)
            .with_gender(" ")
            .with_tracker("")
            .with_allergies("Peanuts");

        assert!(record.gender.is_none());
        assert!(record.tracker.is_none());
        assert_eq!(record.allergies.as_deref(), Some("Peanuts"));
    }
}
