//! Patient records reader
//!
//! Reads the header row once, then yields one [`PatientRecord`] per data row.
//! The reader is tolerant of the input format: headers are matched
//! case-insensitively, unknown columns are ignored, and missing columns or
//! short rows produce empty values. Bytes that are not valid UTF-8 are
//! replaced with U+FFFD and the row is still imported. Only the required
//! columns (`patient_id`, `date_of_birth`, `last_appointment_date`) can fail
//! a row.

use crate::domain::errors::ImportError;
use crate::domain::ids::PatientId;
use crate::domain::record::{PatientRecord, PersonName};
use crate::domain::Result;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const COL_PATIENT_ID: &str = "patient_id";
const COL_NAME: &str = "name";
const COL_DATE_OF_BIRTH: &str = "date_of_birth";
const COL_GENDER: &str = "gender";
const COL_MEDICAL_CONDITIONS: &str = "medical_conditions";
const COL_MEDICATIONS: &str = "medications";
const COL_ALLERGIES: &str = "allergies";
const COL_LAST_APPOINTMENT_DATE: &str = "last_appointment_date";
const COL_TRACKER: &str = "tracker";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Lazy reader over a patient records file
pub struct PatientRecordReader<R: Read> {
    reader: csv::Reader<R>,
    header_map: HashMap<String, usize>,
    record: ByteRecord,
}

impl PatientRecordReader<BufReader<File>> {
    /// Opens a records file
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InputNotFound`] if the file does not exist, or
    /// an I/O or CSV error if the header row cannot be read.
    pub fn open(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ImportError::InputNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }
}

impl<R: Read> PatientRecordReader<R> {
    /// Wraps any reader producing delimited text with a header row
    pub fn from_reader(input: R, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(delimiter)
            .from_reader(input);

        let headers = reader.byte_headers()?.clone();
        let header_map = build_header_map(&headers);

        for required in [COL_PATIENT_ID, COL_DATE_OF_BIRTH, COL_LAST_APPOINTMENT_DATE] {
            if !header_map.contains_key(required) {
                tracing::warn!(column = required, "Required column missing from header");
            }
        }

        Ok(Self {
            reader,
            header_map,
            record: ByteRecord::new(),
        })
    }

    fn field(&self, column: &str) -> Cow<'_, str> {
        match self.header_map.get(column).and_then(|&idx| self.record.get(idx)) {
            Some(bytes) => match String::from_utf8_lossy(bytes) {
                Cow::Borrowed(text) => Cow::Borrowed(text.trim()),
                Cow::Owned(text) => Cow::Owned(text.trim().to_string()),
            },
            None => Cow::Borrowed(""),
        }
    }

    fn parse_current(&self, line: u64) -> Result<PatientRecord> {
        let invalid = |message: String| ImportError::InvalidRecord { line, message };

        let patient_id: PatientId = self.field(COL_PATIENT_ID).parse().map_err(invalid)?;
        let date_of_birth = parse_date(&self.field(COL_DATE_OF_BIRTH))
            .map_err(|e| invalid(format!("{COL_DATE_OF_BIRTH}: {e}")))?;
        let last_appointment_date = parse_date(&self.field(COL_LAST_APPOINTMENT_DATE))
            .map_err(|e| invalid(format!("{COL_LAST_APPOINTMENT_DATE}: {e}")))?;

        Ok(PatientRecord::new(
            line,
            patient_id,
            PersonName::split(&self.field(COL_NAME)),
            date_of_birth,
            last_appointment_date,
        )
        .with_gender(&self.field(COL_GENDER))
        .with_medical_conditions(&self.field(COL_MEDICAL_CONDITIONS))
        .with_medications(&self.field(COL_MEDICATIONS))
        .with_allergies(&self.field(COL_ALLERGIES))
        .with_tracker(&self.field(COL_TRACKER)))
    }
}

impl<R: Read> Iterator for PatientRecordReader<R> {
    type Item = Result<PatientRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_byte_record(&mut self.record) {
                Ok(false) => return None,
                Ok(true) => {}
                Err(e) => return Some(Err(e.into())),
            }

            let line = self.record.position().map(|p| p.line()).unwrap_or(0);

            // Blank lines carry no data
            if self.record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace)) {
                tracing::debug!(line, "Skipping blank line");
                continue;
            }

            if std::str::from_utf8(self.record.as_slice()).is_err() {
                tracing::warn!(line, "Row contains invalid UTF-8; bad bytes replaced");
            }

            return Some(self.parse_current(line));
        }
    }
}

/// Parses a date column
///
/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, `YYYY/MM/DD`, and date-times in the
/// same layouts, in which case only the date part is kept.
///
/// # Examples
///
/// ```
/// use patient_import::adapters::csv::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(1985, 3, 14).unwrap();
/// assert_eq!(parse_date("1985-03-14").unwrap(), expected);
/// assert_eq!(parse_date("03/14/1985").unwrap(), expected);
/// assert_eq!(parse_date("1985-03-14 08:30:00").unwrap(), expected);
/// ```
pub fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("value is missing".to_string());
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(datetime.date());
        }
    }

    Err(format!("unrecognized date '{value}'"))
}

fn build_header_map(headers: &ByteRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers
        let header = String::from_utf8_lossy(header);
        map.entry(header.trim().to_lowercase()).or_insert(idx);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::TrackerName;
    use test_case::test_case;

    const HEADER: &str = "patient_id,name,date_of_birth,gender,medical_conditions,medications,allergies,last_appointment_date,Tracker";

    fn read_all(input: &str) -> Vec<Result<PatientRecord>> {
        PatientRecordReader::from_reader(input.as_bytes(), b',')
            .unwrap()
            .collect()
    }

    #[test]
    fn test_reads_full_row() {
        let input = format!(
            "{HEADER}\n1, Jane Doe ,1980-05-01,Female,Diabetes,Metformin,Peanuts,2024-01-15, Fitbit Charge 5 \n"
        );
        let records = read_all(&input);
        assert_eq!(records.len(), 1);

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.line, 2);
        assert_eq!(record.patient_id, PatientId::new(1));
        assert_eq!(record.name.first, "Jane");
        assert_eq!(record.name.last, "Doe");
        assert_eq!(record.date_of_birth, NaiveDate::from_ymd_opt(1980, 5, 1).unwrap());
        assert_eq!(record.gender.as_deref(), Some("Female"));
        assert_eq!(record.medical_conditions.as_deref(), Some("Diabetes"));
        assert_eq!(record.medications.as_deref(), Some("Metformin"));
        assert_eq!(record.allergies.as_deref(), Some("Peanuts"));
        assert_eq!(
            record.last_appointment_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(record.tracker, TrackerName::new("Fitbit Charge 5").ok());
    }

    #[test]
    fn test_blank_optionals_are_none() {
        let input = format!("{HEADER}\n2,Madonna,1958-08-16, ,,,,2023-11-02,\n");
        let records = read_all(&input);
        let record = records[0].as_ref().unwrap();

        assert_eq!(record.name.first, "Madonna");
        assert_eq!(record.name.last, "");
        assert!(record.gender.is_none());
        assert!(record.medical_conditions.is_none());
        assert!(record.medications.is_none());
        assert!(record.allergies.is_none());
        assert!(record.tracker.is_none());
    }

    #[test]
    fn test_missing_columns_tolerated() {
        let input = "patient_id,name,date_of_birth,last_appointment_date\n3,Ann Lee,1990-02-03,2024-02-01\n";
        let records = read_all(input);
        let record = records[0].as_ref().unwrap();

        assert_eq!(record.patient_id, PatientId::new(3));
        assert!(record.gender.is_none());
        assert!(record.tracker.is_none());
    }

    #[test]
    fn test_short_row_and_extra_columns_tolerated() {
        let input = "patient_id,name,date_of_birth,last_appointment_date,gender,notes\n4,Bo Ek,1970-01-01,2024-03-03\n5,Cy Oh,1971-01-01,2024-03-04,Male,extra,surplus\n";
        let records = read_all(input);
        assert_eq!(records.len(), 2);

        let short = records[0].as_ref().unwrap();
        assert!(short.gender.is_none());

        let long = records[1].as_ref().unwrap();
        assert_eq!(long.gender.as_deref(), Some("Male"));
    }

    #[test]
    fn test_header_case_insensitive() {
        let input = "PATIENT_ID,Name,Date_Of_Birth,Last_Appointment_Date,TRACKER\n6,Di Po,1960-06-06,2024-04-04,Oura Ring\n";
        let records = read_all(input);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.tracker.as_ref().map(|t| t.as_str()), Some("Oura Ring"));
    }

    #[test]
    fn test_invalid_patient_id_reports_line() {
        let input = format!("{HEADER}\n1,Jane Doe,1980-05-01,,,,,2024-01-15,\nabc,John Roe,1981-05-01,,,,,2024-01-15,\n");
        let records = read_all(&input);
        assert!(records[0].is_ok());
        match &records[1] {
            Err(ImportError::InvalidRecord { line, message }) => {
                assert_eq!(*line, 3);
                assert!(message.contains("patient_id"));
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_date_is_invalid() {
        let input = format!("{HEADER}\n7,Ed Yu,,,,,,2024-01-15,\n");
        let records = read_all(&input);
        assert!(matches!(records[0], Err(ImportError::InvalidRecord { .. })));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = format!("{HEADER}\n\n8,Fay Wu,1999-09-09,,,,,2024-01-01,\n ,,,,,,,,\n");
        let records = read_all(&input);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_ok());
    }

    #[test]
    fn test_quoted_fields_with_delimiter() {
        let input = format!("{HEADER}\n9,\"Gil Ng\",1950-01-01,,\"Asthma, Hypertension\",,,2024-01-01,\n");
        let records = read_all(&input);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.medical_conditions.as_deref(), Some("Asthma, Hypertension"));
    }

    #[test]
    fn test_custom_delimiter() {
        let input = "patient_id;name;date_of_birth;last_appointment_date\n10;Hal Ix;1940-04-04;2024-05-05\n";
        let records: Vec<_> = PatientRecordReader::from_reader(input.as_bytes(), b';')
            .unwrap()
            .collect();
        assert_eq!(records[0].as_ref().unwrap().patient_id, PatientId::new(10));
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_fatal() {
        let mut input = b"patient_id,name,date_of_birth,last_appointment_date,Tracker\n".to_vec();
        input.extend_from_slice(b"1,Ren\xE9 Doe,1980-01-01,2024-01-01,Fitbit\n");
        input.extend_from_slice(b"2,Ann Lee,1990-02-03,2024-02-01,\n");

        let records: Vec<_> = PatientRecordReader::from_reader(input.as_slice(), b',')
            .unwrap()
            .collect();
        assert_eq!(records.len(), 2);

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.patient_id, PatientId::new(1));
        assert_eq!(record.name.first, "Ren\u{FFFD}");
        assert_eq!(record.name.last, "Doe");
        assert_eq!(record.tracker.as_ref().map(|t| t.as_str()), Some("Fitbit"));
        assert!(records[1].is_ok());
    }

    #[test]
    fn test_byte_order_mark_before_header() {
        let input = "\u{FEFF}patient_id,name,date_of_birth,last_appointment_date\n11,Ida Mo,1966-06-06,2024-06-06\n";
        let records = read_all(input);
        assert_eq!(records[0].as_ref().unwrap().patient_id, PatientId::new(11));
    }

    #[test]
    fn test_open_missing_file() {
        let result = PatientRecordReader::open("/definitely/not/here.csv", b',');
        assert!(matches!(result, Err(ImportError::InputNotFound(_))));
    }

    #[test_case("2024-01-15", 2024, 1, 15 ; "iso")]
    #[test_case("01/15/2024", 2024, 1, 15 ; "us")]
    #[test_case("2024/01/15", 2024, 1, 15 ; "slashed iso")]
    #[test_case("2024-01-15 13:45:00", 2024, 1, 15 ; "datetime")]
    #[test_case("2024-01-15T13:45:00", 2024, 1, 15 ; "iso datetime")]
    #[test_case("1/5/2024 12:00:00 AM", 2024, 1, 5 ; "us datetime with meridiem")]
    fn test_parse_date_formats(input: &str, y: i32, m: u32, d: u32) {
        assert_eq!(parse_date(input).unwrap(), NaiveDate::from_ymd_opt(y, m, d).unwrap());
    }

    #[test_case("" ; "empty")]
    #[test_case("yesterday" ; "text")]
    #[test_case("2024-13-01" ; "bad month")]
    fn test_parse_date_rejects(input: &str) {
        assert!(parse_date(input).is_err());
    }
}
