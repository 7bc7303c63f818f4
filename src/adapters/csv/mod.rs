//! Delimited-text input
//!
//! This module turns the patient records file into a lazy sequence of
//! [`PatientRecord`](crate::domain::PatientRecord) values.

pub mod reader;

pub use reader::{parse_date, PatientRecordReader};
