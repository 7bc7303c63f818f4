//! Per-row write plan
//!
//! One input row fans out into up to seven statements. [`RowWrites::plan`]
//! derives the parameter values for all of them up front, as plain immutable
//! structs, so executing a row never mutates shared statement state.

use super::reference::{ReferenceCache, ReferenceKey};
use crate::domain::ids::{PatientId, SourceId, TrackerName};
use crate::domain::record::PatientRecord;
use chrono::NaiveDate;

/// Parameters of the patient upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientUpsert {
    pub patient_id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// Parameters of a `health_metrics` insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthMetricInsert {
    pub patient_id: PatientId,
    pub metric_type_id: i32,
    pub value: String,
}

/// Parameters of a `reported_outcomes` insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedOutcomeInsert {
    pub patient_id: PatientId,
    pub outcome_type_id: i32,
    pub text: String,
}

/// Parameters of an `ehr` insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EhrNoteInsert {
    pub patient_id: PatientId,
    pub ehr_type_id: i32,
    pub content: String,
}

/// Parameters of an `appointments` insert-or-skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentInsert {
    pub patient_id: PatientId,
    pub appointment_date: NaiveDate,
    pub appointment_type_id: i32,
}

/// Parameters of the `source_definition` upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDefinitionUpsert {
    pub source_type_id: i32,
    pub name: TrackerName,
    pub description: String,
}

/// Parameters of a `patient_source` insert-or-skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientSourceInsert {
    pub patient_id: PatientId,
    pub source_id: SourceId,
}

/// Every write one input row produces, in execution order
///
/// The patient/source link is not part of the plan because its `source_id`
/// is only known after the source definition upsert has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWrites {
    /// Input line, for diagnostics
    pub line: u64,
    pub patient: PatientUpsert,
    pub health_metric: Option<HealthMetricInsert>,
    /// Condition outcome first, then allergy outcome
    pub reported_outcomes: Vec<ReportedOutcomeInsert>,
    pub ehr_note: Option<EhrNoteInsert>,
    pub appointment: AppointmentInsert,
    pub source: Option<SourceDefinitionUpsert>,
}

impl RowWrites {
    /// Derives the write plan for one record
    pub fn plan(record: &PatientRecord, refs: &ReferenceCache, tracker_description: &str) -> Self {
        let patient_id = record.patient_id;

        let health_metric = record.gender.as_ref().map(|gender| HealthMetricInsert {
            patient_id,
            metric_type_id: refs.get(ReferenceKey::SexMetric),
            value: gender.clone(),
        });

        let reported_outcomes = [
            (&record.medical_conditions, ReferenceKey::ConditionOutcome),
            (&record.allergies, ReferenceKey::AllergyOutcome),
        ]
        .into_iter()
        .filter_map(|(text, key)| {
            text.as_ref().map(|text| ReportedOutcomeInsert {
                patient_id,
                outcome_type_id: refs.get(key),
                text: text.clone(),
            })
        })
        .collect();

        let ehr_note = record.medications.as_ref().map(|meds| EhrNoteInsert {
            patient_id,
            ehr_type_id: refs.get(ReferenceKey::PrescriptionEhr),
            content: meds.clone(),
        });

        let source = record.tracker.as_ref().map(|name| SourceDefinitionUpsert {
            source_type_id: refs.get(ReferenceKey::WearableSource),
            name: name.clone(),
            description: tracker_description.to_string(),
        });

        Self {
            line: record.line,
            patient: PatientUpsert {
                patient_id,
                first_name: record.name.first.clone(),
                last_name: record.name.last.clone(),
                date_of_birth: record.date_of_birth,
            },
            health_metric,
            reported_outcomes,
            ehr_note,
            appointment: AppointmentInsert {
                patient_id,
                appointment_date: record.last_appointment_date,
                appointment_type_id: refs.get(ReferenceKey::RoutineAppointment),
            },
            source,
        }
    }

    /// Number of statements the plan issues, counting the link as one
    pub fn statement_count(&self) -> usize {
        2 + usize::from(self.health_metric.is_some())
            + self.reported_outcomes.len()
            + usize::from(self.ehr_note.is_some())
            + if self.source.is_some() { 2 } else { 0 }
    }
}
