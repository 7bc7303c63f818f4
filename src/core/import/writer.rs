//! Row writer
//!
//! Executes the write plan of one input row against an open transaction:
//! patient upsert, optional metric, outcomes and EHR note, the appointment,
//! and the optional tracker source with its patient link.

use super::reference::ReferenceCache;
use super::writes::{PatientSourceInsert, RowWrites};
use crate::adapters::database::traits::ImportTransaction;
use crate::config::schema::{ImportSettings, MissingSourcePolicy};
use crate::domain::errors::ImportError;
use crate::domain::ids::{PatientId, SourceId};
use crate::domain::record::PatientRecord;
use crate::domain::Result;

/// What happened to a row's tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerOutcome {
    /// The row had no tracker
    #[default]
    NotPresent,
    /// Source resolved and a new patient link inserted
    Linked(SourceId),
    /// Source resolved; the patient link already existed
    AlreadyLinked(SourceId),
    /// The source upsert returned no id; the link was skipped
    MissingSourceId,
}

impl TrackerOutcome {
    /// The resolved source id, if any
    pub fn source_id(&self) -> Option<SourceId> {
        match self {
            TrackerOutcome::Linked(id) | TrackerOutcome::AlreadyLinked(id) => Some(*id),
            _ => None,
        }
    }
}

/// Writes performed for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOutcome {
    pub patient_id: PatientId,
    pub health_metrics: usize,
    pub reported_outcomes: usize,
    pub ehr_notes: usize,
    pub appointment_inserted: bool,
    pub tracker: TrackerOutcome,
}

impl RowOutcome {
    fn new(patient_id: PatientId) -> Self {
        Self {
            patient_id,
            health_metrics: 0,
            reported_outcomes: 0,
            ehr_notes: 0,
            appointment_inserted: false,
            tracker: TrackerOutcome::NotPresent,
        }
    }
}

/// Executes row write plans with a fixed reference cache and settings
pub struct RowWriter<'a> {
    refs: &'a ReferenceCache,
    settings: &'a ImportSettings,
}

impl<'a> RowWriter<'a> {
    /// Create a new row writer
    pub fn new(refs: &'a ReferenceCache, settings: &'a ImportSettings) -> Self {
        Self { refs, settings }
    }

    /// Plans and executes the writes for one record
    ///
    /// # Errors
    ///
    /// Any database error is returned as is; the caller owns the transaction
    /// and decides to roll back. A tracker upsert without an id is only an
    /// error under [`MissingSourcePolicy::Fail`].
    pub async fn write<T>(&self, tx: &mut T, record: &PatientRecord) -> Result<RowOutcome>
    where
        T: ImportTransaction + ?Sized,
    {
        let plan = RowWrites::plan(record, self.refs, &self.settings.tracker_description);
        tracing::debug!(
            line = record.line,
            patient_id = %record.patient_id,
            statements = plan.statement_count(),
            "Writing row"
        );
        self.execute(tx, &plan).await
    }

    /// Executes an already derived plan
    pub async fn execute<T>(&self, tx: &mut T, plan: &RowWrites) -> Result<RowOutcome>
    where
        T: ImportTransaction + ?Sized,
    {
        let patient_id = plan.patient.patient_id;
        let mut outcome = RowOutcome::new(patient_id);

        tx.upsert_patient(&plan.patient).await?;

        if let Some(metric) = &plan.health_metric {
            tx.insert_health_metric(metric).await?;
            outcome.health_metrics += 1;
        }

        for reported in &plan.reported_outcomes {
            tx.insert_reported_outcome(reported).await?;
            outcome.reported_outcomes += 1;
        }

        if let Some(note) = &plan.ehr_note {
            tx.insert_ehr_note(note).await?;
            outcome.ehr_notes += 1;
        }

        outcome.appointment_inserted = tx.insert_appointment(&plan.appointment).await?;
        if !outcome.appointment_inserted {
            tracing::debug!(
                patient_id = %patient_id,
                appointment_date = %plan.appointment.appointment_date,
                "Appointment already present, skipped"
            );
        }

        let Some(source) = &plan.source else {
            return Ok(outcome);
        };

        outcome.tracker = match tx.upsert_source_definition(source).await? {
            Some(source_id) => {
                let link = PatientSourceInsert {
                    patient_id,
                    source_id,
                };
                let inserted = tx.insert_patient_source(&link).await?;
                tracing::info!(
                    patient_id = %patient_id,
                    tracker = %source.name,
                    source_id = %source_id,
                    linked = inserted,
                    "Tracker resolved"
                );
                if inserted {
                    TrackerOutcome::Linked(source_id)
                } else {
                    TrackerOutcome::AlreadyLinked(source_id)
                }
            }
            None => match self.settings.missing_source_id {
                MissingSourcePolicy::Skip => {
                    crate::log_tracker_skipped!(patient_id, source.name, plan.line);
                    TrackerOutcome::MissingSourceId
                }
                MissingSourcePolicy::Fail => {
                    return Err(ImportError::MissingSourceId {
                        tracker: source.name.to_string(),
                    });
                }
            },
        };

        Ok(outcome)
    }
}
