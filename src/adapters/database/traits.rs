//! Database abstraction traits
//!
//! This module defines the transaction seam the importer writes through.
//! Each method is one statement shape; implementations hold whatever
//! prepared handles they need and take per-call parameters by reference.

use crate::core::import::reference::ReferenceLookup;
use crate::core::import::writes::{
    AppointmentInsert, EhrNoteInsert, HealthMetricInsert, PatientSourceInsert, PatientUpsert,
    ReportedOutcomeInsert, SourceDefinitionUpsert,
};
use crate::domain::ids::SourceId;
use crate::domain::Result;
use async_trait::async_trait;

/// An open import transaction
///
/// Nothing written through a transaction is visible to others until
/// [`commit`](ImportTransaction::commit) succeeds. Dropping or rolling back
/// discards everything.
#[async_trait]
pub trait ImportTransaction: Send {
    /// Look up a seed row id
    ///
    /// Returns `None` when no row matches.
    async fn lookup_reference_id(&mut self, lookup: &ReferenceLookup) -> Result<Option<i32>>;

    /// Insert a patient, or overwrite name and date of birth on conflict
    async fn upsert_patient(&mut self, patient: &PatientUpsert) -> Result<()>;

    /// Append a health metric row
    async fn insert_health_metric(&mut self, metric: &HealthMetricInsert) -> Result<()>;

    /// Append a reported outcome row
    async fn insert_reported_outcome(&mut self, outcome: &ReportedOutcomeInsert) -> Result<()>;

    /// Append an EHR note row
    async fn insert_ehr_note(&mut self, note: &EhrNoteInsert) -> Result<()>;

    /// Insert an appointment unless a conflicting one exists
    ///
    /// Returns `true` if a row was inserted, `false` if it was skipped.
    async fn insert_appointment(&mut self, appointment: &AppointmentInsert) -> Result<bool>;

    /// Insert a source definition, or update its description on name conflict
    ///
    /// Returns the source id, or `None` if the statement produced no row.
    async fn upsert_source_definition(
        &mut self,
        source: &SourceDefinitionUpsert,
    ) -> Result<Option<SourceId>>;

    /// Link a patient to a source unless the link already exists
    ///
    /// Returns `true` if a row was inserted, `false` if it was skipped.
    async fn insert_patient_source(&mut self, link: &PatientSourceInsert) -> Result<bool>;

    /// Commit everything written through this transaction
    async fn commit(self) -> Result<()>;

    /// Discard everything written through this transaction
    async fn rollback(self) -> Result<()>;
}
