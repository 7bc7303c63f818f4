//! PostgreSQL implementation of [`ImportTransaction`]
//!
//! Statements are prepared once when the transaction is opened and only read
//! afterwards; each call binds fresh parameter values.

use super::statements;
use crate::adapters::database::traits::ImportTransaction;
use crate::core::import::reference::ReferenceLookup;
use crate::core::import::writes::{
    AppointmentInsert, EhrNoteInsert, HealthMetricInsert, PatientSourceInsert, PatientUpsert,
    ReportedOutcomeInsert, SourceDefinitionUpsert,
};
use crate::domain::ids::SourceId;
use crate::domain::Result;
use async_trait::async_trait;
use tokio_postgres::{Statement, Transaction};

struct PreparedStatements {
    upsert_patient: Statement,
    insert_health_metric: Statement,
    insert_reported_outcome: Statement,
    insert_ehr_note: Statement,
    insert_appointment: Statement,
    upsert_source_definition: Statement,
    insert_patient_source: Statement,
}

impl PreparedStatements {
    async fn prepare(tx: &Transaction<'_>) -> Result<Self> {
        Ok(Self {
            upsert_patient: tx
                .prepare_typed(statements::UPSERT_PATIENT, statements::UPSERT_PATIENT_TYPES)
                .await?,
            insert_health_metric: tx
                .prepare_typed(
                    statements::INSERT_HEALTH_METRIC,
                    statements::INSERT_HEALTH_METRIC_TYPES,
                )
                .await?,
            insert_reported_outcome: tx
                .prepare_typed(
                    statements::INSERT_REPORTED_OUTCOME,
                    statements::INSERT_REPORTED_OUTCOME_TYPES,
                )
                .await?,
            insert_ehr_note: tx
                .prepare_typed(statements::INSERT_EHR_NOTE, statements::INSERT_EHR_NOTE_TYPES)
                .await?,
            insert_appointment: tx
                .prepare_typed(
                    statements::INSERT_APPOINTMENT,
                    statements::INSERT_APPOINTMENT_TYPES,
                )
                .await?,
            upsert_source_definition: tx
                .prepare_typed(
                    statements::UPSERT_SOURCE_DEFINITION,
                    statements::UPSERT_SOURCE_DEFINITION_TYPES,
                )
                .await?,
            insert_patient_source: tx
                .prepare_typed(
                    statements::INSERT_PATIENT_SOURCE,
                    statements::INSERT_PATIENT_SOURCE_TYPES,
                )
                .await?,
        })
    }
}

/// An open PostgreSQL transaction with the import statements prepared
pub struct PgImportTransaction<'a> {
    tx: Transaction<'a>,
    statements: PreparedStatements,
}

impl<'a> PgImportTransaction<'a> {
    /// Prepares every import statement inside `tx`
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails to prepare, typically because
    /// the target schema does not match.
    pub async fn prepare(tx: Transaction<'a>) -> Result<Self> {
        let statements = PreparedStatements::prepare(&tx).await?;
        tracing::debug!("Import statements prepared");
        Ok(Self { tx, statements })
    }
}

#[async_trait]
impl<'a> ImportTransaction for PgImportTransaction<'a> {
    async fn lookup_reference_id(&mut self, lookup: &ReferenceLookup) -> Result<Option<i32>> {
        let row = self
            .tx
            .query_opt(lookup.query().as_str(), &[&lookup.value])
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get(0)?)),
            None => Ok(None),
        }
    }

    async fn upsert_patient(&mut self, patient: &PatientUpsert) -> Result<()> {
        let patient_id = patient.patient_id.value();
        self.tx
            .execute(
                &self.statements.upsert_patient,
                &[
                    &patient_id,
                    &patient.first_name,
                    &patient.last_name,
                    &patient.date_of_birth,
                ],
            )
            .await?;
        Ok(())
    }

    async fn insert_health_metric(&mut self, metric: &HealthMetricInsert) -> Result<()> {
        let patient_id = metric.patient_id.value();
        self.tx
            .execute(
                &self.statements.insert_health_metric,
                &[&patient_id, &metric.metric_type_id, &metric.value],
            )
            .await?;
        Ok(())
    }

    async fn insert_reported_outcome(&mut self, outcome: &ReportedOutcomeInsert) -> Result<()> {
        let patient_id = outcome.patient_id.value();
        self.tx
            .execute(
                &self.statements.insert_reported_outcome,
                &[&patient_id, &outcome.outcome_type_id, &outcome.text],
            )
            .await?;
        Ok(())
    }

    async fn insert_ehr_note(&mut self, note: &EhrNoteInsert) -> Result<()> {
        let patient_id = note.patient_id.value();
        self.tx
            .execute(
                &self.statements.insert_ehr_note,
                &[&patient_id, &note.ehr_type_id, &note.content],
            )
            .await?;
        Ok(())
    }

    async fn insert_appointment(&mut self, appointment: &AppointmentInsert) -> Result<bool> {
        let patient_id = appointment.patient_id.value();
        let inserted = self
            .tx
            .execute(
                &self.statements.insert_appointment,
                &[
                    &patient_id,
                    &appointment.appointment_date,
                    &appointment.appointment_type_id,
                ],
            )
            .await?;
        Ok(inserted > 0)
    }

    async fn upsert_source_definition(
        &mut self,
        source: &SourceDefinitionUpsert,
    ) -> Result<Option<SourceId>> {
        let name = source.name.as_str();
        let row = self
            .tx
            .query_opt(
                &self.statements.upsert_source_definition,
                &[&source.source_type_id, &name, &source.description],
            )
            .await?;
        match row {
            Some(row) => Ok(Some(SourceId::new(row.try_get(0)?))),
            None => Ok(None),
        }
    }

    async fn insert_patient_source(&mut self, link: &PatientSourceInsert) -> Result<bool> {
        let patient_id = link.patient_id.value();
        let source_id = link.source_id.value();
        let inserted = self
            .tx
            .execute(
                &self.statements.insert_patient_source,
                &[&patient_id, &source_id],
            )
            .await?;
        Ok(inserted > 0)
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
