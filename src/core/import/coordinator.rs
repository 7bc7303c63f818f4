//! Import coordinator - owns the transaction for a whole run
//!
//! Reference resolution and every row write happen inside one transaction.
//! The transaction is committed only after the last row succeeded; any error
//! rolls it back so nothing from the file is persisted.

use super::reference::ReferenceCache;
use super::summary::ImportSummary;
use super::writer::{RowOutcome, RowWriter};
use crate::adapters::database::traits::ImportTransaction;
use crate::config::schema::ImportSettings;
use crate::domain::record::PatientRecord;
use crate::domain::Result;
use std::time::Instant;

/// Receives per-row notifications while an import runs
///
/// Every method has a no-op default; the CLI uses this to print console
/// progress without the coordinator knowing about stdout.
pub trait ImportProgress {
    /// All reference ids were resolved
    fn references_resolved(&mut self, _refs: &ReferenceCache) {}

    /// A row was written
    fn row_written(&mut self, _record: &PatientRecord, _outcome: &RowOutcome) {}
}

impl ImportProgress for () {}

/// Import coordinator
pub struct ImportCoordinator {
    settings: ImportSettings,
    dry_run: bool,
}

impl ImportCoordinator {
    /// Create a new import coordinator
    pub fn new(settings: ImportSettings, dry_run: bool) -> Self {
        Self { settings, dry_run }
    }

    /// Execute the import
    ///
    /// Consumes the transaction: it is committed on success (or rolled back
    /// for a dry run) and rolled back on any error. The records are consumed
    /// lazily, one row at a time.
    ///
    /// # Errors
    ///
    /// The first error from reference resolution, the record source or a
    /// row write. When that happens nothing has been committed.
    pub async fn run<T, I, P>(&self, mut tx: T, records: I, progress: &mut P) -> Result<ImportSummary>
    where
        T: ImportTransaction,
        I: IntoIterator<Item = Result<PatientRecord>>,
        P: ImportProgress + ?Sized,
    {
        let start_time = Instant::now();

        let mut summary = match self.write_all(&mut tx, records, progress).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Import failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                return Err(e);
            }
        };

        if self.dry_run {
            tx.rollback().await?;
            tracing::info!(
                patients = summary.patients_imported,
                "Dry run complete, transaction rolled back"
            );
        } else {
            tx.commit().await?;
            summary.committed = true;
            tracing::info!(patients = summary.patients_imported, "Transaction committed");
        }

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn write_all<T, I, P>(&self, tx: &mut T, records: I, progress: &mut P) -> Result<ImportSummary>
    where
        T: ImportTransaction,
        I: IntoIterator<Item = Result<PatientRecord>>,
        P: ImportProgress + ?Sized,
    {
        let refs = ReferenceCache::resolve(tx).await?;
        progress.references_resolved(&refs);

        let writer = RowWriter::new(&refs, &self.settings);
        let mut summary = ImportSummary::new(self.dry_run);

        for record in records {
            let record = record?;

            let outcome = match writer.write(tx, &record).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(
                        line = record.line,
                        patient_id = %record.patient_id,
                        error = %e,
                        "Row write failed"
                    );
                    return Err(e);
                }
            };

            summary.record_row(&outcome);
            progress.row_written(&record, &outcome);
        }

        Ok(summary)
    }
}
