//! Import summary and reporting
//!
//! This module defines the counters accumulated while rows are written and
//! reported once the transaction has been committed or rolled back.

use super::writer::{RowOutcome, TrackerOutcome};
use std::time::Duration;

/// Summary of an import run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Number of rows written (each one upserts a patient)
    pub patients_imported: usize,

    /// Number of `health_metrics` rows inserted
    pub health_metrics: usize,

    /// Number of `reported_outcomes` rows inserted
    pub reported_outcomes: usize,

    /// Number of `ehr` rows inserted
    pub ehr_notes: usize,

    /// Appointments inserted
    pub appointments_inserted: usize,

    /// Appointments skipped because a conflicting row existed
    pub appointments_skipped: usize,

    /// New patient/source links
    pub sources_linked: usize,

    /// Patient/source links that already existed
    pub source_links_existing: usize,

    /// Rows whose tracker upsert returned no source id
    pub trackers_skipped: usize,

    /// Duration of the run
    pub duration: Duration,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Whether the transaction was committed
    pub committed: bool,
}

impl ImportSummary {
    /// Create a new empty import summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            patients_imported: 0,
            health_metrics: 0,
            reported_outcomes: 0,
            ehr_notes: 0,
            appointments_inserted: 0,
            appointments_skipped: 0,
            sources_linked: 0,
            source_links_existing: 0,
            trackers_skipped: 0,
            duration: Duration::from_secs(0),
            dry_run,
            committed: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add the writes of one row
    pub fn record_row(&mut self, outcome: &RowOutcome) {
        self.patients_imported += 1;
        self.health_metrics += outcome.health_metrics;
        self.reported_outcomes += outcome.reported_outcomes;
        self.ehr_notes += outcome.ehr_notes;

        if outcome.appointment_inserted {
            self.appointments_inserted += 1;
        } else {
            self.appointments_skipped += 1;
        }

        match outcome.tracker {
            TrackerOutcome::NotPresent => {}
            TrackerOutcome::Linked(_) => self.sources_linked += 1,
            TrackerOutcome::AlreadyLinked(_) => self.source_links_existing += 1,
            TrackerOutcome::MissingSourceId => self.trackers_skipped += 1,
        }
    }

    /// Total number of rows inserted or upserted
    pub fn total_writes(&self) -> usize {
        self.patients_imported
            + self.health_metrics
            + self.reported_outcomes
            + self.ehr_notes
            + self.appointments_inserted
            + self.sources_linked
    }

    /// Rows per second over the whole run
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.patients_imported as f64 / secs
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            patients = self.patients_imported,
            health_metrics = self.health_metrics,
            reported_outcomes = self.reported_outcomes,
            ehr_notes = self.ehr_notes,
            appointments_inserted = self.appointments_inserted,
            appointments_skipped = self.appointments_skipped,
            sources_linked = self.sources_linked,
            source_links_existing = self.source_links_existing,
            trackers_skipped = self.trackers_skipped,
            duration_ms = self.duration.as_millis() as u64,
            dry_run = self.dry_run,
            committed = self.committed,
            "Import summary"
        );

        if self.trackers_skipped > 0 {
            tracing::warn!(
                count = self.trackers_skipped,
                "Some trackers returned no source id and were not linked"
            );
        }
    }
}
