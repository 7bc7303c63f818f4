//! In-memory stand-in for the target schema
//!
//! `MemoryDatabase` holds committed tables behind a mutex. Each
//! `MemoryTransaction` works on a private copy that replaces the committed
//! state only on commit, so rollback and dropped transactions leave nothing
//! behind. Upsert and insert-or-skip semantics mirror the SQL statements.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use patient_import::adapters::database::ImportTransaction;
use patient_import::core::import::writes::{
    AppointmentInsert, EhrNoteInsert, HealthMetricInsert, PatientSourceInsert, PatientUpsert,
    ReportedOutcomeInsert, SourceDefinitionUpsert,
};
use patient_import::core::import::{ReferenceKey, ReferenceLookup};
use patient_import::domain::{DatabaseErrorDetail, ImportError, Result, SourceId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

pub const HEADER: &str = "patient_id,name,date_of_birth,gender,medical_conditions,medications,allergies,last_appointment_date,Tracker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRow {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub source_id: i32,
    pub source_type_id: i32,
    pub name: String,
    pub description: String,
}

/// Committed contents of every table the importer touches
#[derive(Debug, Clone, Default)]
pub struct Tables {
    /// (table, value) -> id
    pub seeds: HashMap<(String, String), i32>,
    pub patients: BTreeMap<i32, PatientRow>,
    pub health_metrics: Vec<HealthMetricInsert>,
    pub reported_outcomes: Vec<ReportedOutcomeInsert>,
    pub ehr_notes: Vec<EhrNoteInsert>,
    /// (patient_id, appointment_date, appointment_type_id)
    pub appointments: BTreeSet<(i32, NaiveDate, i32)>,
    pub sources: Vec<SourceRow>,
    /// (patient_id, source_id)
    pub patient_sources: BTreeSet<(i32, i32)>,
    next_source_id: i32,
}

impl Tables {
    /// Rows written by imports, seed tables excluded
    pub fn data_row_count(&self) -> usize {
        self.patients.len()
            + self.health_metrics.len()
            + self.reported_outcomes.len()
            + self.ehr_notes.len()
            + self.appointments.len()
            + self.sources.len()
            + self.patient_sources.len()
    }

    pub fn source_id(&self, name: &str) -> Option<i32> {
        self.sources
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.source_id)
    }
}

/// Seed id assigned to each lookup in [`MemoryDatabase::seeded`]
pub fn seed_id(key: ReferenceKey) -> i32 {
    match key {
        ReferenceKey::SexMetric => 1,
        ReferenceKey::ConditionOutcome => 11,
        ReferenceKey::AllergyOutcome => 12,
        ReferenceKey::PrescriptionEhr => 21,
        ReferenceKey::RoutineAppointment => 31,
        ReferenceKey::WearableSource => 41,
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    /// Fail the Nth patient upsert (1-based)
    fail_on_patient_upsert: Option<usize>,
    /// Source upserts return no row
    no_source_id: bool,
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    committed: Arc<Mutex<Tables>>,
    faults: Faults,
}

impl MemoryDatabase {
    /// Empty data tables with every lookup row present
    pub fn seeded() -> Self {
        let mut tables = Tables {
            next_source_id: 100,
            ..Tables::default()
        };
        for key in ReferenceKey::ALL {
            let lookup = key.lookup();
            tables
                .seeds
                .insert((lookup.table.to_string(), lookup.value.to_string()), seed_id(key));
        }
        Self {
            committed: Arc::new(Mutex::new(tables)),
            faults: Faults::default(),
        }
    }

    /// Seeded, minus one lookup row
    pub fn seeded_without(key: ReferenceKey) -> Self {
        let db = Self::seeded();
        {
            let lookup = key.lookup();
            let mut tables = db.committed.lock().unwrap();
            tables
                .seeds
                .remove(&(lookup.table.to_string(), lookup.value.to_string()));
        }
        db
    }

    /// Transactions from this handle fail on the Nth patient upsert
    pub fn failing_on_patient(mut self, n: usize) -> Self {
        self.faults.fail_on_patient_upsert = Some(n);
        self
    }

    /// Transactions from this handle get no id back from source upserts
    pub fn without_source_ids(mut self) -> Self {
        self.faults.no_source_id = true;
        self
    }

    pub fn begin(&self) -> MemoryTransaction {
        let staged = self.committed.lock().unwrap().clone();
        MemoryTransaction {
            committed: Arc::clone(&self.committed),
            staged,
            faults: self.faults,
            patient_upserts: 0,
            lookups: 0,
        }
    }

    /// Copy of the committed state
    pub fn snapshot(&self) -> Tables {
        self.committed.lock().unwrap().clone()
    }
}

pub struct MemoryTransaction {
    committed: Arc<Mutex<Tables>>,
    staged: Tables,
    faults: Faults,
    patient_upserts: usize,
    pub lookups: usize,
}

#[async_trait]
impl ImportTransaction for MemoryTransaction {
    async fn lookup_reference_id(&mut self, lookup: &ReferenceLookup) -> Result<Option<i32>> {
        self.lookups += 1;
        Ok(self
            .staged
            .seeds
            .get(&(lookup.table.to_string(), lookup.value.to_string()))
            .copied())
    }

    async fn upsert_patient(&mut self, patient: &PatientUpsert) -> Result<()> {
        self.patient_upserts += 1;
        if self.faults.fail_on_patient_upsert == Some(self.patient_upserts) {
            return Err(ImportError::Database(
                DatabaseErrorDetail::new("value too long for type character varying(100)")
                    .with_code("22001"),
            ));
        }

        self.staged.patients.insert(
            patient.patient_id.value(),
            PatientRow {
                first_name: patient.first_name.clone(),
                last_name: patient.last_name.clone(),
                date_of_birth: patient.date_of_birth,
            },
        );
        Ok(())
    }

    async fn insert_health_metric(&mut self, metric: &HealthMetricInsert) -> Result<()> {
        self.staged.health_metrics.push(metric.clone());
        Ok(())
    }

    async fn insert_reported_outcome(&mut self, outcome: &ReportedOutcomeInsert) -> Result<()> {
        self.staged.reported_outcomes.push(outcome.clone());
        Ok(())
    }

    async fn insert_ehr_note(&mut self, note: &EhrNoteInsert) -> Result<()> {
        self.staged.ehr_notes.push(note.clone());
        Ok(())
    }

    async fn insert_appointment(&mut self, appointment: &AppointmentInsert) -> Result<bool> {
        Ok(self.staged.appointments.insert((
            appointment.patient_id.value(),
            appointment.appointment_date,
            appointment.appointment_type_id,
        )))
    }

    async fn upsert_source_definition(
        &mut self,
        source: &SourceDefinitionUpsert,
    ) -> Result<Option<SourceId>> {
        if self.faults.no_source_id {
            return Ok(None);
        }

        let name = source.name.as_str();
        if let Some(existing) = self.staged.sources.iter_mut().find(|s| s.name == name) {
            existing.description = source.description.clone();
            return Ok(Some(SourceId::new(existing.source_id)));
        }

        let source_id = self.staged.next_source_id;
        self.staged.next_source_id += 1;
        self.staged.sources.push(SourceRow {
            source_id,
            source_type_id: source.source_type_id,
            name: name.to_string(),
            description: source.description.clone(),
        });
        Ok(Some(SourceId::new(source_id)))
    }

    async fn insert_patient_source(&mut self, link: &PatientSourceInsert) -> Result<bool> {
        Ok(self
            .staged
            .patient_sources
            .insert((link.patient_id.value(), link.source_id.value())))
    }

    async fn commit(self) -> Result<()> {
        *self.committed.lock().unwrap() = self.staged;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

/// Builds a CSV document with the standard header
pub fn csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

/// `count` rows with ids 1..=count, each carrying every optional field
pub fn full_rows(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| {
            format!(
                "{i},Patient{i} Test,1980-01-{day:02},Female,Asthma,Albuterol,Latex,2024-02-{day:02},Fitbit",
                day = (i % 28) + 1
            )
        })
        .collect()
}
