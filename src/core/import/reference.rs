//! Reference (lookup) id resolution
//!
//! The row writer needs six surrogate ids from the seeded lookup tables.
//! They are resolved once, before the first row is written, into an
//! immutable [`ReferenceCache`] that is then borrowed for the rest of the run.
//! A missing seed row aborts the run before any write.

use crate::adapters::database::traits::ImportTransaction;
use crate::domain::errors::ImportError;
use crate::domain::Result;
use std::collections::HashMap;
use std::fmt;

/// Logical names of the lookup ids the row writer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKey {
    /// `metric_type` "Sex"
    SexMetric,
    /// `outcome_type` "Condition"
    ConditionOutcome,
    /// `outcome_type` "Alergy"
    AllergyOutcome,
    /// `ehr_type` "Prescription"
    PrescriptionEhr,
    /// `appointment_type` "Routine Check-up"
    RoutineAppointment,
    /// `source_type` "Wearable Device"
    WearableSource,
}

impl ReferenceKey {
    /// Every key, in resolution order
    pub const ALL: [ReferenceKey; 6] = [
        ReferenceKey::SexMetric,
        ReferenceKey::ConditionOutcome,
        ReferenceKey::AllergyOutcome,
        ReferenceKey::PrescriptionEhr,
        ReferenceKey::RoutineAppointment,
        ReferenceKey::WearableSource,
    ];

    /// Where the id for this key is looked up
    pub fn lookup(self) -> ReferenceLookup {
        match self {
            ReferenceKey::SexMetric => ReferenceLookup::new("metric_type", "metric_type_name", "Sex"),
            ReferenceKey::ConditionOutcome => {
                ReferenceLookup::new("outcome_type", "outcome_type_name", "Condition")
            }
            // Spelling matches the seeded outcome_type row
            ReferenceKey::AllergyOutcome => {
                ReferenceLookup::new("outcome_type", "outcome_type_name", "Alergy")
            }
            ReferenceKey::PrescriptionEhr => {
                ReferenceLookup::new("ehr_type", "ehr_type_name", "Prescription")
            }
            ReferenceKey::RoutineAppointment => ReferenceLookup::new(
                "appointment_type",
                "appointment_type_name",
                "Routine Check-up",
            ),
            ReferenceKey::WearableSource => {
                ReferenceLookup::new("source_type", "source_type_name", "Wearable Device")
            }
        }
    }

    /// Stable short name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKey::SexMetric => "Sex_metric",
            ReferenceKey::ConditionOutcome => "Condition_outcome",
            ReferenceKey::AllergyOutcome => "Allergy_outcome",
            ReferenceKey::PrescriptionEhr => "Prescription_ehr",
            ReferenceKey::RoutineAppointment => "Routine_appt",
            ReferenceKey::WearableSource => "Wearable_src",
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (table, column, value) triple identifying one seed row
///
/// Table and column names only ever come from [`ReferenceKey::lookup`], so
/// they are safe to splice into SQL; the value is always a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceLookup {
    pub table: &'static str,
    pub column: &'static str,
    pub value: &'static str,
}

impl ReferenceLookup {
    const fn new(table: &'static str, column: &'static str, value: &'static str) -> Self {
        Self {
            table,
            column,
            value,
        }
    }

    /// The surrogate id column, `<table>_id`
    pub fn id_column(&self) -> String {
        format!("{}_id", self.table)
    }

    /// Parameterized lookup query (`$1` is the value)
    pub fn query(&self) -> String {
        format!(
            "SELECT {id} FROM {table} WHERE {column} = $1 LIMIT 1",
            id = self.id_column(),
            table = self.table,
            column = self.column
        )
    }

    fn missing(&self) -> ImportError {
        ImportError::MissingSeedData {
            table: self.table.to_string(),
            column: self.column.to_string(),
            value: self.value.to_string(),
        }
    }
}

/// Resolved lookup ids
///
/// Only constructible with every [`ReferenceKey`] present, so
/// [`ReferenceCache::get`] cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCache {
    ids: HashMap<ReferenceKey, i32>,
}

impl ReferenceCache {
    /// Resolves every key against the open transaction
    ///
    /// Stops at the first missing seed row.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingSeedData`] naming the missing row, or the
    /// database error of a failed lookup.
    pub async fn resolve<T>(tx: &mut T) -> Result<Self>
    where
        T: ImportTransaction + ?Sized,
    {
        let mut ids = HashMap::with_capacity(ReferenceKey::ALL.len());

        for key in ReferenceKey::ALL {
            let lookup = key.lookup();
            let id = tx
                .lookup_reference_id(&lookup)
                .await?
                .ok_or_else(|| lookup.missing())?;

            tracing::debug!(
                key = %key,
                table = lookup.table,
                value = lookup.value,
                id,
                "Resolved reference id"
            );
            ids.insert(key, id);
        }

        Self::from_ids(ids)
    }

    /// Builds a cache from already-known ids
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingSeedData`] for the first absent key.
    pub fn from_ids(ids: HashMap<ReferenceKey, i32>) -> Result<Self> {
        if let Some(missing) = ReferenceKey::ALL.iter().find(|k| !ids.contains_key(k)) {
            return Err(missing.lookup().missing());
        }
        Ok(Self { ids })
    }

    /// The id for a key
    pub fn get(&self, key: ReferenceKey) -> i32 {
        // from_ids guarantees every key is present
        self.ids[&key]
    }

    /// All resolved ids, in key order
    pub fn entries(&self) -> Vec<(ReferenceKey, i32)> {
        let mut entries: Vec<_> = self.ids.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
