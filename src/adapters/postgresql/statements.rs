//! SQL text for every statement the importer prepares
//!
//! Parameter order matches the `*_TYPES` arrays next to each statement.

use tokio_postgres::types::Type;

pub const UPSERT_PATIENT: &str = "\
INSERT INTO patient (patient_id, first_name, last_name, date_of_birth)
OVERRIDING SYSTEM VALUE
VALUES ($1, $2, $3, $4)
ON CONFLICT (patient_id) DO UPDATE
SET first_name = EXCLUDED.first_name,
    last_name = EXCLUDED.last_name,
    date_of_birth = EXCLUDED.date_of_birth";

pub const UPSERT_PATIENT_TYPES: &[Type] = &[Type::INT4, Type::VARCHAR, Type::VARCHAR, Type::DATE];

pub const INSERT_HEALTH_METRIC: &str = "\
INSERT INTO health_metrics (patient_id, metric_type_id, metric_value, recorded_date)
VALUES ($1, $2, $3, NOW())";

pub const INSERT_HEALTH_METRIC_TYPES: &[Type] = &[Type::INT4, Type::INT4, Type::VARCHAR];

pub const INSERT_REPORTED_OUTCOME: &str = "\
INSERT INTO reported_outcomes (patient_id, outcome_type_id, outcome_text, outcome_date)
VALUES ($1, $2, $3, NOW())";

pub const INSERT_REPORTED_OUTCOME_TYPES: &[Type] = &[Type::INT4, Type::INT4, Type::TEXT];

pub const INSERT_EHR_NOTE: &str = "\
INSERT INTO ehr (patient_id, ehr_type_id, ehr_content)
VALUES ($1, $2, $3)";

pub const INSERT_EHR_NOTE_TYPES: &[Type] = &[Type::INT4, Type::INT4, Type::TEXT];

pub const INSERT_APPOINTMENT: &str = "\
INSERT INTO appointments (patient_id, appointment_date, appointment_type_id)
VALUES ($1, $2, $3)
ON CONFLICT DO NOTHING";

pub const INSERT_APPOINTMENT_TYPES: &[Type] = &[Type::INT4, Type::DATE, Type::INT4];

pub const UPSERT_SOURCE_DEFINITION: &str = "\
INSERT INTO source_definition (source_type_id, source_name, description, created_date)
VALUES ($1, $2, $3, NOW())
ON CONFLICT (source_name) DO UPDATE
SET description = EXCLUDED.description
RETURNING source_id";

pub const UPSERT_SOURCE_DEFINITION_TYPES: &[Type] = &[Type::INT4, Type::VARCHAR, Type::TEXT];

pub const INSERT_PATIENT_SOURCE: &str = "\
INSERT INTO patient_source (patient_id, source_id, associated_date)
VALUES ($1, $2, NOW())
ON CONFLICT DO NOTHING";

pub const INSERT_PATIENT_SOURCE_TYPES: &[Type] = &[Type::INT4, Type::INT4];
