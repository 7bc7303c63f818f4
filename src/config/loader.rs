//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ImportConfig, MissingSourcePolicy};
use super::secret::secret_string;
use crate::domain::errors::ImportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ImportConfig
/// 4. Applies environment variable overrides (PATIENT_IMPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use patient_import::config::loader::load_config;
///
/// let config = load_config("patient-import.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ImportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ImportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ImportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ImportConfig = toml::from_str(&contents)
        .map_err(|e| ImportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ImportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ImportError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ImportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the PATIENT_IMPORT_* prefix
///
/// Variables follow the pattern PATIENT_IMPORT_<SECTION>_<KEY>, for example
/// PATIENT_IMPORT_POSTGRESQL_CONNECTION_STRING.
fn apply_env_overrides(config: &mut ImportConfig) {
    // Application
    if let Ok(val) = std::env::var("PATIENT_IMPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PATIENT_IMPORT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Input
    if let Ok(val) = std::env::var("PATIENT_IMPORT_INPUT_PATH") {
        config.input.path = val;
    }
    if let Ok(val) = std::env::var("PATIENT_IMPORT_INPUT_DELIMITER") {
        config.input.delimiter = val;
    }

    // PostgreSQL
    if let Ok(val) = std::env::var("PATIENT_IMPORT_POSTGRESQL_CONNECTION_STRING") {
        config.postgresql.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("PATIENT_IMPORT_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.postgresql.statement_timeout_seconds = secs;
        }
    }
    if let Ok(val) = std::env::var("PATIENT_IMPORT_POSTGRESQL_SSL_MODE") {
        config.postgresql.ssl_mode = val;
    }

    // Import
    if let Ok(val) = std::env::var("PATIENT_IMPORT_IMPORT_TRACKER_DESCRIPTION") {
        config.import.tracker_description = val;
    }
    if let Ok(val) = std::env::var("PATIENT_IMPORT_IMPORT_MISSING_SOURCE_ID") {
        match val.to_lowercase().as_str() {
            "skip" => config.import.missing_source_id = MissingSourcePolicy::Skip,
            "fail" => config.import.missing_source_id = MissingSourcePolicy::Fail,
            other => {
                tracing::warn!(value = %other, "Ignoring unknown missing_source_id override");
            }
        }
    }

    // Logging
    if let Ok(val) = std::env::var("PATIENT_IMPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PATIENT_IMPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
