//! Core business logic for the patient importer.
//!
//! # Import Workflow
//!
//! 1. **Begin**: open one transaction for the whole run
//! 2. **Resolve**: look up the six seed ids into a [`ReferenceCache`](import::ReferenceCache)
//! 3. **Write**: for each input row, plan and execute its dependent writes
//! 4. **Finish**: commit, or roll back on the first error (always for a dry run)
//! 5. **Report**: return an [`ImportSummary`](import::ImportSummary)
//!
//! # Example
//!
//! ```rust,no_run
//! use patient_import::adapters::csv::PatientRecordReader;
//! use patient_import::adapters::postgresql::PostgreSQLClient;
//! use patient_import::config::load_config;
//! use patient_import::core::import::ImportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("patient-import.toml")?;
//! let records = PatientRecordReader::open(&config.input.path, b',')?;
//!
//! let mut client = PostgreSQLClient::connect(&config.postgresql).await?;
//! let tx = client.begin().await?;
//!
//! let coordinator = ImportCoordinator::new(config.import.clone(), false);
//! let summary = coordinator.run(tx, records, &mut ()).await?;
//!
//! println!("Imported {} patients", summary.patients_imported);
//! # Ok(())
//! # }
//! ```

pub mod import;
