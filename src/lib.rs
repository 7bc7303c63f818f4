// Patient Import - CSV to PostgreSQL patient loader
// Copyright (c) 2025 Patient Import Contributors
// Licensed under the MIT License

//! # Patient Import
//!
//! One-shot bulk import of patient records from a delimited text file into a
//! normalized PostgreSQL schema.
//!
//! ## Overview
//!
//! Each input row becomes a patient upsert plus a handful of dependent rows:
//! a sex health metric, condition and allergy outcomes, a prescription EHR
//! note, a routine appointment, and an optional wearable tracker source with
//! its patient link. Lookup ids are resolved once per run, and the whole file
//! is written inside a single transaction that is committed only if every
//! row succeeds.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Reference resolution, row writing and transaction coordination
//! - [`adapters`] - CSV reader and PostgreSQL implementation of the write seam
//! - [`domain`] - Records, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patient_import::adapters::csv::PatientRecordReader;
//! use patient_import::adapters::postgresql::PostgreSQLClient;
//! use patient_import::config::load_config;
//! use patient_import::core::import::ImportCoordinator;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("patient-import.toml")?;
//!     let records = PatientRecordReader::open(&config.input.path, b',')?;
//!
//!     let mut client = PostgreSQLClient::connect(&config.postgresql).await?;
//!     let tx = client.begin().await?;
//!
//!     let summary = ImportCoordinator::new(config.import.clone(), false)
//!         .run(tx, records, &mut ())
//!         .await?;
//!
//!     println!("Imported {} patients", summary.patients_imported);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type is
//! [`domain::ImportError`]. Any error during a run rolls the transaction back.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
