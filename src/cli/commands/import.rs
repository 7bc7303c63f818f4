//! Import command implementation
//!
//! This module implements the `import` command: read the CSV file, write
//! every row inside one PostgreSQL transaction, and report the outcome.

use super::{exit_code_for, print_error};
use crate::adapters::csv::PatientRecordReader;
use crate::adapters::postgresql::PostgreSQLClient;
use crate::config::load_config;
use crate::core::import::{
    ImportCoordinator, ImportProgress, ImportSummary, ReferenceCache, RowOutcome, TrackerOutcome,
};
use crate::domain::record::PatientRecord;
use crate::{log_import_complete, log_import_start};
use clap::Args;
use std::io::{self, Write};

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import (defaults to input.path from the configuration)
    pub file: Option<String>,

    /// Run every statement, then roll back instead of committing
    #[arg(long)]
    pub dry_run: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let code = self.run(config_path).await?;
        if self.pause {
            wait_for_enter()?;
        }
        Ok(code)
    }

    async fn run(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        if let Some(file) = &self.file {
            tracing::info!(file = %file, "Overriding input path from CLI");
            config.input.path = file.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        let dry_run = config.application.dry_run;

        let delimiter = match config.input.delimiter_byte() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {e}");
                return Ok(2);
            }
        };

        // Checked before any connection is opened
        let records = match PatientRecordReader::open(&config.input.path, delimiter) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, path = %config.input.path, "Cannot read input");
                print_error(&e);
                return Ok(exit_code_for(&e));
            }
        };

        log_import_start!(config.input.path, dry_run);
        if dry_run {
            println!("🔍 DRY RUN MODE - the transaction will be rolled back");
            println!();
        }
        println!("📄 Importing {}", config.input.path);

        let mut client = match PostgreSQLClient::connect(&config.postgresql).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                print_error(&e);
                return Ok(exit_code_for(&e));
            }
        };
        println!("🔌 Connected to {}", client.connection_string_safe());

        let tx = match client.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!(error = %e, "Failed to begin transaction");
                print_error(&e);
                return Ok(exit_code_for(&e));
            }
        };

        let coordinator = ImportCoordinator::new(config.import.clone(), dry_run);
        let mut progress = ConsoleProgress;

        let summary = match coordinator.run(tx, records, &mut progress).await {
            Ok(s) => s,
            Err(e) => {
                print_error(&e);
                eprintln!("   Transaction rolled back; no rows were imported.");
                return Ok(exit_code_for(&e));
            }
        };

        log_import_complete!(summary.patients_imported, summary.duration);
        summary.log_summary();
        print_summary(&summary);

        Ok(0)
    }
}

/// Prints the reference check and one line per tracker event
struct ConsoleProgress;

impl ImportProgress for ConsoleProgress {
    fn references_resolved(&mut self, refs: &ReferenceCache) {
        println!("🔗 Reference data resolved ({} lookups)", refs.entries().len());
    }

    fn row_written(&mut self, record: &PatientRecord, outcome: &RowOutcome) {
        let Some(tracker) = &record.tracker else {
            return;
        };
        if let Some(id) = outcome.tracker.source_id() {
            println!("Tracker '{tracker}' -> source_id = {id}");
        } else if outcome.tracker == TrackerOutcome::MissingSourceId {
            println!("Tracker '{tracker}' insert failed or already existed.");
        }
    }
}

fn print_summary(summary: &ImportSummary) {
    println!();
    println!(
        "Imported {} patients with full detail.",
        summary.patients_imported
    );
    println!();
    println!("📊 Import Summary:");
    println!("  Patients: {}", summary.patients_imported);
    println!("  Health Metrics: {}", summary.health_metrics);
    println!("  Reported Outcomes: {}", summary.reported_outcomes);
    println!("  EHR Notes: {}", summary.ehr_notes);
    println!(
        "  Appointments: {} inserted, {} already present",
        summary.appointments_inserted, summary.appointments_skipped
    );
    println!(
        "  Source Links: {} new, {} already present",
        summary.sources_linked, summary.source_links_existing
    );
    println!("  Total Writes: {}", summary.total_writes());
    if summary.trackers_skipped > 0 {
        println!("  Trackers Skipped: {}", summary.trackers_skipped);
    }
    println!(
        "  Duration: {:.2}s ({:.1} rows/s)",
        summary.duration.as_secs_f64(),
        summary.rows_per_second()
    );
    println!();

    if summary.committed {
        println!("✅ Import committed");
    } else {
        println!("🔍 Dry run complete, nothing was committed");
    }
}

fn wait_for_enter() -> io::Result<()> {
    print!("Press Enter to exit...");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(())
}
