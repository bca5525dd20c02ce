//! Data-quality command
//!
//! Reports problems in the raw listings file before any value is parsed.

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use realty_data::quality::{self, QualityReport};

use crate::{schema::report::QualityRecord, util};

/// Number of individual problems listed before the rest are summarized.
const MAX_LISTED: usize = 10;

#[derive(Debug, Clone, Args)]
pub(crate) struct QualityArg {
    /// Path to the listings CSV file
    pub listings: PathBuf,

    /// Write a copy of the file without duplicate rows to this path
    #[arg(long)]
    pub dedup_output: Option<PathBuf>,

    /// Save the report as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &QualityArg) -> anyhow::Result<()> {
    let table = util::read_listings_table(&arg.listings)?;
    let report = QualityReport::from_table(&table);

    print_report(&report);

    if let Some(path) = &arg.dedup_output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let written = quality::write_deduplicated(&table, BufWriter::new(file))
            .with_context(|| format!("Failed to write deduplicated rows to {}", path.display()))?;
        eprintln!("Wrote {written} unique rows to {}", path.display());
    }

    if let Some(path) = &arg.output {
        let record = QualityRecord {
            generated_at: Utc::now(),
            input: arg.listings.clone(),
            replica_count: report.replica_count(),
            report,
        };
        util::write_json(&record, Some(path.as_path()))?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &QualityReport) {
    println!("Data Quality Report");
    println!("===================\n");
    println!(
        "Rows: {}, columns: {}",
        report.row_count, report.column_count
    );
    println!();

    println!("Empty fields: {}", report.empty_fields.len());
    for field in report.empty_fields.iter().take(MAX_LISTED) {
        println!("  line {:>8}  {}", field.line, field.column);
    }
    print_remaining(report.empty_fields.len());
    println!();

    println!(
        "Duplicated rows: {} distinct, {} redundant copies",
        report.duplicated_row_count(),
        report.replica_count()
    );
    for group in report.duplicates.iter().take(MAX_LISTED) {
        let lines = group
            .replica_lines
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("  line {:>8}  repeated at {lines}", group.first_line);
    }
    print_remaining(report.duplicates.len());
    println!();

    println!("Constant columns: {}", report.constant_columns.len());
    for column in &report.constant_columns {
        println!("  {:<24} always '{}'", column.column, column.value);
    }
}

fn print_remaining(total: usize) {
    if total > MAX_LISTED {
        println!("  ... and {} more", total - MAX_LISTED);
    }
}
