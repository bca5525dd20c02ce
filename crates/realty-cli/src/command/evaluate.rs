//! Segmented model evaluation command
//!
//! Loads a listings file, removes price outliers and fits one linear model
//! per segment, then prints per-segment fit statistics and coefficients.
//! Segments that cannot be fitted are listed with the reason.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use realty_model::{
    evaluate::ModelResult,
    pipeline::{EvaluationReport, SegmentOutcome},
};

use crate::{command::ConfigArg, schema::report::EvaluationRecord, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct EvaluateArg {
    /// Path to the listings CSV file
    pub listings: PathBuf,

    #[clap(flatten)]
    pub config: ConfigArg,

    /// Save the JSON report to this path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the JSON report to stdout instead of tables
    #[arg(long)]
    pub json: bool,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let config = arg.config.load()?;
    let report = EvaluationReport::from_path(&arg.listings, &config)?;
    let record = EvaluationRecord {
        generated_at: Utc::now(),
        input: arg.listings.clone(),
        report,
    };

    if arg.json {
        util::write_json(&record, None)?;
    } else {
        print_report(&record.report);
    }

    if let Some(path) = &arg.output {
        util::write_json(&record, Some(path.as_path()))?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &EvaluationReport) {
    let config = &report.config;
    println!("Segment Evaluation Report");
    println!("=========================\n");
    println!(
        "Split: {:.0}% test, seed {}",
        config.split.test_fraction * 100.0,
        config.split.seed
    );

    let filter = &report.filter;
    match filter.bounds {
        Some(bounds) => println!(
            "Outlier filter: kept {} of {} listings (price in ({:.2}, {:.2}))",
            filter.filtered_count, filter.original_count, bounds.lower, bounds.upper
        ),
        None => println!("Outlier filter: no listings"),
    }
    println!();

    print_summary_table(&report.segments);
    println!();

    for result in report.successes() {
        print_coefficients(result);
        println!();
    }
}

fn print_summary_table(segments: &[SegmentOutcome]) {
    println!(
        "  {:<16} {:>7} {:>6} {:>16} {:>9} {:>10}",
        "Segment", "Train", "Test", "MSE", "R²", "Train R²"
    );
    // segment(16) + train(7) + test(6) + mse(16) + r2(9) + train_r2(10) + spaces(5)
    println!("  {}", "-".repeat(69));
    for outcome in segments {
        match &outcome.outcome {
            Ok(result) => println!(
                "  {:<16} {:>7} {:>6} {:>16.2} {:>9.4} {:>10.4}",
                outcome.segment.as_str(),
                result.train_count,
                result.test_count,
                result.mean_squared_error,
                result.r_squared,
                result.train_r_squared,
            ),
            Err(err) => println!("  {:<16} FAILED: {err}", outcome.segment.as_str()),
        }
    }
}

fn print_coefficients(result: &ModelResult) {
    println!("{} coefficients:", result.segment_name);
    println!("  {:<24} {:>16}", "Feature", "Coefficient");
    println!("  {}", "-".repeat(41));
    println!("  {:<24} {:>16.4}", "(intercept)", result.intercept);
    for (name, coefficient) in result.named_coefficients() {
        println!("  {name:<24} {coefficient:>16.4}");
    }
    if let Some(adjusted) = result.train_adjusted_r_squared {
        println!("  Adjusted R² (train): {adjusted:.4}");
    }
}
