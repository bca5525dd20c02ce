//! Exploratory summary command

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use realty_data::summary::ExploratorySummary;
use realty_stats::descriptive::DescriptiveStats;

use crate::{command::ConfigArg, schema::report::SummaryRecord, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Path to the listings CSV file
    pub listings: PathBuf,

    #[clap(flatten)]
    pub config: ConfigArg,

    /// Summarize only the listings that pass the outlier filter
    #[arg(long)]
    pub filtered: bool,

    /// Save the summary as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let config = arg.config.load()?;
    let mut dataset = util::read_listings_file(&arg.listings, &config.conversion)?;
    if arg.filtered {
        dataset = config.outlier_filter().apply(&dataset).kept;
    }
    let summary = ExploratorySummary::from_dataset(&dataset);

    print_summary(&summary);

    if let Some(path) = &arg.output {
        let record = SummaryRecord {
            generated_at: Utc::now(),
            input: arg.listings.clone(),
            filtered: arg.filtered,
            summary,
        };
        util::write_json(&record, Some(path.as_path()))?;
        eprintln!("Summary saved to {}", path.display());
    }

    Ok(())
}

fn print_summary(summary: &ExploratorySummary) {
    println!("Listings: {}", summary.listing_count);
    println!();

    println!("By category:");
    for share in &summary.categories {
        println!(
            "  {:<10} (code {}) {:>8} {:>6.1}%",
            share.posted_by.as_str(),
            share.code,
            share.count,
            share.percent
        );
    }
    println!();

    println!("  {:<16} {:>14} {:>14} {:>14} {:>14}", "", "Min", "Median", "Mean", "Max");
    println!("  {}", "-".repeat(76));
    print_stats_row("price_target", summary.price.as_ref());
    print_stats_row("area_sq_m", summary.area.as_ref());
    println!();

    if summary.listing_count > 0 {
        println!("price_target percentiles:");
        for (p, value) in summary.price_percentiles.iter() {
            println!("  P{p:<3} {value:>14.2}");
        }
        println!();
    }

    println!("Correlation with price_target:");
    for (name, value) in &summary.price_correlation {
        if value.is_nan() {
            println!("  {name:<24} {:>8}", "N/A");
        } else {
            println!("  {name:<24} {value:>8.3}");
        }
    }
}

fn print_stats_row(label: &str, stats: Option<&DescriptiveStats>) {
    match stats {
        Some(s) => println!(
            "  {label:<16} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            s.min, s.median, s.mean, s.max
        ),
        None => println!("  {label:<16} {:>14}", "N/A"),
    }
}
