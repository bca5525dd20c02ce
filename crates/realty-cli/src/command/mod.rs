use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use realty_model::pipeline::PipelineConfig;

use crate::util;

use self::{describe::DescribeArg, evaluate::EvaluateArg, quality::QualityArg};

mod describe;
mod evaluate;
mod quality;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Filter outliers and evaluate a linear model per listing segment
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Summarize distributions, correlations and category shares
    Describe(#[clap(flatten)] DescribeArg),
    /// Report empty fields, duplicate rows and constant columns
    Quality(#[clap(flatten)] QualityArg),
}

/// Pipeline settings: a JSON file, then individual overrides.
#[derive(Debug, Clone, Args)]
pub(crate) struct ConfigArg {
    /// JSON file with pipeline settings; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the train/test shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Share of each segment held out for testing, in (0, 1)
    #[arg(long)]
    test_fraction: Option<f64>,

    /// Outlier fence width in multiples of the interquartile range
    #[arg(long)]
    iqr_multiplier: Option<f64>,

    /// Source-currency units per target-currency unit
    #[arg(long)]
    fx_rate: Option<f64>,

    /// Source-currency units per lac
    #[arg(long)]
    lacs_to_unit: Option<f64>,
}

impl ConfigArg {
    fn load(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_pipeline_config(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.split.seed = seed;
        }
        if let Some(test_fraction) = self.test_fraction {
            config.split.test_fraction = test_fraction;
        }
        if let Some(iqr_multiplier) = self.iqr_multiplier {
            config.iqr_multiplier = iqr_multiplier;
        }
        if let Some(fx_rate) = self.fx_rate {
            config.conversion.fx_rate = fx_rate;
        }
        if let Some(lacs_to_unit) = self.lacs_to_unit {
            config.conversion.lacs_to_unit = lacs_to_unit;
        }

        let fraction = config.split.test_fraction;
        if fraction.is_nan() || fraction <= 0.0 || fraction >= 1.0 {
            bail!("test fraction must be between 0 and 1, got {fraction}");
        }
        if !config.iqr_multiplier.is_finite() || config.iqr_multiplier < 0.0 {
            bail!(
                "IQR multiplier must be a non-negative number, got {}",
                config.iqr_multiplier
            );
        }
        let rates = config.conversion;
        for (name, rate) in [
            ("fx rate", rates.fx_rate),
            ("lacs-to-unit rate", rates.lacs_to_unit),
            ("square feet per square meter", rates.sq_ft_per_sq_m),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                bail!("{name} must be a positive number, got {rate}");
            }
        }
        log::debug!("pipeline config: {config:?}");
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Quality(arg) => quality::run(&arg)?,
    }
    Ok(())
}
