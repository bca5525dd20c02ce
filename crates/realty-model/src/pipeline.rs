//! Segmented evaluation driver
//!
//! Runs outlier filtering and then every segment's evaluation, collecting
//! one [`SegmentOutcome`] per segment. A failing segment is reported next
//! to the successful ones; it never aborts the run.

use std::path::Path;

use realty_data::{
    dataset::{Dataset, LoadError},
    derive::ConversionRates,
    normalize::NormalizeError,
    outlier::{DEFAULT_IQR_MULTIPLIER, FilterReport, OutlierFilter},
    raw::RawTable,
};
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    SegmentError,
    evaluate::{ModelResult, evaluate_segment},
    segment::{Segment, SegmentKind},
    split::SplitConfig,
};

/// Tunable constants of a pipeline run.
///
/// Every field has a default, so a JSON file may set only what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub conversion: ConversionRates,
    pub split: SplitConfig,
    pub iqr_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            conversion: ConversionRates::default(),
            split: SplitConfig::default(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn outlier_filter(&self) -> OutlierFilter {
        OutlierFilter::new(self.iqr_multiplier)
    }
}

/// Result of one segment: its model, or why it has none.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutcome {
    pub segment: SegmentKind,
    pub outcome: Result<ModelResult, SegmentError>,
}

impl SegmentOutcome {
    #[must_use]
    pub fn result(&self) -> Option<&ModelResult> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&SegmentError> {
        self.outcome.as_ref().err()
    }
}

impl Serialize for SegmentOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(tag = "status", rename_all = "snake_case")]
        enum Repr<'a> {
            Ok {
                segment: SegmentKind,
                result: &'a ModelResult,
            },
            Failed {
                segment: SegmentKind,
                error: &'static str,
                message: String,
            },
        }

        let segment = self.segment;
        match &self.outcome {
            Ok(result) => Repr::Ok { segment, result },
            Err(err) => Repr::Failed {
                segment,
                error: err.kind(),
                message: err.to_string(),
            },
        }
        .serialize(serializer)
    }
}

/// Evaluates every segment of an already filtered dataset.
#[must_use]
pub fn evaluate_segments(dataset: &Dataset, split: &SplitConfig) -> Vec<SegmentOutcome> {
    SegmentKind::ALL
        .iter()
        .map(|&segment| {
            let outcome = Segment::select(segment, dataset)
                .and_then(|selected| evaluate_segment(&selected, split));
            if let Err(err) = &outcome {
                log::warn!("{err}");
            }
            SegmentOutcome { segment, outcome }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub config: PipelineConfig,
    pub filter: FilterReport,
    pub segments: Vec<SegmentOutcome>,
}

impl EvaluationReport {
    /// Normalizes `table`, derives it with `config.conversion` and runs.
    pub fn from_table(table: &RawTable, config: &PipelineConfig) -> Result<Self, NormalizeError> {
        let dataset = Dataset::from_table(table, &config.conversion)?;
        Ok(Self::run(&dataset, config))
    }

    /// Loads a listings file with `config.conversion` and runs.
    pub fn from_path<P>(path: P, config: &PipelineConfig) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        let dataset = Dataset::from_path(path, &config.conversion)?;
        Ok(Self::run(&dataset, config))
    }

    /// Filters `dataset` and evaluates every segment of what remains.
    ///
    /// The report records `config` as given, so `dataset` must have been
    /// derived with `config.conversion`. [`from_table`](Self::from_table)
    /// and [`from_path`](Self::from_path) guarantee this.
    #[must_use]
    pub fn run(dataset: &Dataset, config: &PipelineConfig) -> Self {
        let filtered = config.outlier_filter().apply(dataset);
        let segments = evaluate_segments(&filtered.kept, &config.split);
        Self {
            config: *config,
            filter: filtered.report,
            segments,
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &ModelResult> {
        self.segments.iter().filter_map(SegmentOutcome::result)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SegmentError> {
        self.segments.iter().filter_map(SegmentOutcome::error)
    }
}

#[cfg(test)]
mod tests {
    use realty_data::{derive::DerivedListing, listing::PostedBy};

    use super::*;

    fn listing(i: u32, posted_by: PostedBy) -> DerivedListing {
        let x = f64::from(i);
        DerivedListing {
            posted_by,
            under_construction: i % 3 == 0,
            has_regulatory_approval: i % 5 < 2,
            bedroom_count: 1 + i % 4,
            area_sq_m: 50.0 + 3.0 * x + (x * 0.41).sin() * 4.0,
            ready_to_move: i % 2 == 0,
            is_resale: i % 7 < 4,
            longitude: 12.0 + (x * 1.3).cos(),
            latitude: 77.0 + (x * 0.7).sin(),
            price_target: 20_000.0 + 300.0 * x + (x * 2.1).sin() * 900.0,
        }
    }

    #[test]
    fn test_failures_are_reported_with_successes() {
        let mut listings = (0..40)
            .map(|i| listing(i, PostedBy::Owner))
            .collect::<Vec<_>>();
        listings.extend((40..43).map(|i| listing(i, PostedBy::Dealer)));
        let report = EvaluationReport::run(&Dataset::new(listings), &PipelineConfig::default());

        assert_eq!(report.filter.original_count, 43);
        let segments = report
            .segments
            .iter()
            .map(|s| s.segment)
            .collect::<Vec<_>>();
        assert_eq!(segments, SegmentKind::ALL);

        let builder = report.segments[0].error().unwrap();
        assert!(builder.is_empty_segment());
        assert_eq!(builder.segment(), SegmentKind::Builder);
        assert!(report.segments[1].error().unwrap().is_insufficient_data());
        assert_eq!(
            report.segments[2].result().unwrap().segment_name,
            SegmentKind::Owner
        );
        assert!(report.failures().count() >= 2);
    }

    #[test]
    fn test_empty_dataset_reports_every_segment_empty() {
        let report = EvaluationReport::run(&Dataset::default(), &PipelineConfig::default());
        assert_eq!(report.filter.bounds, None);
        assert!(report.failures().all(SegmentError::is_empty_segment));
        assert_eq!(report.failures().count(), SegmentKind::LEN);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcomes = evaluate_segments(
            &(0..40).map(|i| listing(i, PostedBy::Owner)).collect(),
            &SplitConfig::default(),
        );
        let json = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(json[0]["segment"], "Builder");
        assert_eq!(json[0]["status"], "failed");
        assert_eq!(json[0]["error"], "empty_segment");
        assert_eq!(json[2]["status"], "ok");
        assert_eq!(json[2]["result"]["train_count"], 32);
    }

    #[test]
    fn test_config_defaults_and_partial_json() {
        let config = PipelineConfig::default();
        assert!((config.conversion.fx_rate - 94.94).abs() < 1e-12);
        assert!((config.conversion.lacs_to_unit - 100_000.0).abs() < 1e-12);
        assert_eq!(config.split.seed, 42);
        assert!((config.split.test_fraction - 0.2).abs() < 1e-12);
        assert!((config.iqr_multiplier - 1.5).abs() < 1e-12);

        let parsed: PipelineConfig =
            serde_json::from_str(r#"{ "split": { "seed": 7 }, "iqr_multiplier": 3.0 }"#).unwrap();
        assert_eq!(parsed.split.seed, 7);
        assert!((parsed.split.test_fraction - 0.2).abs() < 1e-12);
        assert!((parsed.iqr_multiplier - 3.0).abs() < 1e-12);
        assert_eq!(parsed.conversion, ConversionRates::default());
    }
}
