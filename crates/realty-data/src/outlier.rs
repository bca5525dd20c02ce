//! Interquartile-range outlier filtering on the target price
//!
//! Bounds are derived from the first and third quartiles of `price_target`
//! (linear interpolation between closest ranks):
//!
//! ```text
//! IQR   = Q3 - Q1
//! lower = Q1 - k * IQR
//! upper = Q3 + k * IQR        (k = 1.5 by default)
//! ```
//!
//! A listing is kept iff `lower < price_target < upper`; values equal to a
//! bound are excluded. Filtering is deterministic and never modifies its
//! input.

use realty_stats::percentiles::Quartiles;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterBounds {
    pub lower: f64,
    pub upper: f64,
}

impl FilterBounds {
    /// Computes bounds over the dataset's target prices.
    ///
    /// Returns `None` for an empty dataset.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset, iqr_multiplier: f64) -> Option<Self> {
        let quartiles = Quartiles::new(dataset.targets())?;
        let iqr = quartiles.iqr();
        Some(Self {
            lower: quartiles.q1 - iqr_multiplier * iqr,
            upper: quartiles.q3 + iqr_multiplier * iqr,
        })
    }

    /// Strict containment on both ends.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower < value && value < self.upper
    }
}

/// Counts observed while filtering, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterReport {
    pub original_count: usize,
    pub filtered_count: usize,
    /// `None` when the input was empty.
    pub bounds: Option<FilterBounds>,
}

impl FilterReport {
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.original_count - self.filtered_count
    }
}

/// Result of partitioning a dataset into kept and excluded listings.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub kept: Dataset,
    pub excluded: Dataset,
    pub report: FilterReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierFilter {
    pub iqr_multiplier: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl OutlierFilter {
    #[must_use]
    pub fn new(iqr_multiplier: f64) -> Self {
        Self { iqr_multiplier }
    }

    /// Partitions `dataset` by the IQR bounds of its target prices.
    ///
    /// An empty dataset yields empty partitions and no bounds.
    #[must_use]
    pub fn apply(&self, dataset: &Dataset) -> FilterOutcome {
        let Some(bounds) = FilterBounds::from_dataset(dataset, self.iqr_multiplier) else {
            log::warn!("outlier filter received an empty dataset");
            return FilterOutcome {
                kept: Dataset::default(),
                excluded: Dataset::default(),
                report: FilterReport {
                    original_count: 0,
                    filtered_count: 0,
                    bounds: None,
                },
            };
        };

        let (kept, excluded): (Vec<_>, Vec<_>) = dataset
            .iter()
            .cloned()
            .partition(|listing| bounds.contains(listing.price_target));

        let report = FilterReport {
            original_count: dataset.len(),
            filtered_count: kept.len(),
            bounds: Some(bounds),
        };
        log::info!(
            "price bounds ({:.2}, {:.2}): kept {} of {} listings",
            bounds.lower,
            bounds.upper,
            report.filtered_count,
            report.original_count
        );

        FilterOutcome {
            kept: Dataset::new(kept),
            excluded: Dataset::new(excluded),
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{derive::DerivedListing, listing::PostedBy};

    fn listing_with_price(price_target: f64) -> DerivedListing {
        DerivedListing {
            posted_by: PostedBy::Owner,
            under_construction: false,
            has_regulatory_approval: false,
            bedroom_count: 2,
            area_sq_m: 100.0,
            ready_to_move: true,
            is_resale: true,
            longitude: 12.9,
            latitude: 77.6,
            price_target,
        }
    }

    fn dataset(prices: impl IntoIterator<Item = f64>) -> Dataset {
        prices.into_iter().map(listing_with_price).collect()
    }

    #[test]
    fn test_three_extreme_outliers_removed() {
        let mut prices = (1..=97).map(|i| 40_000.0 + f64::from(i) * 100.0).collect::<Vec<_>>();
        prices.insert(10, 5_000_000.0);
        prices.insert(50, 9_000_000.0);
        prices.push(-1_000_000.0);
        let outcome = OutlierFilter::default().apply(&dataset(prices));
        assert_eq!(outcome.report.original_count, 100);
        assert_eq!(outcome.report.filtered_count, 97);
        assert_eq!(outcome.excluded.len(), 3);
        assert_eq!(outcome.report.excluded_count(), 3);
    }

    #[test]
    fn test_partition_respects_bounds() {
        let prices = [1.0, 2.0, 2.5, 3.0, 3.0, 4.0, 50.0, 0.001, 3.5, 2.2];
        let outcome = OutlierFilter::default().apply(&dataset(prices));
        let bounds = outcome.report.bounds.unwrap();
        assert!(outcome.kept.iter().all(|l| bounds.contains(l.price_target)));
        assert!(outcome.excluded.iter().all(|l| !bounds.contains(l.price_target)));
        assert_eq!(outcome.kept.len() + outcome.excluded.len(), prices.len());
        assert!(outcome.report.filtered_count <= outcome.report.original_count);
    }

    #[test]
    fn test_boundary_values_are_excluded() {
        // Q1 = 2, Q3 = 4, IQR = 2; multiplier 0 makes the bounds [2, 4].
        let outcome = OutlierFilter::new(0.0).apply(&dataset([1.0, 2.0, 3.0, 4.0, 5.0]));
        let kept = outcome.kept.targets();
        assert_eq!(kept, [3.0]);
    }

    #[test]
    fn test_constant_prices_are_all_excluded() {
        // IQR = 0 so both bounds equal the single value.
        let outcome = OutlierFilter::default().apply(&dataset([7.0; 4]));
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.report.original_count, 4);
    }

    #[test]
    fn test_empty_dataset() {
        let outcome = OutlierFilter::default().apply(&Dataset::default());
        assert!(outcome.kept.is_empty());
        assert!(outcome.excluded.is_empty());
        assert_eq!(outcome.report.bounds, None);
        assert_eq!(outcome.report.original_count, 0);
    }

    #[test]
    fn test_filter_is_deterministic() {
        let data = dataset([3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 500.0]);
        let a = OutlierFilter::default().apply(&data);
        let b = OutlierFilter::default().apply(&data);
        assert_eq!(a.kept, b.kept);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_order_is_preserved() {
        let outcome = OutlierFilter::default().apply(&dataset([5.0, 3.0, 4.0, 1000.0, 2.0]));
        assert_eq!(outcome.kept.targets(), [5.0, 3.0, 4.0, 2.0]);
    }
}
