//! Exploratory summary of a dataset
//!
//! Everything a plotting or reporting layer needs to describe the data:
//! the correlation matrix over the numeric fields, per-category listing
//! shares, and the distributions of price and area.

use realty_stats::{
    correlation::CorrelationMatrix, descriptive::DescriptiveStats, histogram::Histogram,
    percentiles::Percentiles,
};
use serde::Serialize;

use crate::{
    dataset::Dataset,
    derive::NumericField,
    listing::PostedBy,
};

pub const PRICE_HISTOGRAM_BINS: usize = 20;
pub const PRICE_PERCENTILES: [f64; 7] = [1.0, 5.0, 25.0, 50.0, 75.0, 95.0, 99.0];

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub posted_by: PostedBy,
    pub code: u8,
    pub count: usize,
    /// Percentage of all listings, 0.0 to 100.0.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploratorySummary {
    pub listing_count: usize,
    pub correlation: CorrelationMatrix,
    /// Correlation of each feature with the target price, highest first.
    pub price_correlation: Vec<(String, f64)>,
    pub categories: Vec<CategoryShare>,
    /// `None` for an empty dataset.
    pub price: Option<DescriptiveStats>,
    pub area: Option<DescriptiveStats>,
    /// `NaN` (serialized as `null`) for an empty dataset.
    pub price_percentiles: Percentiles,
    pub price_histogram: Histogram,
}

impl ExploratorySummary {
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let names = NumericField::ALL
            .iter()
            .map(|f| f.name().to_owned())
            .collect();
        let columns = NumericField::ALL
            .iter()
            .map(|&f| dataset.column(f))
            .collect::<Vec<_>>();
        let correlation = CorrelationMatrix::new(names, &columns);
        let price_correlation = correlation
            .ranked_against(NumericField::PriceTarget.name())
            .unwrap_or_default();

        let prices = dataset.targets();
        Self {
            listing_count: dataset.len(),
            price_correlation,
            correlation,
            categories: category_shares(dataset),
            price: DescriptiveStats::new(prices.iter().copied()),
            area: DescriptiveStats::new(dataset.column(NumericField::AreaSqM)),
            price_percentiles: Percentiles::new(&prices, &PRICE_PERCENTILES),
            price_histogram: Histogram::new(prices, PRICE_HISTOGRAM_BINS),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn category_shares(dataset: &Dataset) -> Vec<CategoryShare> {
    let total = dataset.len();
    dataset
        .count_by_category()
        .into_iter()
        .map(|(posted_by, count)| CategoryShare {
            posted_by,
            code: posted_by.code(),
            count,
            percent: if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::DerivedListing;

    fn listing(posted_by: PostedBy, area_sq_m: f64, price_target: f64) -> DerivedListing {
        DerivedListing {
            posted_by,
            under_construction: false,
            has_regulatory_approval: area_sq_m > 100.0,
            bedroom_count: 2,
            area_sq_m,
            ready_to_move: true,
            is_resale: false,
            longitude: 12.9,
            latitude: 77.6,
            price_target,
        }
    }

    #[test]
    fn test_summary_of_small_dataset() {
        let dataset = Dataset::new(vec![
            listing(PostedBy::Owner, 50.0, 500.0),
            listing(PostedBy::Dealer, 100.0, 1000.0),
            listing(PostedBy::Dealer, 150.0, 1500.0),
            listing(PostedBy::Owner, 200.0, 2000.0),
        ]);
        let summary = ExploratorySummary::from_dataset(&dataset);

        assert_eq!(summary.listing_count, 4);
        let (top_name, top_value) = &summary.price_correlation[0];
        assert_eq!(top_name, "area_sq_m");
        assert!((top_value - 1.0).abs() < 1e-12);
        // Constant columns have no correlation and rank last.
        assert!(summary.price_correlation.last().unwrap().1.is_nan());

        let shares = summary
            .categories
            .iter()
            .map(|c| (c.posted_by, c.count))
            .collect::<Vec<_>>();
        assert_eq!(
            shares,
            [
                (PostedBy::Builder, 0),
                (PostedBy::Dealer, 2),
                (PostedBy::Owner, 2)
            ]
        );
        assert!((summary.categories[1].percent - 50.0).abs() < 1e-12);
        assert!((summary.price.unwrap().median - 1250.0).abs() < 1e-9);
        assert_eq!(summary.price_percentiles.get(50.0), Some(1250.0));
    }

    #[test]
    fn test_histogram_holds_every_price() {
        let prices = [
            117_919.585_752,
            379_615.8,
            449_491.615_3,
            449_491.615_3,
            449_491.615_3,
            449_491.615_3,
        ];
        let dataset = prices
            .iter()
            .map(|&price| listing(PostedBy::Owner, 80.0, price))
            .collect::<Dataset>();
        let summary = ExploratorySummary::from_dataset(&dataset);
        let total: u64 = summary.price_histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_summary_of_empty_dataset() {
        let summary = ExploratorySummary::from_dataset(&Dataset::default());
        assert_eq!(summary.listing_count, 0);
        assert!(summary.price.is_none());
        assert!(summary.price_histogram.bins.is_empty());
        assert!(summary.categories.iter().all(|c| c.percent == 0.0));
    }
}
