//! Holdout evaluation of one segment
//!
//! 1. Split the segment's rows into train and test with a seeded shuffle
//!    ([`SplitConfig`]); features and targets move together.
//! 2. Fit ordinary least squares on the train rows ([`LinearModel`]).
//! 3. Predict the test rows and score them (MSE and R²).
//!
//! The same segment and split configuration always produce the same
//! [`ModelResult`].

use serde::Serialize;

use crate::{
    SegmentError,
    metrics,
    ols::{LinearModel, OlsError},
    segment::{Segment, SegmentKind},
    split::{Split, SplitConfig},
};

/// Name reported when the intercept column itself is degenerate.
pub const INTERCEPT: &str = "intercept";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResult {
    pub segment_name: SegmentKind,
    /// Aligned with `coefficients`.
    pub feature_names: Vec<&'static str>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// On the test split.
    pub mean_squared_error: f64,
    /// On the test split.
    pub r_squared: f64,
    pub train_count: usize,
    pub test_count: usize,
    pub train_r_squared: f64,
    /// `None` when the train split leaves no residual degrees of freedom.
    pub train_adjusted_r_squared: Option<f64>,
}

impl ModelResult {
    /// Coefficients paired with their feature names.
    pub fn named_coefficients(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.feature_names
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
    }
}

/// Splits, fits and scores `segment`.
pub fn evaluate_segment(segment: &Segment, split: &SplitConfig) -> Result<ModelResult, SegmentError> {
    let kind = segment.kind();
    let parameters = segment.feature_count() + 1;
    let Split { train, test } = split.split(segment.len());
    if train.len() < parameters || test.is_empty() {
        return Err(SegmentError::InsufficientData {
            segment: kind,
            train_rows: train.len(),
            test_rows: test.len(),
            parameters,
        });
    }

    let (train_features, train_targets) = segment.rows(&train);
    let (test_features, test_targets) = segment.rows(&test);

    let model = LinearModel::fit(&train_features, &train_targets).map_err(|e| match e {
        OlsError::Singular { column } => SegmentError::SingularFeatureMatrix {
            segment: kind,
            feature: column
                .checked_sub(1)
                .map_or(INTERCEPT, |i| segment.feature_names()[i]),
        },
        OlsError::Underdetermined { rows, parameters } => SegmentError::InsufficientData {
            segment: kind,
            train_rows: rows,
            test_rows: test.len(),
            parameters,
        },
    })?;

    let train_predictions = model.predict_all(&train_features);
    let test_predictions = model.predict_all(&test_features);
    let train_r_squared =
        metrics::r_squared(train_targets.as_slice(), train_predictions.as_slice());

    let result = ModelResult {
        segment_name: kind,
        feature_names: segment.feature_names().to_vec(),
        coefficients: model.coefficients.iter().copied().collect(),
        intercept: model.intercept,
        mean_squared_error: metrics::mean_squared_error(
            test_targets.as_slice(),
            test_predictions.as_slice(),
        ),
        r_squared: metrics::r_squared(test_targets.as_slice(), test_predictions.as_slice()),
        train_count: train.len(),
        test_count: test.len(),
        train_r_squared,
        train_adjusted_r_squared: metrics::adjusted_r_squared(
            train_r_squared,
            train.len(),
            segment.feature_count(),
        ),
    };
    log::info!(
        "segment {kind}: train {} / test {}, MSE {:.4}, R² {:.4}",
        result.train_count,
        result.test_count,
        result.mean_squared_error,
        result.r_squared
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use realty_data::{dataset::Dataset, derive::DerivedListing, listing::PostedBy};

    use super::*;

    /// Listings whose price is an exact linear function of the features.
    fn linear_listing(i: u32, posted_by: PostedBy) -> DerivedListing {
        let x = f64::from(i);
        let area_sq_m = 40.0 + 7.0 * x + (x * 0.37).sin() * 5.0;
        let longitude = 12.0 + (x * 1.7).cos();
        let latitude = 77.0 + (x * 0.9).sin() * 0.5;
        let bedroom_count = 1 + i % 4;
        let under_construction = i % 3 == 0;
        let has_regulatory_approval = i % 5 < 2;
        let is_resale = i % 7 < 4;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let price_target = 1_000.0
            + 350.0 * area_sq_m
            + 2_000.0 * f64::from(bedroom_count)
            - 1_500.0 * flag(under_construction)
            + 800.0 * flag(has_regulatory_approval)
            + 600.0 * flag(is_resale)
            + 900.0 * longitude
            - 400.0 * latitude;
        DerivedListing {
            posted_by,
            under_construction,
            has_regulatory_approval,
            bedroom_count,
            area_sq_m,
            // Independent of `under_construction` so the design has full rank.
            ready_to_move: i % 2 == 0,
            is_resale,
            longitude,
            latitude,
            price_target,
        }
    }

    fn segment(kind: SegmentKind, listings: Vec<DerivedListing>) -> Segment {
        Segment::select(kind, &Dataset::new(listings)).unwrap()
    }

    #[test]
    fn test_exact_linear_data_is_recovered() {
        let listings = (0..60).map(|i| linear_listing(i, PostedBy::Owner)).collect();
        let segment = segment(SegmentKind::Owner, listings);
        let result = evaluate_segment(&segment, &SplitConfig::default()).unwrap();

        assert_eq!(result.segment_name, SegmentKind::Owner);
        assert_eq!(result.train_count, 48);
        assert_eq!(result.test_count, 12);
        assert_eq!(result.coefficients.len(), 8);
        let coefficient = |name| {
            result
                .named_coefficients()
                .find(|&(n, _)| n == name)
                .unwrap()
                .1
        };
        assert!((coefficient("area_sq_m") - 350.0).abs() < 1e-6);
        assert!((coefficient("bedroom_count") - 2_000.0).abs() < 1e-6);
        assert!(coefficient("ready_to_move").abs() < 1e-6);
        assert!((result.intercept - 1_000.0).abs() < 1e-3);
        assert!(result.mean_squared_error < 1e-12);
        assert!((result.r_squared - 1.0).abs() < 1e-12);
        assert!(result.train_adjusted_r_squared.is_some());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let listings = (0..40)
            .map(|i| {
                let mut listing = linear_listing(i, PostedBy::Builder);
                listing.price_target += (f64::from(i) * 2.3).sin() * 500.0;
                listing
            })
            .collect();
        let segment = segment(SegmentKind::Builder, listings);
        let config = SplitConfig::default();
        let a = evaluate_segment(&segment, &config).unwrap();
        let b = evaluate_segment(&segment, &config).unwrap();
        assert_eq!(a, b);
        assert!(a.r_squared <= 1.0);
        assert!(a.mean_squared_error >= 0.0);
    }

    #[test]
    fn test_three_dealer_rows_are_insufficient() {
        let listings = (0..3).map(|i| linear_listing(i, PostedBy::Dealer)).collect();
        let segment = segment(SegmentKind::Dealer, listings);
        let err = evaluate_segment(&segment, &SplitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SegmentError::InsufficientData {
                segment: SegmentKind::Dealer,
                train_rows: 2,
                test_rows: 1,
                parameters: 9,
            }
        );
    }

    #[test]
    fn test_zero_test_fraction_is_insufficient() {
        let listings = (0..30).map(|i| linear_listing(i, PostedBy::Owner)).collect();
        let segment = segment(SegmentKind::Owner, listings);
        let split = SplitConfig {
            test_fraction: 0.0,
            ..SplitConfig::default()
        };
        let err = evaluate_segment(&segment, &split).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_collinear_features_are_singular() {
        let listings = (0..30)
            .map(|i| {
                let mut listing = linear_listing(i, PostedBy::Owner);
                listing.ready_to_move = !listing.under_construction;
                listing
            })
            .collect();
        let segment = segment(SegmentKind::Owner, listings);
        let err = evaluate_segment(&segment, &SplitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SegmentError::SingularFeatureMatrix {
                segment: SegmentKind::Owner,
                feature: "ready_to_move",
            }
        );
    }

    #[test]
    fn test_constant_feature_is_singular() {
        let listings = (0..30)
            .map(|i| {
                let mut listing = linear_listing(i, PostedBy::Owner);
                listing.is_resale = true;
                listing
            })
            .collect();
        let segment = segment(SegmentKind::Owner, listings);
        let err = evaluate_segment(&segment, &SplitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            SegmentError::SingularFeatureMatrix {
                segment: SegmentKind::Owner,
                feature: "is_resale",
            }
        );
    }

    #[test]
    fn test_result_serializes_feature_names() {
        let listings = (0..60).map(|i| linear_listing(i, PostedBy::Owner)).collect();
        let segment = segment(SegmentKind::Owner, listings);
        let result = evaluate_segment(&segment, &SplitConfig::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["segment_name"], "Owner");
        assert_eq!(json["feature_names"][3], "area_sq_m");
        assert_eq!(json["test_count"], 12);
    }
}
