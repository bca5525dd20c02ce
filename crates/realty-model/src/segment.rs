//! Segment selection
//!
//! A segment is a named subset of the filtered dataset together with the
//! feature table and target vector a model is fitted on. Three segments
//! hold one listing source each; [`SegmentKind::AllWithCategory`] pools
//! every listing and adds the encoded source category as a leading feature.

use nalgebra::{DMatrix, DVector};
use realty_data::{
    dataset::Dataset,
    derive::{DerivedListing, NumericField},
    listing::PostedBy,
};
use serde::{Deserialize, Serialize};

use crate::SegmentError;

/// Name of the category feature in [`SegmentKind::AllWithCategory`].
pub const CATEGORY_FEATURE: &str = "posted_by";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum SegmentKind {
    Builder,
    Dealer,
    Owner,
    AllWithCategory,
}

impl SegmentKind {
    pub const LEN: usize = 4;
    /// Segments in evaluation and reporting order.
    pub const ALL: [Self; Self::LEN] = [
        Self::Builder,
        Self::Dealer,
        Self::Owner,
        Self::AllWithCategory,
    ];

    /// The listing source this segment is restricted to, if any.
    #[must_use]
    pub const fn category(self) -> Option<PostedBy> {
        match self {
            Self::Builder => Some(PostedBy::Builder),
            Self::Dealer => Some(PostedBy::Dealer),
            Self::Owner => Some(PostedBy::Owner),
            Self::AllWithCategory => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Builder => "Builder",
            Self::Dealer => "Dealer",
            Self::Owner => "Owner",
            Self::AllWithCategory => "AllWithCategory",
        }
    }

    /// Feature names in model column order.
    #[must_use]
    pub fn feature_names(self) -> Vec<&'static str> {
        let base = NumericField::FEATURES.iter().map(|f| f.name());
        match self {
            Self::AllWithCategory => std::iter::once(CATEGORY_FEATURE).chain(base).collect(),
            _ => base.collect(),
        }
    }

    fn push_feature_row(self, listing: &DerivedListing, table: &mut Vec<f64>) {
        if self == Self::AllWithCategory {
            table.push(f64::from(listing.posted_by.code()));
        }
        table.extend(NumericField::FEATURES.iter().map(|&f| listing.value(f)));
    }
}

/// Feature table and targets of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    kind: SegmentKind,
    feature_names: Vec<&'static str>,
    /// One row per listing, one column per feature name.
    features: DMatrix<f64>,
    targets: DVector<f64>,
}

impl Segment {
    /// Selects the rows of `kind` from `dataset`, keeping dataset order.
    ///
    /// Fails with [`SegmentError::EmptySegment`] when no row belongs to the
    /// segment.
    pub fn select(kind: SegmentKind, dataset: &Dataset) -> Result<Self, SegmentError> {
        let feature_names = kind.feature_names();
        let mut table = vec![];
        let mut targets = vec![];
        for listing in dataset
            .iter()
            .filter(|listing| kind.category().is_none_or(|c| listing.posted_by == c))
        {
            kind.push_feature_row(listing, &mut table);
            targets.push(listing.price_target);
        }
        if targets.is_empty() {
            return Err(SegmentError::EmptySegment { segment: kind });
        }
        log::debug!("segment {kind}: {} rows", targets.len());
        Ok(Self {
            kind,
            features: DMatrix::from_row_slice(targets.len(), feature_names.len(), &table),
            feature_names,
            targets: DVector::from_vec(targets),
        })
    }

    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    #[must_use]
    pub fn feature_names(&self) -> &[&'static str] {
        &self.feature_names
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    #[must_use]
    pub fn features(&self) -> &DMatrix<f64> {
        &self.features
    }

    #[must_use]
    pub fn targets(&self) -> &DVector<f64> {
        &self.targets
    }

    /// Feature rows and targets at `indices`, in index order.
    #[must_use]
    pub fn rows(&self, indices: &[usize]) -> (DMatrix<f64>, DVector<f64>) {
        (
            self.features.select_rows(indices),
            self.targets.select_rows(indices),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Selects every segment, in [`SegmentKind::ALL`] order.
#[must_use]
pub fn select_segments(dataset: &Dataset) -> [Result<Segment, SegmentError>; SegmentKind::LEN] {
    SegmentKind::ALL.map(|kind| Segment::select(kind, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(posted_by: PostedBy, price_target: f64) -> DerivedListing {
        DerivedListing {
            posted_by,
            under_construction: false,
            has_regulatory_approval: true,
            bedroom_count: 3,
            area_sq_m: 90.0,
            ready_to_move: true,
            is_resale: false,
            longitude: 19.1,
            latitude: 72.8,
            price_target,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            listing(PostedBy::Owner, 1.0),
            listing(PostedBy::Dealer, 2.0),
            listing(PostedBy::Owner, 3.0),
            listing(PostedBy::Builder, 4.0),
            listing(PostedBy::Dealer, 5.0),
        ])
    }

    #[test]
    fn test_category_segments_partition_dataset() {
        let dataset = dataset();
        let targets = [SegmentKind::Builder, SegmentKind::Dealer, SegmentKind::Owner]
            .map(|kind| {
                let segment = Segment::select(kind, &dataset).unwrap();
                segment.targets().iter().copied().collect::<Vec<_>>()
            });
        assert_eq!(targets, [vec![4.0], vec![2.0, 5.0], vec![1.0, 3.0]]);

        let mut all = targets.concat();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, dataset.targets());
    }

    #[test]
    fn test_category_segment_features() {
        let segment = Segment::select(SegmentKind::Dealer, &dataset()).unwrap();
        assert_eq!(segment.feature_count(), 8);
        assert_eq!(segment.feature_names()[0], "under_construction");
        assert_eq!(segment.feature_names()[7], "latitude");
        assert_eq!(segment.features().shape(), (2, 8));
        assert_eq!(
            segment.features().row(0).iter().copied().collect::<Vec<_>>(),
            [0.0, 1.0, 3.0, 90.0, 1.0, 0.0, 19.1, 72.8]
        );
    }

    #[test]
    fn test_pooled_segment_prepends_category_code() {
        let segment = Segment::select(SegmentKind::AllWithCategory, &dataset()).unwrap();
        assert_eq!(segment.len(), 5);
        assert_eq!(segment.feature_count(), 9);
        assert_eq!(segment.feature_names()[0], CATEGORY_FEATURE);
        let codes = segment.features().column(0).iter().copied().collect::<Vec<_>>();
        assert_eq!(codes, [2.0, 1.0, 2.0, 0.0, 1.0]);
        assert_eq!(segment.targets().as_slice(), [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_rows_keep_features_with_targets() {
        let segment = Segment::select(SegmentKind::AllWithCategory, &dataset()).unwrap();
        let (features, targets) = segment.rows(&[3, 0]);
        assert_eq!(features.shape(), (2, 9));
        assert_eq!(features.column(0).iter().copied().collect::<Vec<_>>(), [0.0, 2.0]);
        assert_eq!(targets.as_slice(), [4.0, 1.0]);
    }

    #[test]
    fn test_empty_category_segment() {
        let dataset = Dataset::new(vec![listing(PostedBy::Owner, 1.0)]);
        let segments = select_segments(&dataset);
        assert_eq!(
            segments[0],
            Err(SegmentError::EmptySegment {
                segment: SegmentKind::Builder
            })
        );
        assert!(segments[1].as_ref().unwrap_err().is_empty_segment());
        assert_eq!(segments[2].as_ref().unwrap().len(), 1);
        assert_eq!(segments[3].as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_dataset_has_no_segments() {
        let segments = select_segments(&Dataset::default());
        assert!(segments.iter().all(Result::is_err));
    }
}
