use crate::segment::SegmentKind;

/// Failure of one segment's evaluation.
///
/// A segment error never affects other segments; it is reported next to
/// their results.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum SegmentError {
    #[display("segment {segment}: no listings remain after filtering")]
    EmptySegment { segment: SegmentKind },
    #[display(
        "segment {segment}: {train_rows} training rows and {test_rows} test rows cannot fit {parameters} parameters"
    )]
    InsufficientData {
        segment: SegmentKind,
        train_rows: usize,
        test_rows: usize,
        /// Feature count plus the intercept.
        parameters: usize,
    },
    #[display("segment {segment}: feature `{feature}` is linearly dependent on the preceding features")]
    SingularFeatureMatrix {
        segment: SegmentKind,
        feature: &'static str,
    },
}

impl SegmentError {
    #[must_use]
    pub fn segment(&self) -> SegmentKind {
        match self {
            Self::EmptySegment { segment }
            | Self::InsufficientData { segment, .. }
            | Self::SingularFeatureMatrix { segment, .. } => *segment,
        }
    }

    /// Short machine-readable name of the failure.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptySegment { .. } => "empty_segment",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::SingularFeatureMatrix { .. } => "singular_feature_matrix",
        }
    }
}
