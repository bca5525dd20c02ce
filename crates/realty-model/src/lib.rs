//! Segmented linear models over listing data
//!
//! Given a filtered [`Dataset`](realty_data::dataset::Dataset), this crate
//! fits one ordinary least-squares model per segment and scores it on a
//! seeded holdout split.
//!
//! # Segments
//!
//! | Segment           | Rows                | Features                      |
//! |-------------------|---------------------|-------------------------------|
//! | `Builder`         | posted by a builder | the 8 listing features        |
//! | `Dealer`          | posted by a dealer  | the 8 listing features        |
//! | `Owner`           | posted by an owner  | the 8 listing features        |
//! | `AllWithCategory` | every listing       | category code, then the 8     |
//!
//! Category codes are `Builder = 0`, `Dealer = 1`, `Owner = 2`.
//!
//! # Failures
//!
//! Each segment fails on its own with a [`SegmentError`]: no rows, too few
//! training rows for the parameter count, or linearly dependent features.
//! [`pipeline::evaluate_segments`] reports those failures in place of the
//! affected segments' results and keeps going.

pub use self::error::SegmentError;

mod error;
pub mod evaluate;
pub mod metrics;
pub mod ols;
pub mod pipeline;
pub mod segment;
pub mod split;
