//! Listing data preparation
//!
//! This crate turns a raw real-estate listings table into a clean,
//! typed [`Dataset`](dataset::Dataset) ready for modelling.
//!
//! # Pipeline
//!
//! ```text
//! CSV file
//!     ↓ read (raw::RawTable)
//! Raw rows
//!     ↓ normalize (normalize::Schema)
//! Listing
//!     ↓ derive (derive::DerivedListing, derive::ConversionRates)
//! Dataset
//!     ↓ filter (outlier::OutlierFilter)
//! Filtered Dataset
//! ```
//!
//! Each stage consumes the previous stage's output and produces a new
//! value. Normalization is the only stage that can fail; a failure on any
//! row aborts the whole load.
//!
//! Alongside the pipeline:
//!
//! - [`quality`]: empty fields, duplicate rows and constant columns in the raw table
//! - [`summary`]: correlation matrix, category shares and distributions for reporting
//!
//! # Example
//!
//! ```
//! use realty_data::{dataset::Dataset, derive::ConversionRates, outlier::OutlierFilter};
//!
//! let csv = "\
//! POSTED_BY,UNDER_CONSTRUCTION,RERA,BHK_NO.,BHK_OR_RK,SQUARE_FT,READY_TO_MOVE,RESALE,LONGITUDE,LATITUDE,TARGET(PRICE_IN_LACS)
//! Owner,0,1,2,BHK,1300.236,1,1,12.9,77.6,55
//! Dealer,0,0,3,BHK,1500,1,1,12.3,76.6,70
//! ";
//! let dataset = Dataset::from_reader(csv.as_bytes(), &ConversionRates::default())?;
//! let outcome = OutlierFilter::default().apply(&dataset);
//! assert_eq!(outcome.report.original_count, 2);
//! # Ok::<(), realty_data::dataset::LoadError>(())
//! ```

pub mod dataset;
pub mod derive;
pub mod listing;
pub mod normalize;
pub mod outlier;
pub mod quality;
pub mod raw;
pub mod summary;
