//! Statistical utilities for the realty listing analysis.
//!
//! This crate provides the numeric building blocks shared by the data
//! preparation and modelling crates:
//!
//! - **Percentiles**: Quantiles with linear interpolation between closest ranks,
//!   and the quartiles used for IQR outlier bounds
//! - **Descriptive statistics**: mean, median, variance, standard deviation, etc.
//! - **Histogram generation**: Frequency distributions with P5–P95 main bins
//! - **Correlation**: Pearson correlation matrices over named columns
//!
//! # Modules
//!
//! - [`percentiles`]: Percentile and quartile computation
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`histogram`]: Histogram construction for visualizing distributions
//! - [`correlation`]: Pairwise Pearson correlation
//!
//! # Examples
//!
//! ## Computing interquartile bounds
//!
//! ```
//! use realty_stats::percentiles::Quartiles;
//!
//! let values = [10.0, 20.0, 30.0, 40.0, 50.0];
//! let quartiles = Quartiles::new(values).unwrap();
//! let lower = quartiles.q1 - 1.5 * quartiles.iqr();
//! let upper = quartiles.q3 + 1.5 * quartiles.iqr();
//! assert_eq!((lower, upper), (-10.0, 70.0));
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use realty_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
