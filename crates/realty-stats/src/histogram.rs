use std::ops::Range;

use serde::Serialize;

use crate::percentiles;

/// A histogram representing the frequency distribution of values.
///
/// The main bins cover the P5–P95 range of the data so that a handful of
/// extreme values cannot flatten the shape of the distribution. Values
/// outside that range are counted in dedicated underflow/overflow bins.
/// The overflow bin also holds the maximum itself, so its range is closed.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    pub range: Range<f64>,
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// use realty_stats::histogram::Histogram;
    ///
    /// let values = (1..=100).map(f64::from);
    /// let histogram = Histogram::new(values, 10);
    /// let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
    /// assert_eq!(total, 100);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// Returns an empty histogram when there are no values or `num_bins` is zero.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_bins: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&hard_min), Some(&hard_max)) = (sorted_values.first(), sorted_values.last())
        else {
            return Self { bins: vec![] };
        };
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        let soft_min = percentiles::compute_percentile(sorted_values, 5.0);
        let soft_max = percentiles::compute_percentile(sorted_values, 95.0);
        let mut width = (soft_max - soft_min) / num_bins as f64;
        if width <= f64::EPSILON * soft_max.abs().max(1.0) {
            // Distribution concentrated at a single value
            width = 1.0;
        }
        let main_start = soft_min;
        let main_end = soft_min + width * num_bins as f64;

        // Bin existence and bin membership are both decided by this position.
        let position = |val: f64| (val - main_start) / width;
        let has_underflow = position(hard_min) < 0.0;
        let has_overflow = position(hard_max) >= num_bins as f64;

        let mut bins = vec![];
        if has_underflow {
            bins.push(HistogramBin {
                range: hard_min..main_start,
                count: 0,
            });
        }
        for bin_idx in 0..num_bins {
            let start = main_start + bin_idx as f64 * width;
            let end = main_start + (bin_idx + 1) as f64 * width;
            bins.push(HistogramBin {
                range: start..end,
                count: 0,
            });
        }
        if has_overflow {
            bins.push(HistogramBin {
                range: main_end.min(hard_max)..hard_max,
                count: 0,
            });
        }

        let offset = usize::from(has_underflow);
        for &val in sorted_values {
            let position = position(val);
            let idx = if position < 0.0 {
                0
            } else if position >= num_bins as f64 {
                num_bins + offset
            } else {
                (position.floor() as usize).min(num_bins - 1) + offset
            };
            bins[idx].count += 1;
        }

        Self { bins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Histogram::new(Vec::<f64>::new(), 5).bins.is_empty());
        assert!(Histogram::new([1.0, 2.0], 0).bins.is_empty());
    }

    #[test]
    fn test_counts_cover_all_values() {
        let mut values: Vec<f64> = (0..50).map(f64::from).collect();
        values.push(10_000.0);
        let histogram = Histogram::new(values, 8);
        let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 51);
        let last = histogram.bins.last().unwrap();
        assert_eq!(last.range.end, 10_000.0);
        assert_eq!(last.count, 3);
    }

    #[test]
    fn test_maximum_rounding_below_main_end() {
        // 95th percentile equals the maximum, but `soft_min + width * bins`
        // rounds above it while `(max - soft_min) / width` rounds to `bins`.
        let values = [
            117_919.585_752,
            379_615.8,
            449_491.615_3,
            449_491.615_3,
            449_491.615_3,
            449_491.615_3,
        ];
        let histogram = Histogram::new(values, 20);
        let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 6);
        assert!(histogram.bins.iter().all(|b| b.range.start <= b.range.end));
    }

    #[test]
    fn test_single_value() {
        let histogram = Histogram::new([4.0; 3], 4);
        let total: u64 = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
        assert_eq!(histogram.bins[0].count, 3);
    }
}
