use serde::Serialize;

/// Precomputed percentile values for a dataset.
///
/// This structure stores percentile-value pairs for efficient lookup
/// of commonly used percentile points. Values are estimated with linear
/// interpolation between the closest ranks (see [`compute_percentile`]).
///
/// # Examples
///
/// ```
/// use realty_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(5.5));
/// assert_eq!(percentiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Percentiles {
    /// Percentile-value pairs, sorted by percentile.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// This method will sort the values internally before computing percentiles.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    ///
    /// # Examples
    ///
    /// ```
    /// use realty_stats::percentiles::Percentiles;
    ///
    /// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    /// let percentiles = Percentiles::new(&values, &[50.0, 95.0]);
    ///
    /// assert_eq!(percentiles.get(50.0), Some(3.0));
    /// assert_eq!(percentiles.get(25.0), None); // Not precomputed
    /// ```
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// First and third quartiles of a dataset, with the interquartile range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    /// Computes quartiles from unsorted values.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use realty_stats::percentiles::Quartiles;
    ///
    /// let q = Quartiles::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
    /// assert_eq!(q.q1, 2.0);
    /// assert_eq!(q.q3, 4.0);
    /// assert_eq!(q.iqr(), 2.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        if sorted_values.is_empty() {
            return None;
        }
        Some(Self {
            q1: compute_quantile(sorted_values, 0.25),
            q3: compute_quantile(sorted_values, 0.75),
        })
    }

    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Computes a single percentile value from sorted data.
///
/// `percentile` is expressed on the 0-100 scale; see [`compute_quantile`].
///
/// # Examples
///
/// ```
/// use realty_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// ```
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    compute_quantile(sorted_values, percentile / 100.0)
}

/// Computes a quantile from sorted data using linear interpolation.
///
/// For `n` values the quantile `q` (0.0 to 1.0) sits at the fractional
/// position `(n - 1) * q`; the result interpolates linearly between the
/// two closest ranks. Out-of-range `q` is clamped.
///
/// Returns `f64::NAN` if the input is empty.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_quantile(sorted_values: &[f64], quantile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = last as f64 * quantile.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let (lo, hi) = (sorted_values[lower], sorted_values[upper.min(last)]);
    lo + (hi - lo) * fraction
}
