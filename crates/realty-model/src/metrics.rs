//! Fit statistics

/// Mean of squared residuals. `NaN` for empty input.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    let sum = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>();
    sum / actual.len() as f64
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// At most 1.0 and unbounded below. When the actual values have zero
/// variance the ratio is undefined; the result is then 1.0 if every
/// prediction is exact and 0.0 otherwise.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot = actual.iter().map(|a| (a - mean).powi(2)).sum::<f64>();
    let ss_res = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// `1 - (1 - R²)(n - 1) / (n - p - 1)` for `n` rows and `p` features.
///
/// `None` when `n - p - 1` is not positive.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn adjusted_r_squared(r_squared: f64, rows: usize, features: usize) -> Option<f64> {
    let dof = rows.checked_sub(features + 1).filter(|&d| d > 0)?;
    Some(1.0 - (1.0 - r_squared) * (rows - 1) as f64 / dof as f64)
}
