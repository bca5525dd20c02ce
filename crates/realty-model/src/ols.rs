//! Ordinary least squares
//!
//! Fits `y ≈ intercept + Σ coefficient_i · x_i` by minimizing the sum of
//! squared residuals, without regularization. The design matrix `[1 | X]`
//! is factored with nalgebra's Householder QR (`X = QR`), and the
//! coefficients are recovered from `R β = Qᵀ y` by back substitution.
//!
//! # Rank detection
//!
//! The factorization is not pivoted, so `|R[k, k]|` is the distance of
//! design column `k` from the span of columns `0..k`. If that distance is
//! below [`SINGULARITY_TOLERANCE`] times the column's own norm, the column
//! is a linear combination of the preceding ones and no unique solution
//! exists. The fit then fails and names the column instead of returning
//! arbitrary coefficients.

use nalgebra::{DMatrix, DVector};

/// Relative tolerance for detecting linearly dependent columns.
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum OlsError {
    #[display("{rows} rows cannot determine {parameters} parameters")]
    Underdetermined { rows: usize, parameters: usize },
    /// `column` indexes the design matrix: `0` is the intercept, `i + 1`
    /// is feature `i`.
    #[display("design matrix column {column} is linearly dependent on preceding columns")]
    Singular { column: usize },
}

/// A fitted linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: DVector<f64>,
}

impl LinearModel {
    /// Fits a model to `features`, one row per observation, and their
    /// `targets`.
    ///
    /// # Panics
    ///
    /// Panics if `features` and `targets` differ in row count.
    pub fn fit(features: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Self, OlsError> {
        assert_eq!(features.nrows(), targets.len(), "one target per row");
        let rows = features.nrows();
        let parameters = features.ncols() + 1;
        if rows < parameters {
            return Err(OlsError::Underdetermined { rows, parameters });
        }

        let design = features.clone().insert_column(0, 1.0);
        let column_norms = design
            .column_iter()
            .map(|column| column.norm())
            .collect::<Vec<_>>();
        let qr = design.qr();
        let r = qr.r();
        let singular = (0..parameters).find(|&k| {
            let remaining = r[(k, k)].abs();
            remaining <= SINGULARITY_TOLERANCE * column_norms[k] || remaining == 0.0
        });
        if let Some(column) = singular {
            return Err(OlsError::Singular { column });
        }

        let qty = qr.q().tr_mul(targets);
        // Every diagonal entry of `r` is non-zero past the rank check.
        let beta = r
            .solve_upper_triangular(&qty)
            .ok_or(OlsError::Singular {
                column: parameters - 1,
            })?;

        Ok(Self {
            intercept: beta[0],
            coefficients: beta.remove_row(0),
        })
    }

    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.coefficients.len());
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    /// Predicts one target per row of `features`.
    #[must_use]
    pub fn predict_all(&self, features: &DMatrix<f64>) -> DVector<f64> {
        (features * &self.coefficients).add_scalar(self.intercept)
    }
}
