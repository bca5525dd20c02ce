use serde::Serialize;

/// Pearson correlation matrix over a set of named columns.
///
/// Columns with zero variance have no defined correlation; every entry
/// involving such a column is `NaN` (serialized as `null`), except for the
/// diagonal of non-constant columns which is exactly `1.0`.
///
/// # Examples
///
/// ```
/// use realty_stats::correlation::CorrelationMatrix;
///
/// let names = vec!["x".to_owned(), "y".to_owned()];
/// let columns = vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]];
/// let matrix = CorrelationMatrix::new(names, &columns);
/// assert!((matrix.get(0, 1) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Computes the matrix from column-major data.
    ///
    /// # Panics
    ///
    /// Panics if `names` and `columns` differ in length or if the columns
    /// are not all the same length.
    #[must_use]
    pub fn new(names: Vec<String>, columns: &[Vec<f64>]) -> Self {
        assert_eq!(names.len(), columns.len(), "one name per column");
        assert!(
            columns.windows(2).all(|w| w[0].len() == w[1].len()),
            "columns must have equal length"
        );

        let centered = columns.iter().map(|c| Centered::new(c)).collect::<Vec<_>>();
        let values = centered
            .iter()
            .enumerate()
            .map(|(i, a)| {
                centered
                    .iter()
                    .enumerate()
                    .map(|(j, b)| if i == j { a.self_correlation() } else { a.pearson(b) })
                    .collect()
            })
            .collect();
        Self { names, values }
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row][column]
    }

    /// Correlations of every other column with `target`, sorted in
    /// descending order. `NaN` entries sort last.
    ///
    /// Returns `None` if `target` is not one of the column names.
    #[must_use]
    pub fn ranked_against(&self, target: &str) -> Option<Vec<(String, f64)>> {
        let target_idx = self.names.iter().position(|n| n == target)?;
        let mut ranked = self
            .names
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(i, name)| (name.clone(), self.values[target_idx][i]))
            .collect::<Vec<_>>();
        ranked.sort_by(|(_, a), (_, b)| match (a.is_nan(), b.is_nan()) {
            (false, false) => b.total_cmp(a),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        Some(ranked)
    }
}

struct Centered {
    deviations: Vec<f64>,
    norm: f64,
}

impl Centered {
    #[expect(clippy::cast_precision_loss)]
    fn new(values: &[f64]) -> Self {
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        let deviations = values.iter().map(|v| v - mean).collect::<Vec<_>>();
        let norm = deviations.iter().map(|d| d * d).sum::<f64>().sqrt();
        Self { deviations, norm }
    }

    fn is_constant(&self) -> bool {
        self.norm == 0.0
    }

    fn self_correlation(&self) -> f64 {
        if self.is_constant() { f64::NAN } else { 1.0 }
    }

    fn pearson(&self, other: &Self) -> f64 {
        if self.is_constant() || other.is_constant() {
            return f64::NAN;
        }
        let dot = self
            .deviations
            .iter()
            .zip(&other.deviations)
            .map(|(a, b)| a * b)
            .sum::<f64>();
        (dot / (self.norm * other.norm)).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let m = CorrelationMatrix::new(
            names(&["a", "b"]),
            &[vec![1.0, 2.0, 3.0, 4.0], vec![8.0, 6.0, 4.0, 2.0]],
        );
        assert!((m.get(0, 1) + 1.0).abs() < 1e-12);
        assert!((m.get(1, 0) + 1.0).abs() < 1e-12);
        assert_eq!(m.get(0, 0), 1.0);
    }

    #[test]
    fn test_constant_column_is_nan() {
        let m = CorrelationMatrix::new(
            names(&["a", "c"]),
            &[vec![1.0, 2.0, 3.0], vec![5.0, 5.0, 5.0]],
        );
        assert!(m.get(0, 1).is_nan());
        assert!(m.get(1, 1).is_nan());
    }

    #[test]
    fn test_ranked_against_sorts_descending_with_nan_last() {
        let m = CorrelationMatrix::new(
            names(&["neg", "flat", "pos", "target"]),
            &[
                vec![3.0, 2.0, 1.0],
                vec![1.0, 1.0, 1.0],
                vec![1.0, 2.0, 3.5],
                vec![10.0, 20.0, 30.0],
            ],
        );
        let ranked = m.ranked_against("target").unwrap();
        let order = ranked.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["pos", "neg", "flat"]);
        assert!(m.ranked_against("missing").is_none());
    }

    #[test]
    fn test_serializes_nan_as_null() {
        let m = CorrelationMatrix::new(names(&["c"]), &[vec![2.0, 2.0]]);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"names":["c"],"values":[[null]]}"#);
    }
}
