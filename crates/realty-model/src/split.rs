//! Seeded train/test holdout split

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of rows held out for testing, in `[0, 1]`.
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

impl SplitConfig {
    /// Number of test rows for `len` rows: `ceil(len * test_fraction)`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn test_len(&self, len: usize) -> usize {
        let fraction = self.test_fraction.clamp(0.0, 1.0);
        let test = (len as f64 * fraction).ceil() as usize;
        test.min(len)
    }

    /// Shuffles the row indices `0..len` and splits them.
    ///
    /// The first [`test_len`](Self::test_len) shuffled indices form the test
    /// split and the rest the train split. The same seed and length always
    /// give the same split.
    #[must_use]
    pub fn split(&self, len: usize) -> Split {
        let mut indices = (0..len).collect::<Vec<_>>();
        let mut rng = Pcg32::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        let train = indices.split_off(self.test_len(len));
        Split {
            train,
            test: indices,
        }
    }
}

/// Row indices of a holdout split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let config = SplitConfig::default();
        for (len, test) in [(0, 0), (1, 1), (3, 1), (5, 1), (6, 2), (10, 2), (11, 3), (100, 20)] {
            let split = config.split(len);
            assert_eq!(split.test.len(), test, "len = {len}");
            assert_eq!(split.train.len(), len - test, "len = {len}");
        }
    }

    #[test]
    fn test_split_is_a_partition() {
        let split = SplitConfig::default().split(37);
        let mut all = split.train.iter().chain(&split.test).copied().collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let config = SplitConfig {
            test_fraction: 0.3,
            seed: 7,
        };
        assert_eq!(config.split(50), config.split(50));
    }

    #[test]
    fn test_different_seeds_shuffle_differently() {
        let a = SplitConfig { seed: 1, ..SplitConfig::default() }.split(50);
        let b = SplitConfig { seed: 2, ..SplitConfig::default() }.split(50);
        assert_ne!(a, b);
    }

    #[test]
    fn test_out_of_range_fraction_is_clamped() {
        let none = SplitConfig { test_fraction: -0.5, seed: 0 };
        assert_eq!(none.test_len(10), 0);
        let all = SplitConfig { test_fraction: 1.5, seed: 0 };
        assert_eq!(all.test_len(10), 10);
    }
}
