// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Pair distances of the training configurations.

use crate::DMatrix;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pair distances of one atom-type pair, one list per configuration.
///
/// Lists may have different lengths. Entries outside the spline interval,
/// including NaN padding, never contribute to the design matrix.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(transparent))]
pub struct DistanceTable {
    configs: Vec<Vec<f64>>,
}

impl DistanceTable {
    /// Table from a padded matrix with one configuration per row
    pub fn from_padded(matrix: &DMatrix) -> Self {
        Self {
            configs: matrix
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
        }
    }

    /// Number of configurations
    pub fn n_configs(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Distances of configuration `k`
    ///
    /// # Panics
    /// Panics if `k` is out of range.
    pub fn config(&self, k: usize) -> &[f64] {
        &self.configs[k]
    }

    /// Iterate over configurations
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.configs.iter().map(Vec::as_slice)
    }

    /// Smallest positive, finite distance among the first `n` configurations
    pub fn min_distance(&self, n: usize) -> Option<f64> {
        self.configs
            .iter()
            .take(n)
            .flatten()
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .reduce(f64::min)
    }
}

impl From<Vec<Vec<f64>>> for DistanceTable {
    fn from(configs: Vec<Vec<f64>>) -> Self {
        Self { configs }
    }
}

impl FromIterator<Vec<f64>> for DistanceTable {
    fn from_iter<I: IntoIterator<Item = Vec<f64>>>(iter: I) -> Self {
        Self {
            configs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged() {
        let table = DistanceTable::from(vec![vec![2.0, 3.0], vec![], vec![1.5]]);
        assert_eq!(table.n_configs(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.config(0), &[2.0, 3.0]);
        assert!(table.config(1).is_empty());
        assert_eq!(table.iter().map(<[f64]>::len).sum::<usize>(), 3);
        assert_eq!(table.min_distance(3), Some(1.5));
        assert_eq!(table.min_distance(2), Some(2.0));
        assert_eq!(table.min_distance(0), None);
    }

    #[test]
    fn test_padded() {
        let matrix = DMatrix::from_row_slice(2, 3, &[2.5, 3.5, f64::NAN, 0.0, 4.0, 1.8]);
        let table = DistanceTable::from_padded(&matrix);
        assert_eq!(table.n_configs(), 2);
        assert_eq!(table.config(0)[..2], [2.5, 3.5]);
        assert!(table.config(0)[2].is_nan());
        assert_eq!(table.min_distance(1), Some(2.5));
        assert_eq!(table.min_distance(2), Some(1.8));
    }

    #[test]
    fn test_collect() {
        let table: DistanceTable = (1..4).map(|i| vec![i as f64; i]).collect();
        assert_eq!(table.n_configs(), 3);
        assert_eq!(table.config(2), &[3.0, 3.0, 3.0]);
        assert!(DistanceTable::default().is_empty());
    }
}
