//! Sparse feature vectors

use serde::{Deserialize, Serialize};

/// A fixed-dimension sparse vector with indices kept in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// The all-zero vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from `(index, value)` pairs; sorts them and drops zeros.
    ///
    /// Indices must be unique and below `dim`.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, v)| v != 0.0);
        entries.sort_unstable_by_key(|&(i, _)| i);
        debug_assert!(entries.iter().all(|&(i, _)| i < dim));
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { dim, entries }
    }

    /// Dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over non-zero entries in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Value at `index` (zero when not stored)
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense vector of the same dimension
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, v)| v * dense[i]).sum()
    }

    /// Squared L2 norm
    pub fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }

    /// Squared euclidean distance to a dense point whose squared norm is known
    pub fn squared_distance(&self, dense: &[f64], dense_squared_norm: f64) -> f64 {
        // ||x - c||^2 = ||x||^2 - 2 x.c + ||c||^2, clamped against rounding
        (self.squared_norm() - 2.0 * self.dot(dense) + dense_squared_norm).max(0.0)
    }

    /// Scale every entry in place
    pub fn scale(&mut self, factor: f64) {
        for (_, v) in &mut self.entries {
            *v *= factor;
        }
    }

    /// Add `factor * self` into a dense accumulator
    pub fn add_scaled_to(&self, dense: &mut [f64], factor: f64) {
        for &(i, v) in &self.entries {
            dense[i] += factor * v;
        }
    }

    /// Dense copy
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entries_sorts_and_drops_zeros() {
        let v = SparseVector::from_entries(5, vec![(3, 2.0), (1, 0.0), (0, 1.0)]);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 1.0), (3, 2.0)]);
        assert_eq!(v.get(3), 2.0);
        assert_eq!(v.get(1), 0.0);
    }

    #[test]
    fn test_dot_and_distance() {
        let v = SparseVector::from_entries(3, vec![(0, 1.0), (2, 2.0)]);
        let c = vec![1.0, 1.0, 1.0];
        assert_eq!(v.dot(&c), 3.0);
        // (1-1)^2 + (0-1)^2 + (2-1)^2
        assert!((v.squared_distance(&c, 3.0) - 2.0).abs() < 1e-12);
        assert_eq!(v.to_dense(), vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_zero_vector() {
        let v = SparseVector::zeros(4);
        assert!(v.is_zero());
        assert_eq!(v.dim(), 4);
        assert_eq!(v.squared_norm(), 0.0);
    }
}
