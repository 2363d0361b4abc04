//! Residual vectors.

use crate::stats::selection::select_nth;

/// An immutable vector of signed fit residuals `y_i - f(x_i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualVector {
    values: Vec<f64>,
}

impl ResidualVector {
    pub fn new(values: Vec<f64>) -> Self {
        ResidualVector { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The signed residuals in observation order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Σ r_i², the L2 criterion.
    pub fn sum_of_squares(&self) -> f64 {
        self.values.iter().map(|r| r * r).sum()
    }

    /// Σ |r_i|, the L1 criterion.
    pub fn sum_of_absolute_values(&self) -> f64 {
        self.values.iter().map(|r| r.abs()).sum()
    }

    /// max |r_i|; 0 for an empty vector.
    pub fn infinity_norm(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, r| acc.max(r.abs()))
    }

    /// The k-th smallest absolute residual (0-indexed), computed by
    /// selection over an internal copy.
    ///
    /// # Panics
    ///
    /// Panics if `k` is out of `[0, len)`.
    pub fn kth_smallest_absolute(&self, k: usize) -> f64 {
        let mut abs: Vec<f64> = self.values.iter().map(|r| r.abs()).collect();
        select_nth(&mut abs, k)
    }
}
