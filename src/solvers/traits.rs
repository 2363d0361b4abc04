//! Common solver traits and errors.

use thiserror::Error;

use crate::core::{FittedLinearFunction, ResidualVector};

/// Errors returned by the regression solvers.
#[derive(Debug, Error)]
pub enum RegressionError {
    /// x and y (or weights) differ in length.
    #[error("dimension mismatch: x has {x_len} entries, y has {y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },

    /// Fewer observations than the model has parameters.
    #[error("insufficient observations: needed {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// The model specification itself is unusable.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Coverage fraction outside (0, 1].
    #[error("invalid coverage fraction: {0}")]
    InvalidCoverage(f64),

    /// Negative or non-finite observation weights.
    #[error("observation weights must be finite and non-negative")]
    InvalidWeights,

    /// The L1 simplex exceeded its pivot budget.
    #[error("L1 simplex did not converge within {max_pivots} pivots")]
    ConvergenceFailure { max_pivots: usize },

    /// Every random elemental subset was degenerate.
    #[error("no feasible fit: all {starts} elemental subsets were degenerate")]
    NoFeasibleFit { starts: usize },

    /// A numerical failure surfaced at the API boundary.
    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// A configured estimator that can fit a model to (x, y) samples.
pub trait Regressor {
    type Fitted;

    /// Fit the model. The caller's slices are only read; estimators that
    /// reorder points internally work on their own copies.
    fn fit(&self, x: &[f64], y: &[f64]) -> Result<Self::Fitted, RegressionError>;
}

/// Read access common to every fitted model.
pub trait FittedModel {
    /// The fitted function.
    fn function(&self) -> &FittedLinearFunction;

    /// Residuals over the full training sample, in observation order.
    fn residuals(&self) -> &ResidualVector;

    /// Evaluate the fitted function at each point of `xs`.
    fn predict(&self, xs: &[f64]) -> Vec<f64> {
        self.function().predict(xs)
    }
}
