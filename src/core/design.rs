//! Design matrix construction.
//!
//! Deterministic translation of raw observations plus a [`ModelSpec`] into
//! the dense matrices the solvers consume. Matrices are rebuilt per fit and
//! never cached; the caller's slices are only read.

use faer::{Col, Mat};

use crate::core::model::ModelSpec;
use crate::solvers::RegressionError;

/// Check the (x, y) inputs every fit entry point receives.
pub(crate) fn validate_points(
    x: &[f64],
    y: &[f64],
    parameter_count: usize,
) -> Result<(), RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::DimensionMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < parameter_count {
        return Err(RegressionError::InsufficientObservations {
            needed: parameter_count,
            got: x.len(),
        });
    }
    Ok(())
}

/// Build the n×p design matrix `[x_i^{e_1}, ..., x_i^{e_p}]` for `spec`.
pub fn design_matrix(x: &[f64], spec: &ModelSpec) -> Mat<f64> {
    let exponents = spec.exponents();
    Mat::from_fn(x.len(), exponents.len(), |i, j| {
        power_term(x[i], exponents[j])
    })
}

/// Build the observation vector.
pub fn observations(y: &[f64]) -> Col<f64> {
    Col::from_fn(y.len(), |i| y[i])
}

/// Build the weighted design and observations for weighted least squares:
/// each row and observation is pre-multiplied by `sqrt(w_i)`.
pub fn weighted_design(
    x: &[f64],
    y: &[f64],
    weights: &[f64],
    spec: &ModelSpec,
) -> Result<(Mat<f64>, Col<f64>), RegressionError> {
    if weights.len() != x.len() {
        return Err(RegressionError::DimensionMismatch {
            x_len: x.len(),
            y_len: weights.len(),
        });
    }
    if weights.iter().any(|&w| w < 0.0 || !w.is_finite()) {
        return Err(RegressionError::InvalidWeights);
    }
    let exponents = spec.exponents();
    let roots: Vec<f64> = weights.iter().map(|w| w.sqrt()).collect();
    let design = Mat::from_fn(x.len(), exponents.len(), |i, j| {
        roots[i] * power_term(x[i], exponents[j])
    });
    let obs = Col::from_fn(y.len(), |i| roots[i] * y[i]);
    Ok((design, obs))
}

/// Design and observations for gridded image data.
///
/// Cell values become the observation vector (row-major), and each design
/// row holds polynomial terms in the cell's (row, column) indices up to the
/// given per-axis degree, cross terms excluded:
/// `[1, col, col^2, ..., row, row^2, ...]`. Degree 1 is the levelling
/// plane `a + b·col + c·row`.
pub fn grid_design(values: &Mat<f64>, degree: usize) -> Result<(Mat<f64>, Col<f64>), RegressionError> {
    let rows = values.nrows();
    let cols = values.ncols();
    if rows == 0 || cols == 0 {
        return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
    }
    let n = rows * cols;
    let p = 2 * degree + 1;
    if n < p {
        return Err(RegressionError::InsufficientObservations { needed: p, got: n });
    }

    let design = Mat::from_fn(n, p, |i, j| {
        let row = (i / cols) as f64;
        let col = (i % cols) as f64;
        if j == 0 {
            1.0
        } else if j <= degree {
            col.powi(j as i32)
        } else {
            row.powi((j - degree) as i32)
        }
    });
    let obs = Col::from_fn(n, |i| values[(i / cols, i % cols)]);
    Ok((design, obs))
}

/// `x^e`, using the exact integer power when the exponent is integral.
///
/// `powi` keeps negative bases exact for integer exponents, where `powf`
/// would return NaN.
pub(crate) fn power_term(x: f64, exponent: f64) -> f64 {
    if exponent == 0.0 {
        1.0
    } else if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        x.powi(exponent as i32)
    } else {
        x.powf(exponent)
    }
}
