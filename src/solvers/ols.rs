//! Ordinary (and weighted) Least Squares.
//!
//! Solves the normal equations `DᵀD β = Dᵀy` with a Householder QR
//! factorization of the p×p normal matrix. For polynomial models the normal
//! matrix is accumulated directly from power sums of x, which skips
//! materializing the n×p design matrix entirely; the generic
//! power-combination path builds it. Both paths produce identical results.
//!
//! Deterministic: repeated fits on the same data give bit-identical output.

use faer::{Col, Mat};

use crate::core::{
    design_matrix, observations, validate_points, weighted_design, FittedLinearFunction,
    ModelSpec, ResidualVector,
};
use crate::solvers::linalg::qr_solve;
use crate::solvers::traits::{FittedModel, Regressor, RegressionError};

/// Least-squares estimator for a [`ModelSpec`].
///
/// # Example
///
/// ```rust,ignore
/// use anofox_robust::prelude::*;
///
/// let fitted = OlsRegressor::builder()
///     .model(ModelSpec::line())
///     .build()
///     .fit(&x, &y)?;
/// println!("slope = {}", fitted.function().coefficients()[1]);
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    model: ModelSpec,
    weights: Option<Vec<f64>>,
}

impl OlsRegressor {
    /// Least-squares fit of `model`.
    pub fn new(model: ModelSpec) -> Self {
        OlsRegressor {
            model,
            weights: None,
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Normal matrix and moment vector for a polynomial spec, accumulated
    /// from power sums without building the design matrix.
    fn polynomial_normal_equations(
        exponents: &[f64],
        x: &[f64],
        y: &[f64],
    ) -> (Mat<f64>, Col<f64>) {
        let p = exponents.len();
        // DᵀD entries are Σ x^(e_i + e_j); with integer exponents these are
        // plain power sums of x.
        let min_e = exponents[0] as usize;
        let max_e = exponents[p - 1] as usize;
        let mut power_sums = vec![0.0; 2 * max_e + 1];
        let mut moment_sums = vec![0.0; max_e + 1];
        for (&xi, &yi) in x.iter().zip(y) {
            // Powers min_e..=2*max_e cover every DᵀD entry, and the
            // prefix up to max_e paired with y covers Dᵀy.
            let mut current = if min_e == 0 { 1.0 } else { xi.powi(min_e as i32) };
            for e in min_e..=(2 * max_e) {
                power_sums[e] += current;
                if e <= max_e {
                    moment_sums[e] += current * yi;
                }
                current *= xi;
            }
        }

        let a = Mat::from_fn(p, p, |i, j| {
            power_sums[(exponents[i] + exponents[j]) as usize]
        });
        let b = Col::from_fn(p, |i| moment_sums[exponents[i] as usize]);
        (a, b)
    }

    /// Normal matrix and moment vector from an explicit design matrix.
    fn generic_normal_equations(design: &Mat<f64>, obs: &Col<f64>) -> (Mat<f64>, Col<f64>) {
        let n = design.nrows();
        let p = design.ncols();
        let mut a = Mat::zeros(p, p);
        for i in 0..p {
            for j in i..p {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += design[(k, i)] * design[(k, j)];
                }
                a[(i, j)] = sum;
                a[(j, i)] = sum;
            }
        }
        let b = Col::from_fn(p, |j| {
            let mut sum = 0.0;
            for k in 0..n {
                sum += design[(k, j)] * obs[k];
            }
            sum
        });
        (a, b)
    }

    fn solve(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, RegressionError> {
        let exponents = self.model.exponents();
        let beta = match (&self.model, &self.weights) {
            (ModelSpec::Polynomial { .. }, None) => {
                let (a, b) = Self::polynomial_normal_equations(&exponents, x, y);
                qr_solve(&a, &b)?
            }
            (_, None) => {
                let design = design_matrix(x, &self.model);
                let obs = observations(y);
                let (a, b) = Self::generic_normal_equations(&design, &obs);
                qr_solve(&a, &b)?
            }
            (_, Some(w)) => {
                let (design, obs) = weighted_design(x, y, w, &self.model)?;
                let (a, b) = Self::generic_normal_equations(&design, &obs);
                qr_solve(&a, &b)?
            }
        };
        Ok((0..beta.nrows()).map(|i| beta[i]).collect())
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &[f64], y: &[f64]) -> Result<FittedOls, RegressionError> {
        self.model.validate()?;
        validate_points(x, y, self.model.parameter_count())?;

        let coefficients = self.solve(x, y)?;
        let function = FittedLinearFunction::new(&self.model, coefficients);
        let residuals = ResidualVector::new(
            x.iter()
                .zip(y)
                .map(|(&xi, &yi)| function.residual(xi, yi))
                .collect(),
        );
        Ok(FittedOls {
            function,
            residuals,
        })
    }
}

/// A fitted least-squares model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    function: FittedLinearFunction,
    residuals: ResidualVector,
}

impl FittedOls {
    /// Residual sum of squares, the minimized criterion.
    pub fn objective(&self) -> f64 {
        self.residuals.sum_of_squares()
    }
}

impl FittedModel for FittedOls {
    fn function(&self) -> &FittedLinearFunction {
        &self.function
    }

    fn residuals(&self) -> &ResidualVector {
        &self.residuals
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone)]
pub struct OlsRegressorBuilder {
    model: ModelSpec,
    weights: Option<Vec<f64>>,
}

impl Default for OlsRegressorBuilder {
    fn default() -> Self {
        OlsRegressorBuilder {
            model: ModelSpec::line(),
            weights: None,
        }
    }
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options (straight-line model).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to fit.
    pub fn model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Set observation weights for weighted least squares.
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Build the regressor.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor {
            model: self.model,
            weights: self.weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line_recovery() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 2.0 + 3.0 * xi).collect();

        let fitted = OlsRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        let c = fitted.function().coefficients();
        assert!((c[0] - 2.0).abs() < 1e-9);
        assert!((c[1] - 3.0).abs() < 1e-9);
        assert!(fitted.objective() < 1e-14);
    }

    #[test]
    fn test_polynomial_and_generic_paths_agree() {
        let x: Vec<f64> = (0..30).map(|i| 0.3 * i as f64 - 4.0).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| 1.0 - 0.5 * xi + 0.25 * xi * xi + (xi * 3.1).sin())
            .collect();

        let via_poly = OlsRegressor::new(ModelSpec::polynomial(2, true))
            .fit(&x, &y)
            .unwrap();
        let via_powers = OlsRegressor::new(ModelSpec::power_combination(vec![0.0, 1.0, 2.0]))
            .fit(&x, &y)
            .unwrap();

        let a = via_poly.function().coefficients();
        let b = via_powers.function().coefficients();
        for j in 0..3 {
            assert!((a[j] - b[j]).abs() < 1e-8, "coefficient {j}: {} vs {}", a[j], b[j]);
        }
    }

    #[test]
    fn test_residual_orthogonality() {
        let x: Vec<f64> = (0..25).map(|i| i as f64 * 0.4).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 5.0 - xi + (xi * 1.3).cos()).collect();

        let spec = ModelSpec::polynomial(2, true);
        let fitted = OlsRegressor::new(spec.clone()).fit(&x, &y).unwrap();
        let design = design_matrix(&x, &spec);
        let residuals = fitted.residuals().as_slice();

        for j in 0..design.ncols() {
            let dot: f64 = (0..x.len()).map(|i| design[(i, j)] * residuals[i]).sum();
            assert!(dot.abs() < 1e-7, "column {j} not orthogonal: {dot}");
        }
    }

    #[test]
    fn test_weighted_fit_prefers_heavy_points() {
        // Two populations; the heavily weighted one should dominate.
        let x = [0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let w = [100.0, 100.0, 100.0, 0.01, 0.01, 0.01];

        let fitted = OlsRegressor::builder()
            .model(ModelSpec::line())
            .weights(w.to_vec())
            .build()
            .fit(&x, &y)
            .unwrap();
        assert!(fitted.function().coefficients()[0] < 0.1);
    }

    #[test]
    fn test_determinism() {
        let x: Vec<f64> = (0..40).map(|i| (i as f64 * 0.77).sin() * 3.0).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 0.3 * xi - 1.0 + xi * xi * 0.1).collect();

        let model = OlsRegressor::new(ModelSpec::polynomial(2, true));
        let a = model.fit(&x, &y).unwrap();
        let b = model.fit(&x, &y).unwrap();
        assert_eq!(a.function().coefficients(), b.function().coefficients());
        assert_eq!(a.residuals().as_slice(), b.residuals().as_slice());
    }

    #[test]
    fn test_rank_deficient_design_is_reported() {
        // Four points on two distinct x values cannot identify a quadratic.
        let x = [1.0, 1.0, 2.0, 2.0];
        let y = [1.0, 1.1, 2.0, 2.1];
        let result = OlsRegressor::new(ModelSpec::polynomial(2, true)).fit(&x, &y);
        assert!(result.is_err());
    }

    #[test]
    fn test_too_few_points() {
        let result = OlsRegressor::new(ModelSpec::polynomial(2, true)).fit(&[1.0], &[1.0]);
        assert!(matches!(
            result,
            Err(RegressionError::InsufficientObservations { .. })
        ));
    }
}
