//! Fitted model functions.

use crate::core::design::power_term;
use crate::core::model::ModelSpec;

/// An immutable fitted linear-in-parameters function
/// `f(x) = Σ c_j · x^{e_j}`.
///
/// Produced by every solver in this crate; holds the parameter vector
/// together with the exponent metadata needed to evaluate, differentiate
/// and compute residuals.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLinearFunction {
    exponents: Vec<f64>,
    coefficients: Vec<f64>,
}

impl FittedLinearFunction {
    /// Pair a coefficient vector with the exponents of `spec`.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient count does not match the spec's parameter
    /// count; solvers construct these internally, so a mismatch is a
    /// programming error.
    pub fn new(spec: &ModelSpec, coefficients: Vec<f64>) -> Self {
        let exponents = spec.exponents();
        assert_eq!(
            exponents.len(),
            coefficients.len(),
            "coefficient count {} does not match model parameter count {}",
            coefficients.len(),
            exponents.len()
        );
        FittedLinearFunction {
            exponents,
            coefficients,
        }
    }

    /// The fitted parameter vector, in model order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// The exponent of each basis function, in model order.
    pub fn exponents(&self) -> &[f64] {
        &self.exponents
    }

    /// Evaluate the function at `x`.
    pub fn value(&self, x: f64) -> f64 {
        let mut sum = 0.0;
        for (c, e) in self.coefficients.iter().zip(&self.exponents) {
            sum += c * power_term(x, *e);
        }
        sum
    }

    /// Evaluate the first derivative at `x`.
    pub fn derivative_value(&self, x: f64) -> f64 {
        let mut sum = 0.0;
        for (c, e) in self.coefficients.iter().zip(&self.exponents) {
            if *e != 0.0 {
                sum += c * e * power_term(x, e - 1.0);
            }
        }
        sum
    }

    /// Signed residual `y - f(x)` of a single data point.
    pub fn residual(&self, x: f64, y: f64) -> f64 {
        y - self.value(x)
    }

    /// Evaluate the function at each point of `xs`.
    pub fn predict(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_polynomial() {
        // 2 + 3x - x^2
        let f = FittedLinearFunction::new(&ModelSpec::polynomial(2, true), vec![2.0, 3.0, -1.0]);
        assert_eq!(f.value(0.0), 2.0);
        assert_eq!(f.value(2.0), 4.0);
    }

    #[test]
    fn test_value_power_combination() {
        // x + 2 x^1.5
        let f = FittedLinearFunction::new(
            &ModelSpec::power_combination(vec![1.0, 1.5]),
            vec![1.0, 2.0],
        );
        assert!((f.value(4.0) - (4.0 + 2.0 * 8.0)).abs() < 1e-12);
    }

    #[test]
    fn test_derivative() {
        // 2 + 3x - x^2 => 3 - 2x
        let f = FittedLinearFunction::new(&ModelSpec::polynomial(2, true), vec![2.0, 3.0, -1.0]);
        assert!((f.derivative_value(1.0) - 1.0).abs() < 1e-12);
        assert!((f.derivative_value(3.0) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_skips_constant_term() {
        let f = FittedLinearFunction::new(&ModelSpec::polynomial(0, true), vec![5.0]);
        assert_eq!(f.derivative_value(2.0), 0.0);
    }

    #[test]
    fn test_residual() {
        let f = FittedLinearFunction::new(&ModelSpec::line(), vec![1.0, 2.0]);
        assert!((f.residual(3.0, 10.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "parameter count")]
    fn test_mismatched_coefficients_panic() {
        let _ = FittedLinearFunction::new(&ModelSpec::line(), vec![1.0]);
    }
}
