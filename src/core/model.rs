//! Linear model specifications.
//!
//! A model is a linear combination of power basis functions `x^e`. The two
//! ways callers describe one (a polynomial degree with an optional
//! intercept, or an explicit list of real exponents) form a closed variant
//! set, and every solver in this crate works off the generated exponent
//! list. Specs matching a known closed-form case additionally report a
//! [`SpecialForm`] so the elemental-subset solvers can skip the general
//! LU path.

use crate::solvers::RegressionError;

/// Specification of a linear-in-parameters univariate model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSpec {
    /// `a_0 + a_1 x + ... + a_d x^d`, with `a_0` dropped when
    /// `with_intercept` is false.
    Polynomial { degree: usize, with_intercept: bool },
    /// An explicit power combination `a_1 x^{e_1} + ... + a_p x^{e_p}`.
    PowerCombination { exponents: Vec<f64> },
}

/// Model shapes with dedicated closed-form elemental fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    /// `a` (degree 0 with intercept).
    Constant,
    /// `a x`.
    LineThroughOrigin,
    /// `a + b x`.
    Line,
    /// `a x^2`.
    QuadraticThroughOrigin,
    /// `a x + b x^2`.
    QuadraticNoIntercept,
    /// `a + b x + c x^2`.
    Quadratic,
    /// `a x^e` for a single arbitrary exponent.
    Power,
    /// `a x + b x^1.5`.
    SesquiLinear,
}

impl ModelSpec {
    /// Polynomial of the given degree, with or without an intercept term.
    pub fn polynomial(degree: usize, with_intercept: bool) -> Self {
        ModelSpec::Polynomial {
            degree,
            with_intercept,
        }
    }

    /// Explicit power-combination model.
    pub fn power_combination(exponents: Vec<f64>) -> Self {
        ModelSpec::PowerCombination { exponents }
    }

    /// Straight line `a + b x`.
    pub fn line() -> Self {
        Self::polynomial(1, true)
    }

    /// Single power term `a x^e`.
    pub fn power(exponent: f64) -> Self {
        Self::power_combination(vec![exponent])
    }

    /// The exponent of each basis function, in model order.
    ///
    /// For the polynomial form these are `0..=degree`, dropping exponent 0
    /// when the intercept is suppressed.
    pub fn exponents(&self) -> Vec<f64> {
        match self {
            ModelSpec::Polynomial {
                degree,
                with_intercept,
            } => {
                let start = usize::from(!with_intercept);
                (start..=*degree).map(|e| e as f64).collect()
            }
            ModelSpec::PowerCombination { exponents } => exponents.clone(),
        }
    }

    /// Number of free parameters p.
    pub fn parameter_count(&self) -> usize {
        match self {
            ModelSpec::Polynomial {
                degree,
                with_intercept,
            } => degree + usize::from(*with_intercept),
            ModelSpec::PowerCombination { exponents } => exponents.len(),
        }
    }

    /// Reject specs no solver can fit: zero parameters, or non-finite
    /// exponents.
    pub fn validate(&self) -> Result<(), RegressionError> {
        if self.parameter_count() == 0 {
            return Err(RegressionError::InvalidModel(
                "model has no parameters".to_owned(),
            ));
        }
        if let ModelSpec::PowerCombination { exponents } = self {
            if exponents.iter().any(|e| !e.is_finite()) {
                return Err(RegressionError::InvalidModel(
                    "model exponents must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// The closed-form case this spec matches, if any.
    pub fn special_form(&self) -> Option<SpecialForm> {
        match self {
            ModelSpec::Polynomial {
                degree,
                with_intercept,
            } => match (degree, with_intercept) {
                (0, true) => Some(SpecialForm::Constant),
                (1, false) => Some(SpecialForm::LineThroughOrigin),
                (1, true) => Some(SpecialForm::Line),
                (2, false) => Some(SpecialForm::QuadraticNoIntercept),
                (2, true) => Some(SpecialForm::Quadratic),
                _ => None,
            },
            ModelSpec::PowerCombination { exponents } => match exponents.as_slice() {
                [e] if *e == 0.0 => Some(SpecialForm::Constant),
                [e] if *e == 1.0 => Some(SpecialForm::LineThroughOrigin),
                [e] if *e == 2.0 => Some(SpecialForm::QuadraticThroughOrigin),
                [e] if e.is_finite() => Some(SpecialForm::Power),
                [a, b] if *a == 0.0 && *b == 1.0 => Some(SpecialForm::Line),
                [a, b] if *a == 1.0 && *b == 2.0 => Some(SpecialForm::QuadraticNoIntercept),
                [a, b] if *a == 1.0 && *b == 1.5 => Some(SpecialForm::SesquiLinear),
                [a, b, c] if *a == 0.0 && *b == 1.0 && *c == 2.0 => Some(SpecialForm::Quadratic),
                _ => None,
            },
        }
    }
}
