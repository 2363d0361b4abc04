//! Least Trimmed Squares regression.
//!
//! A high-breakdown robust estimator: instead of the full residual sum of
//! squares it minimizes the sum of the `c = min(n, ⌊h·n⌋)` smallest
//! squared residuals, so up to `n - c` arbitrarily bad points cannot drag
//! the fit. The optimum is searched by randomized elemental resampling:
//! each start draws p points without replacement by uniform index draws,
//! solves the exact fit through them, scores the trimmed criterion over the
//! full sample, and the best start wins. Degenerate subsets (collinear or
//! duplicate x) contribute no candidate; a search in which every start
//! degenerates fails explicitly.
//!
//! The caller's slices are copied before sampling and never reordered.
//!
//! # References
//!
//! - Rousseeuw, P. J. (1984). Least median of squares regression.
//!   Journal of the American Statistical Association, 79(388), 871-880.
//! - Rousseeuw, P. J., & Leroy, A. M. (1987). Robust Regression and
//!   Outlier Detection. Wiley.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{
    power_term, validate_points, FittedLinearFunction, ModelSpec, ResidualVector,
};
use crate::solvers::coverage::resolve_covered_count;
use crate::solvers::elemental::elemental_fit;
use crate::solvers::traits::{FittedModel, Regressor, RegressionError};
use crate::stats::selection::sum_of_smallest;

/// Random elemental starts used when the builder does not override it.
pub const DEFAULT_RANDOM_STARTS: usize = 200;

/// Least Trimmed Squares estimator for a [`ModelSpec`].
///
/// # Example
///
/// ```rust,ignore
/// use anofox_robust::prelude::*;
///
/// let fitted = LtsRegressor::builder()
///     .model(ModelSpec::line())
///     .coverage(0.75)
///     .seed(42)
///     .build()
///     .fit(&x, &y)?;
/// println!("trimmed objective = {}", fitted.objective());
/// ```
#[derive(Debug, Clone)]
pub struct LtsRegressor {
    model: ModelSpec,
    coverage: Option<f64>,
    random_starts: usize,
    seed: Option<u64>,
}

impl LtsRegressor {
    /// LTS fit of `model` at minimal (breakdown-optimal) coverage.
    pub fn new(model: ModelSpec) -> Self {
        LtsRegressor {
            model,
            coverage: None,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> LtsRegressorBuilder {
        LtsRegressorBuilder::default()
    }
}

impl Regressor for LtsRegressor {
    type Fitted = FittedLts;

    fn fit(&self, x: &[f64], y: &[f64]) -> Result<FittedLts, RegressionError> {
        self.model.validate()?;
        let p = self.model.parameter_count();
        validate_points(x, y, p)?;
        let n = x.len();
        let c = resolve_covered_count(self.coverage, n, p)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let exponents = self.model.exponents();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut subset_x = vec![0.0; p];
        let mut subset_y = vec![0.0; p];
        let mut squared = vec![0.0; n];

        let mut best: Option<(f64, Vec<f64>)> = None;
        let mut degenerate_starts = 0usize;

        for _ in 0..self.random_starts {
            // Uniform index draws without replacement: a partial
            // Fisher-Yates pass over the index buffer.
            for k in 0..p {
                let j = rng.gen_range(k..n);
                indices.swap(k, j);
                subset_x[k] = x[indices[k]];
                subset_y[k] = y[indices[k]];
            }

            let Some(coefficients) = elemental_fit(&self.model, &subset_x, &subset_y) else {
                degenerate_starts += 1;
                continue;
            };

            for i in 0..n {
                let mut fit = 0.0;
                for (coef, e) in coefficients.iter().zip(&exponents) {
                    fit += coef * power_term(x[i], *e);
                }
                let r = y[i] - fit;
                squared[i] = r * r;
            }
            let criterion = sum_of_smallest(&mut squared, c);

            if best.as_ref().map_or(true, |(b, _)| criterion < *b) {
                best = Some((criterion, coefficients));
            }
        }

        let Some((objective, coefficients)) = best else {
            return Err(RegressionError::NoFeasibleFit {
                starts: self.random_starts,
            });
        };

        let function = FittedLinearFunction::new(&self.model, coefficients);
        let residuals = ResidualVector::new(
            x.iter()
                .zip(y)
                .map(|(&xi, &yi)| function.residual(xi, yi))
                .collect(),
        );
        Ok(FittedLts {
            function,
            residuals,
            objective,
            covered_count: c,
            degenerate_starts,
        })
    }
}

/// A fitted Least Trimmed Squares model.
#[derive(Debug, Clone)]
pub struct FittedLts {
    function: FittedLinearFunction,
    residuals: ResidualVector,
    objective: f64,
    covered_count: usize,
    degenerate_starts: usize,
}

impl FittedLts {
    /// The minimized trimmed criterion: the sum of the `covered_count`
    /// smallest squared residuals.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Number of points the trimmed criterion covers.
    pub fn covered_count(&self) -> usize {
        self.covered_count
    }

    /// Random starts skipped because their elemental subset was singular.
    pub fn degenerate_starts(&self) -> usize {
        self.degenerate_starts
    }
}

impl FittedModel for FittedLts {
    fn function(&self) -> &FittedLinearFunction {
        &self.function
    }

    fn residuals(&self) -> &ResidualVector {
        &self.residuals
    }
}

/// Builder for `LtsRegressor`.
#[derive(Debug, Clone)]
pub struct LtsRegressorBuilder {
    model: ModelSpec,
    coverage: Option<f64>,
    random_starts: usize,
    seed: Option<u64>,
}

impl Default for LtsRegressorBuilder {
    fn default() -> Self {
        LtsRegressorBuilder {
            model: ModelSpec::line(),
            coverage: None,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }
}

impl LtsRegressorBuilder {
    /// Create a new builder with default options (straight-line model,
    /// minimal coverage).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to fit.
    pub fn model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Set the coverage fraction h in (0, 1].
    ///
    /// Default is the minimal high-breakdown coverage derived from the
    /// sample size and parameter count.
    pub fn coverage(mut self, h: f64) -> Self {
        self.coverage = Some(h);
        self
    }

    /// Set the number of random elemental starts.
    pub fn random_starts(mut self, starts: usize) -> Self {
        self.random_starts = starts;
        self
    }

    /// Seed the random search for reproducible fits.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the regressor.
    pub fn build(self) -> LtsRegressor {
        LtsRegressor {
            model: self.model,
            coverage: self.coverage,
            random_starts: self.random_starts,
            seed: self.seed,
        }
    }
}
