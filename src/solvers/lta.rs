//! Least Trimmed Absolute deviations regression.
//!
//! The L1 counterpart of Least Trimmed Squares: minimizes the sum of the
//! `c = min(n, ⌊h·n⌋)` smallest absolute residuals. Like LTS it searches
//! by randomized elemental resampling, but each start shuffles a working
//! copy of the point list and takes the first p entries as the elemental
//! subset. Degenerate subsets are skipped; an all-degenerate search fails
//! explicitly.
//!
//! The caller's slices are copied before shuffling and never reordered.
//!
//! # References
//!
//! - Hawkins, D. M., & Olive, D. J. (1999). Applications and algorithms
//!   for least trimmed sum of absolute deviations regression.
//!   Computational Statistics & Data Analysis, 32(2), 119-134.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::{
    power_term, validate_points, FittedLinearFunction, ModelSpec, ResidualVector,
};
use crate::solvers::coverage::resolve_covered_count;
use crate::solvers::elemental::elemental_fit;
use crate::solvers::lts::DEFAULT_RANDOM_STARTS;
use crate::solvers::traits::{FittedModel, Regressor, RegressionError};
use crate::stats::selection::sum_of_smallest;

/// Least Trimmed Absolute deviations estimator for a [`ModelSpec`].
///
/// # Example
///
/// ```rust,ignore
/// use anofox_robust::prelude::*;
///
/// let fitted = LtaRegressor::builder()
///     .model(ModelSpec::line())
///     .seed(42)
///     .build()
///     .fit(&x, &y)?;
/// println!("covered {} points", fitted.covered_count());
/// ```
#[derive(Debug, Clone)]
pub struct LtaRegressor {
    model: ModelSpec,
    coverage: Option<f64>,
    random_starts: usize,
    seed: Option<u64>,
}

impl LtaRegressor {
    /// LTA fit of `model` at minimal (breakdown-optimal) coverage.
    pub fn new(model: ModelSpec) -> Self {
        LtaRegressor {
            model,
            coverage: None,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> LtaRegressorBuilder {
        LtaRegressorBuilder::default()
    }
}

impl Regressor for LtaRegressor {
    type Fitted = FittedLta;

    fn fit(&self, x: &[f64], y: &[f64]) -> Result<FittedLta, RegressionError> {
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
        let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        let mut subset_x = vec![0.0; p];
        let mut subset_y = vec![0.0; p];
        let mut absolute = vec![0.0; n];

        let mut best: Option<(f64, Vec<f64>)> = None;
        let mut degenerate_starts = 0usize;

        for _ in 0..self.random_starts {
            points.shuffle(&mut rng);
            for k in 0..p {
                subset_x[k] = points[k].0;
                subset_y[k] = points[k].1;
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
                absolute[i] = (y[i] - fit).abs();
            }
            let criterion = sum_of_smallest(&mut absolute, c);

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
        Ok(FittedLta {
            function,
            residuals,
            objective,
            covered_count: c,
            degenerate_starts,
        })
    }
}

/// A fitted Least Trimmed Absolute deviations model.
#[derive(Debug, Clone)]
pub struct FittedLta {
    function: FittedLinearFunction,
    residuals: ResidualVector,
    objective: f64,
    covered_count: usize,
    degenerate_starts: usize,
}

impl FittedLta {
    /// The minimized trimmed criterion: the sum of the `covered_count`
    /// smallest absolute residuals.
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

impl FittedModel for FittedLta {
    fn function(&self) -> &FittedLinearFunction {
        &self.function
    }

    fn residuals(&self) -> &ResidualVector {
        &self.residuals
    }
}

/// Builder for `LtaRegressor`.
#[derive(Debug, Clone)]
pub struct LtaRegressorBuilder {
    model: ModelSpec,
    coverage: Option<f64>,
    random_starts: usize,
    seed: Option<u64>,
}

impl Default for LtaRegressorBuilder {
    fn default() -> Self {
        LtaRegressorBuilder {
            model: ModelSpec::line(),
            coverage: None,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }
}

impl LtaRegressorBuilder {
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
    pub fn build(self) -> LtaRegressor {
        LtaRegressor {
            model: self.model,
            coverage: self.coverage,
            random_starts: self.random_starts,
            seed: self.seed,
        }
    }
}
