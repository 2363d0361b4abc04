//! High-coverage refinement of the trimmed estimators.
//!
//! The minimal-coverage LTS/LTA fits are maximally robust but throw away
//! almost half the sample, which costs efficiency on cleaner data. The
//! two-stage procedure here recovers it: fit once at minimal coverage,
//! read a scale estimate off the sorted absolute residuals (the c₁-th
//! smallest), call every point within `k` times that scale an inlier, and
//! refit with the coverage fraction the inlier count implies. The robust
//! median of the preliminary residuals is returned alongside, as the scale
//! estimate downstream consumers use for outlier flagging.

use crate::core::ModelSpec;
use crate::solvers::coverage::{minimal_covered_count, robust_median_rank};
use crate::solvers::lta::{FittedLta, LtaRegressor};
use crate::solvers::lts::{FittedLts, LtsRegressor, DEFAULT_RANDOM_STARTS};
use crate::solvers::traits::{FittedModel, Regressor, RegressionError};

/// Default inlier threshold multiplier k.
pub const DEFAULT_INLIER_MULTIPLIER: f64 = 3.0;

/// Stage-2 plan derived from the preliminary fit's residuals.
struct RefinementPlan {
    coverage: f64,
    reported_coverage: f64,
    inlier_count: usize,
    robust_median: f64,
}

/// Sorted absolute residuals -> refined coverage and robust median.
fn plan_refinement(sorted_absolute: &[f64], p: usize, k: f64) -> RefinementPlan {
    let n = sorted_absolute.len();
    let c1 = minimal_covered_count(n, p);
    let scale = sorted_absolute[c1 - 1];
    let limit = k * scale;

    // Residuals are sorted, so the inliers are a prefix.
    let inlier_count = sorted_absolute.partition_point(|&r| r <= limit);

    // Nudge the fraction by half a step so the inner estimator's
    // ⌊h·n⌋ reproduces the integer count exactly under fp rounding.
    let coverage = if inlier_count == n {
        1.0
    } else {
        (inlier_count as f64 + 0.5) / n as f64
    };

    RefinementPlan {
        coverage,
        reported_coverage: inlier_count as f64 / n as f64,
        inlier_count,
        robust_median: sorted_absolute[robust_median_rank(n, p)],
    }
}

fn sorted_absolute_residuals(residuals: &[f64]) -> Vec<f64> {
    let mut absolute: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
    absolute.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    absolute
}

/// Two-stage high-coverage Least Trimmed Squares.
///
/// # Example
///
/// ```rust,ignore
/// use anofox_robust::prelude::*;
///
/// let refined = HighCoverageLts::builder()
///     .model(ModelSpec::line())
///     .seed(42)
///     .build()
///     .fit(&x, &y)?;
/// println!(
///     "covered {} of {} points, robust median {}",
///     refined.inlier_count(),
///     x.len(),
///     refined.robust_median()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HighCoverageLts {
    model: ModelSpec,
    inlier_multiplier: f64,
    random_starts: usize,
    seed: Option<u64>,
}

impl HighCoverageLts {
    /// Refined LTS fit of `model` with the default multiplier.
    pub fn new(model: ModelSpec) -> Self {
        HighCoverageLts {
            model,
            inlier_multiplier: DEFAULT_INLIER_MULTIPLIER,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }

    /// Create a builder for configuring the estimator.
    pub fn builder() -> HighCoverageLtsBuilder {
        HighCoverageLtsBuilder::default()
    }
}

impl Regressor for HighCoverageLts {
    type Fitted = RefinedLts;

    fn fit(&self, x: &[f64], y: &[f64]) -> Result<RefinedLts, RegressionError> {
        if !(self.inlier_multiplier >= 1.0) {
            return Err(RegressionError::NumericalError(format!(
                "inlier multiplier must be >= 1, got {}",
                self.inlier_multiplier
            )));
        }

        let mut stage1 = LtsRegressor::builder()
            .model(self.model.clone())
            .random_starts(self.random_starts);
        if let Some(seed) = self.seed {
            stage1 = stage1.seed(seed);
        }
        let preliminary = stage1.build().fit(x, y)?;

        let sorted = sorted_absolute_residuals(preliminary.residuals().as_slice());
        let plan = plan_refinement(&sorted, self.model.parameter_count(), self.inlier_multiplier);

        let mut stage2 = LtsRegressor::builder()
            .model(self.model.clone())
            .coverage(plan.coverage)
            .random_starts(self.random_starts);
        if let Some(seed) = self.seed {
            stage2 = stage2.seed(seed.wrapping_add(1));
        }
        let refined = stage2.build().fit(x, y)?;

        Ok(RefinedLts {
            refined,
            coverage: plan.reported_coverage,
            inlier_count: plan.inlier_count,
            robust_median: plan.robust_median,
        })
    }
}

/// Result of the two-stage LTS refinement.
#[derive(Debug, Clone)]
pub struct RefinedLts {
    refined: FittedLts,
    coverage: f64,
    inlier_count: usize,
    robust_median: f64,
}

impl RefinedLts {
    /// The stage-2 fit.
    pub fn fit(&self) -> &FittedLts {
        &self.refined
    }

    /// Coverage fraction re-estimated from the preliminary residuals.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// Points within the inlier threshold of the preliminary fit.
    pub fn inlier_count(&self) -> usize {
        self.inlier_count
    }

    /// Robust median of the preliminary absolute residuals.
    pub fn robust_median(&self) -> f64 {
        self.robust_median
    }
}

impl FittedModel for RefinedLts {
    fn function(&self) -> &crate::core::FittedLinearFunction {
        self.refined.function()
    }

    fn residuals(&self) -> &crate::core::ResidualVector {
        self.refined.residuals()
    }
}

/// Builder for `HighCoverageLts`.
#[derive(Debug, Clone)]
pub struct HighCoverageLtsBuilder {
    model: ModelSpec,
    inlier_multiplier: f64,
    random_starts: usize,
    seed: Option<u64>,
}

impl Default for HighCoverageLtsBuilder {
    fn default() -> Self {
        HighCoverageLtsBuilder {
            model: ModelSpec::line(),
            inlier_multiplier: DEFAULT_INLIER_MULTIPLIER,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }
}

impl HighCoverageLtsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to fit.
    pub fn model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Set the inlier threshold multiplier k (>= 1). Default is 3.
    pub fn inlier_multiplier(mut self, k: f64) -> Self {
        self.inlier_multiplier = k;
        self
    }

    /// Set the number of random starts used by both stages.
    pub fn random_starts(mut self, starts: usize) -> Self {
        self.random_starts = starts;
        self
    }

    /// Seed both stages for reproducible fits.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the estimator.
    pub fn build(self) -> HighCoverageLts {
        HighCoverageLts {
            model: self.model,
            inlier_multiplier: self.inlier_multiplier,
            random_starts: self.random_starts,
            seed: self.seed,
        }
    }
}

/// Two-stage high-coverage Least Trimmed Absolute deviations.
#[derive(Debug, Clone)]
pub struct HighCoverageLta {
    model: ModelSpec,
    inlier_multiplier: f64,
    random_starts: usize,
    seed: Option<u64>,
}

impl HighCoverageLta {
    /// Refined LTA fit of `model` with the default multiplier.
    pub fn new(model: ModelSpec) -> Self {
        HighCoverageLta {
            model,
            inlier_multiplier: DEFAULT_INLIER_MULTIPLIER,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }

    /// Create a builder for configuring the estimator.
    pub fn builder() -> HighCoverageLtaBuilder {
        HighCoverageLtaBuilder::default()
    }
}

impl Regressor for HighCoverageLta {
    type Fitted = RefinedLta;

    fn fit(&self, x: &[f64], y: &[f64]) -> Result<RefinedLta, RegressionError> {
        if !(self.inlier_multiplier >= 1.0) {
            return Err(RegressionError::NumericalError(format!(
                "inlier multiplier must be >= 1, got {}",
                self.inlier_multiplier
            )));
        }

        let mut stage1 = LtaRegressor::builder()
            .model(self.model.clone())
            .random_starts(self.random_starts);
        if let Some(seed) = self.seed {
            stage1 = stage1.seed(seed);
        }
        let preliminary = stage1.build().fit(x, y)?;

        let sorted = sorted_absolute_residuals(preliminary.residuals().as_slice());
        let plan = plan_refinement(&sorted, self.model.parameter_count(), self.inlier_multiplier);

        let mut stage2 = LtaRegressor::builder()
            .model(self.model.clone())
            .coverage(plan.coverage)
            .random_starts(self.random_starts);
        if let Some(seed) = self.seed {
            stage2 = stage2.seed(seed.wrapping_add(1));
        }
        let refined = stage2.build().fit(x, y)?;

        Ok(RefinedLta {
            refined,
            coverage: plan.reported_coverage,
            inlier_count: plan.inlier_count,
            robust_median: plan.robust_median,
        })
    }
}

/// Result of the two-stage LTA refinement.
#[derive(Debug, Clone)]
pub struct RefinedLta {
    refined: FittedLta,
    coverage: f64,
    inlier_count: usize,
    robust_median: f64,
}

impl RefinedLta {
    /// The stage-2 fit.
    pub fn fit(&self) -> &FittedLta {
        &self.refined
    }

    /// Coverage fraction re-estimated from the preliminary residuals.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// Points within the inlier threshold of the preliminary fit.
    pub fn inlier_count(&self) -> usize {
        self.inlier_count
    }

    /// Robust median of the preliminary absolute residuals.
    pub fn robust_median(&self) -> f64 {
        self.robust_median
    }
}

impl FittedModel for RefinedLta {
    fn function(&self) -> &crate::core::FittedLinearFunction {
        self.refined.function()
    }

    fn residuals(&self) -> &crate::core::ResidualVector {
        self.refined.residuals()
    }
}

/// Builder for `HighCoverageLta`.
#[derive(Debug, Clone)]
pub struct HighCoverageLtaBuilder {
    model: ModelSpec,
    inlier_multiplier: f64,
    random_starts: usize,
    seed: Option<u64>,
}

impl Default for HighCoverageLtaBuilder {
    fn default() -> Self {
        HighCoverageLtaBuilder {
            model: ModelSpec::line(),
            inlier_multiplier: DEFAULT_INLIER_MULTIPLIER,
            random_starts: DEFAULT_RANDOM_STARTS,
            seed: None,
        }
    }
}

impl HighCoverageLtaBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to fit.
    pub fn model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Set the inlier threshold multiplier k (>= 1). Default is 3.
    pub fn inlier_multiplier(mut self, k: f64) -> Self {
        self.inlier_multiplier = k;
        self
    }

    /// Set the number of random starts used by both stages.
    pub fn random_starts(mut self, starts: usize) -> Self {
        self.random_starts = starts;
        self
    }

    /// Seed both stages for reproducible fits.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the estimator.
    pub fn build(self) -> HighCoverageLta {
        HighCoverageLta {
            model: self.model,
            inlier_multiplier: self.inlier_multiplier,
            random_starts: self.random_starts,
            seed: self.seed,
        }
    }
}
