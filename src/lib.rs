//! A robust statistics library for univariate model fitting.
//!
//! This library provides sklearn-style estimators for fitting linear-in-
//! parameters models of one variable (polynomials and power combinations)
//! under squared, absolute and trimmed loss, together with the descriptive
//! statistics and order-statistic utilities the estimators build on.
//!
//! The high-breakdown estimators ([`solvers::LtsRegressor`],
//! [`solvers::LtaRegressor`] and their high-coverage refinements) tolerate
//! up to ~50% arbitrarily contaminated data; the exact L1 solver
//! ([`solvers::LadRegressor`]) and the least-squares solver
//! ([`solvers::OlsRegressor`]) cover the classical losses.
//!
//! # Example
//!
//! ```rust,ignore
//! use anofox_robust::prelude::*;
//!
//! // Fit a line robustly: up to half the points may be junk.
//! let fitted = LtsRegressor::builder()
//!     .model(ModelSpec::line())
//!     .seed(42)
//!     .build()
//!     .fit(&x, &y)?;
//!
//! println!("f(x) = {:?}", fitted.function().coefficients());
//! println!("trimmed objective = {}", fitted.objective());
//!
//! // Summarize a sample.
//! let stats = DescriptiveStatistics::compute(&y, "heights");
//! println!("median = {}", stats.median());
//! ```

pub mod core;
pub mod inference;
pub mod solvers;
pub mod stats;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{FittedLinearFunction, ModelSpec, ResidualVector, SpecialForm};
    pub use crate::inference::{
        one_sample_t_test, two_sample_t_test, TTestResult, VarianceAssumption,
    };
    pub use crate::solvers::{
        FittedLad, FittedLta, FittedLts, FittedModel, FittedOls, HighCoverageLta, HighCoverageLts,
        LadRegressor, LtaRegressor, LtsRegressor, OlsRegressor, RefinedLta, RefinedLts,
        RegressionError, Regressor,
    };
    pub use crate::stats::DescriptiveStatistics;
}

pub use crate::core::{FittedLinearFunction, ModelSpec, ResidualVector};
pub use crate::solvers::{
    FittedModel, HighCoverageLta, HighCoverageLts, LadRegressor, LtaRegressor, LtsRegressor,
    OlsRegressor, RegressionError, Regressor,
};
pub use crate::stats::DescriptiveStatistics;
