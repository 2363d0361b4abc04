//! Regression solvers implementing various estimation methods.

pub mod coverage;
mod elemental;
mod high_coverage;
mod lad;
pub(crate) mod linalg;
mod lta;
mod lts;
mod ols;
mod traits;

pub use high_coverage::{
    HighCoverageLta, HighCoverageLtaBuilder, HighCoverageLts, HighCoverageLtsBuilder, RefinedLta,
    RefinedLts, DEFAULT_INLIER_MULTIPLIER,
};
pub use lad::{FittedLad, LadRegressor, LadRegressorBuilder, DEFAULT_L1_TOLERANCE};
pub use lta::{FittedLta, LtaRegressor, LtaRegressorBuilder};
pub use lts::{FittedLts, LtsRegressor, LtsRegressorBuilder, DEFAULT_RANDOM_STARTS};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use traits::{FittedModel, Regressor, RegressionError};
