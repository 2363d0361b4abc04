//! Coverage arithmetic shared by the trimmed estimators.
//!
//! Coverage h is the fraction of points whose residuals contribute to a
//! trimmed criterion. The counts below are kept in integer arithmetic so
//! the estimators, their refinements and the reported `covered_count`
//! cannot disagree by a rounding ulp.

use crate::solvers::RegressionError;

/// Points covered at an explicit coverage fraction: `min(n, ⌊h·n⌋)`.
pub fn covered_count(h: f64, n: usize) -> usize {
    ((h * n as f64).floor() as usize).min(n)
}

/// Covered count at the breakdown-optimal minimal coverage,
/// `⌊(n + p + 1)/2⌋`, clamped to n.
///
/// This is the h ≈ (n+p+1)/(2n) rule that keeps the estimator resistant to
/// just under 50% contamination.
pub fn minimal_covered_count(n: usize, p: usize) -> usize {
    ((n + p + 1) / 2).min(n)
}

/// 0-based rank of the robust median among the sorted absolute residuals:
/// one below the minimal covered count.
pub fn robust_median_rank(n: usize, p: usize) -> usize {
    minimal_covered_count(n, p).saturating_sub(1)
}

/// Resolve an optional explicit coverage into the count of covered points.
///
/// `None` selects the minimal (breakdown-optimal) coverage. An explicit
/// fraction must lie in (0, 1] and must cover at least p points.
pub fn resolve_covered_count(
    coverage: Option<f64>,
    n: usize,
    p: usize,
) -> Result<usize, RegressionError> {
    match coverage {
        None => Ok(minimal_covered_count(n, p)),
        Some(h) => {
            if !(h > 0.0 && h <= 1.0) || h.is_nan() {
                return Err(RegressionError::InvalidCoverage(h));
            }
            let c = covered_count(h, n);
            if c < p {
                return Err(RegressionError::InvalidCoverage(h));
            }
            Ok(c)
        }
    }
}
