//! Least Absolute Deviations (L1) regression.
//!
//! Implements the Barrodale-Roberts specialization of the primal simplex
//! method for the L1 problem: minimize `Σ|y_i - d_i'β|` over an
//! (n+2)×(p+2) condensed tableau (n data rows plus a marginal-cost row,
//! p parameter columns plus the right-hand side, with basis labels carried
//! alongside). Phase 1 drives the p parameter variables into the basis,
//! detecting linearly dependent columns on the way; phase 2 exchanges
//! residual variables until no marginal cost exceeds the pivot tolerance.
//! The characteristic Barrodale-Roberts refinement of passing through
//! several simplex vertices in one step (flipping a residual's sign when
//! the marginal cost still exceeds twice the pivot) is preserved, as is
//! the classic 1e-12 pivot-admissibility tolerance.
//!
//! The solution is an exact minimizer, not an iterative approximation;
//! repeated fits on the same data are bit-identical. A pivot budget bounds
//! pathological cycling and surfaces as
//! [`RegressionError::ConvergenceFailure`].
//!
//! # References
//!
//! - Barrodale, I., & Roberts, F. D. K. (1974). Algorithm 478: Solution of
//!   an overdetermined system of equations in the l1 norm.
//!   Communications of the ACM, 17(6), 319-320.

use faer::{Col, Mat};

use crate::core::{
    design_matrix, observations, validate_points, FittedLinearFunction, ModelSpec, ResidualVector,
};
use crate::solvers::traits::{FittedModel, Regressor, RegressionError};

/// Pivot-admissibility tolerance of the original algorithm.
pub const DEFAULT_L1_TOLERANCE: f64 = 1e-12;

/// L1 (least absolute deviations) estimator for a [`ModelSpec`].
///
/// # Example
///
/// ```rust,ignore
/// use anofox_robust::prelude::*;
///
/// let fitted = LadRegressor::builder()
///     .model(ModelSpec::line())
///     .build()
///     .fit(&x, &y)?;
/// println!("objective = {}", fitted.objective());
/// ```
#[derive(Debug, Clone)]
pub struct LadRegressor {
    model: ModelSpec,
    tolerance: f64,
    max_pivots: Option<usize>,
}

impl LadRegressor {
    /// L1 fit of `model` with default tolerance and pivot budget.
    pub fn new(model: ModelSpec) -> Self {
        LadRegressor {
            model,
            tolerance: DEFAULT_L1_TOLERANCE,
            max_pivots: None,
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> LadRegressorBuilder {
        LadRegressorBuilder::default()
    }

    fn pivot_budget(&self, n: usize, p: usize) -> usize {
        self.max_pivots.unwrap_or(10 * (n + p) + 100)
    }
}

impl Regressor for LadRegressor {
    type Fitted = FittedLad;

    fn fit(&self, x: &[f64], y: &[f64]) -> Result<FittedLad, RegressionError> {
        self.model.validate()?;
        validate_points(x, y, self.model.parameter_count())?;

        let design = design_matrix(x, &self.model);
        let obs = observations(y);
        let solution = barrodale_roberts(
            &design,
            &obs,
            self.tolerance,
            self.pivot_budget(x.len(), self.model.parameter_count()),
        )?;

        let function = FittedLinearFunction::new(&self.model, solution.coefficients);
        Ok(FittedLad {
            function,
            residuals: ResidualVector::new(solution.residuals),
            objective: solution.objective,
            rank: solution.rank,
            unique: solution.unique,
            pivots: solution.pivots,
        })
    }
}

/// A fitted L1 model.
#[derive(Debug, Clone)]
pub struct FittedLad {
    function: FittedLinearFunction,
    residuals: ResidualVector,
    objective: f64,
    rank: usize,
    unique: bool,
    pivots: usize,
}

impl FittedLad {
    /// The minimized sum of absolute residuals.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Rank of the design matrix detected in phase 1.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Whether the minimizer is unique (no marginal cost at the optimum
    /// sits on the 0/2 boundary).
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Simplex pivots performed.
    pub fn pivots(&self) -> usize {
        self.pivots
    }
}

impl FittedModel for FittedLad {
    fn function(&self) -> &FittedLinearFunction {
        &self.function
    }

    fn residuals(&self) -> &ResidualVector {
        &self.residuals
    }
}

/// Builder for `LadRegressor`.
#[derive(Debug, Clone)]
pub struct LadRegressorBuilder {
    model: ModelSpec,
    tolerance: f64,
    max_pivots: Option<usize>,
}

impl Default for LadRegressorBuilder {
    fn default() -> Self {
        LadRegressorBuilder {
            model: ModelSpec::line(),
            tolerance: DEFAULT_L1_TOLERANCE,
            max_pivots: None,
        }
    }
}

impl LadRegressorBuilder {
    /// Create a new builder with default options (straight-line model).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model to fit.
    pub fn model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Set the pivot-admissibility tolerance.
    ///
    /// Default is 1e-12. Fit expectations are tolerance-sensitive; change
    /// this only with a documented reason.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the pivot budget before the fit aborts with
    /// [`RegressionError::ConvergenceFailure`].
    ///
    /// Default is `10 * (n + p) + 100`.
    pub fn max_pivots(mut self, max_pivots: usize) -> Self {
        self.max_pivots = Some(max_pivots);
        self
    }

    /// Build the regressor.
    pub fn build(self) -> LadRegressor {
        LadRegressor {
            model: self.model,
            tolerance: self.tolerance,
            max_pivots: self.max_pivots,
        }
    }
}

/// Raw output of the simplex.
struct L1Solution {
    coefficients: Vec<f64>,
    residuals: Vec<f64>,
    objective: f64,
    rank: usize,
    unique: bool,
    pivots: usize,
}

/// The two-phase Barrodale-Roberts simplex.
///
/// One reentrant function over its own tableau; `design` and `obs` are
/// pure inputs. Basis bookkeeping: `col_label[j]`/`row_label[i]` hold the
/// 1-based variable index occupying a tableau column/row (1..=p are
/// parameters, p+1..=p+n residuals); a negative label marks a variable
/// that entered with flipped sign.
fn barrodale_roberts(
    design: &Mat<f64>,
    obs: &Col<f64>,
    toler: f64,
    max_pivots: usize,
) -> Result<L1Solution, RegressionError> {
    let n = design.nrows();
    let p = design.ncols();

    // Tableau: rows 0..n are data, row n is the marginal-cost row;
    // columns 0..p are nonbasic variables, column p the right-hand side.
    let mut t: Mat<f64> = Mat::zeros(n + 1, p + 1);
    let mut col_label: Vec<i64> = (1..=p as i64).collect();
    let mut row_label: Vec<i64> = ((p as i64 + 1)..=(p + n) as i64).collect();

    for i in 0..n {
        for j in 0..p {
            t[(i, j)] = design[(i, j)];
        }
        t[(i, p)] = obs[i];
        if obs[i] < 0.0 {
            for j in 0..=p {
                t[(i, j)] = -t[(i, j)];
            }
            row_label[i] = -row_label[i];
        }
    }
    for j in 0..=p {
        let mut sum = 0.0;
        for i in 0..n {
            sum += t[(i, j)];
        }
        t[(n, j)] = sum;
    }

    let mut stage1 = true;
    let mut kr = 0usize; // columns parked as linearly dependent
    let mut kl = 0usize; // first row still holding a basic residual
    let mut pivots = 0usize;
    let mut unbounded = false;

    'simplex: loop {
        // Select the entering column.
        let entering = if stage1 {
            let mut best: Option<(usize, f64)> = None;
            for j in kr..p {
                if col_label[j].unsigned_abs() as usize > p {
                    continue;
                }
                let d = t[(n, j)].abs();
                if best.map_or(true, |(_, m)| d > m) {
                    best = Some((j, d));
                }
            }
            match best {
                Some((j, _)) => {
                    if t[(n, j)] < 0.0 {
                        for i in 0..=n {
                            t[(i, j)] = -t[(i, j)];
                        }
                        col_label[j] = -col_label[j];
                    }
                    j
                }
                // Every parameter column is either basic or parked.
                None => {
                    stage1 = false;
                    continue 'simplex;
                }
            }
        } else {
            let mut best: Option<(usize, f64)> = None;
            for j in kr..p {
                let d = t[(n, j)];
                let gain = if d >= 0.0 {
                    d
                } else if d > -2.0 {
                    continue;
                } else {
                    -d - 2.0
                };
                if best.map_or(true, |(_, m)| gain > m) {
                    best = Some((j, gain));
                }
            }
            match best {
                Some((_, gain)) if gain > toler => {
                    let j = best.unwrap().0;
                    if t[(n, j)] < 0.0 {
                        // Enter the variable with flipped sign.
                        for i in 0..=n {
                            t[(i, j)] = -t[(i, j)];
                        }
                        col_label[j] = -col_label[j];
                        t[(n, j)] -= 2.0;
                    }
                    j
                }
                _ => break 'simplex, // optimal
            }
        };

        // Ratio test over the rows that still hold residual variables.
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for i in kl..n {
            let d = t[(i, entering)];
            if d > toler {
                candidates.push((i, t[(i, p)] / d));
            }
        }

        let leaving = loop {
            let mut chosen: Option<(usize, usize, f64)> = None;
            for (slot, &(row, ratio)) in candidates.iter().enumerate() {
                if chosen.map_or(true, |(_, _, m)| ratio < m) {
                    chosen = Some((slot, row, ratio));
                }
            }
            let Some((slot, row, _)) = chosen else {
                if stage1 {
                    // Linearly dependent column: park it on the left.
                    for i in 0..=n {
                        let tmp = t[(i, kr)];
                        t[(i, kr)] = t[(i, entering)];
                        t[(i, entering)] = tmp;
                    }
                    col_label.swap(kr, entering);
                    kr += 1;
                    continue 'simplex;
                }
                unbounded = true;
                break 'simplex;
            };
            candidates.swap_remove(slot);

            let pivot = t[(row, entering)];
            if t[(n, entering)] - 2.0 * pivot > toler {
                // Pass through this vertex: flipping the residual's sign
                // gains more than pivoting here would.
                for j in kr..=p {
                    let d = t[(row, j)];
                    t[(n, j)] -= 2.0 * d;
                    t[(row, j)] = -d;
                }
                row_label[row] = -row_label[row];
                pivots += 1;
                if pivots > max_pivots {
                    return Err(RegressionError::ConvergenceFailure { max_pivots });
                }
                continue;
            }
            break row;
        };

        // Pivot on (leaving, entering).
        let pivot = t[(leaving, entering)];
        for j in kr..=p {
            if j != entering {
                t[(leaving, j)] /= pivot;
            }
        }
        for i in 0..=n {
            if i == leaving {
                continue;
            }
            let d = t[(i, entering)];
            for j in kr..=p {
                if j != entering {
                    t[(i, j)] -= d * t[(leaving, j)];
                }
            }
        }
        for i in 0..=n {
            if i != leaving {
                t[(i, entering)] = -t[(i, entering)] / pivot;
            }
        }
        t[(leaving, entering)] = 1.0 / pivot;
        std::mem::swap(&mut row_label[leaving], &mut col_label[entering]);

        pivots += 1;
        if pivots > max_pivots {
            return Err(RegressionError::ConvergenceFailure { max_pivots });
        }

        if stage1 {
            // Keep parameter rows packed at the top.
            if leaving != kl {
                for j in 0..=p {
                    let tmp = t[(leaving, j)];
                    t[(leaving, j)] = t[(kl, j)];
                    t[(kl, j)] = tmp;
                }
                row_label.swap(leaving, kl);
            }
            kl += 1;
            if kl + kr == p {
                stage1 = false;
            }
        }
    }

    if unbounded {
        return Err(RegressionError::NumericalError(
            "L1 objective unbounded over the working basis".to_owned(),
        ));
    }

    // Normalize parameter rows to non-negative right-hand sides.
    for i in 0..kl {
        if t[(i, p)] < 0.0 {
            for j in kr..=p {
                t[(i, j)] = -t[(i, j)];
            }
            row_label[i] = -row_label[i];
        }
    }

    // Uniqueness: full rank and no optimal marginal cost on the 0/2
    // boundary of the dual feasibility box.
    let mut unique = kr == 0;
    if unique {
        for j in 0..p {
            let d = t[(n, j)].abs();
            if d <= toler || (2.0 - d).abs() <= toler {
                unique = false;
                break;
            }
        }
    }

    let mut coefficients = vec![0.0; p];
    let mut residuals = vec![0.0; n];
    let mut objective = 0.0;
    for i in 0..n {
        let mut label = row_label[i];
        let mut value = t[(i, p)];
        if label < 0 {
            label = -label;
            value = -value;
        }
        let label = label as usize;
        if i < kl {
            coefficients[label - 1] = value;
        } else {
            residuals[label - 1 - p] = value;
            objective += t[(i, p)];
        }
    }

    Ok(L1Solution {
        coefficients,
        residuals,
        objective,
        rank: p - kr,
        unique,
        pivots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line_recovery() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 1.0 + 2.0 * xi).collect();

        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        let c = fitted.function().coefficients();
        assert!((c[0] - 1.0).abs() < 1e-9);
        assert!((c[1] - 2.0).abs() < 1e-9);
        assert!(fitted.objective() < 1e-9);
    }

    #[test]
    fn test_textbook_example() {
        // Known L1 problem: {(0,0),(1,1),(2,0),(3,1)}. The optimum passes
        // through (0,0) and (3,1): y = x/3, objective 4/3.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 0.0, 1.0];

        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        assert!(
            (fitted.objective() - 4.0 / 3.0).abs() < 1e-9,
            "objective {}",
            fitted.objective()
        );
    }

    #[test]
    fn test_median_property_constant_model() {
        // The L1 constant fit is a median of y.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [7.0, 1.0, 3.0, 100.0, 2.0];

        let fitted = LadRegressor::new(ModelSpec::polynomial(0, true))
            .fit(&x, &y)
            .unwrap();
        assert!((fitted.function().coefficients()[0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpolates_p_points() {
        // With n = p the optimum interpolates and the objective is 0.
        let x = [1.0, 4.0];
        let y = [2.0, 11.0];
        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        assert!(fitted.objective() < 1e-9);
        assert!((fitted.function().value(1.0) - 2.0).abs() < 1e-9);
        assert!((fitted.function().value(4.0) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_outlier_resistance() {
        let x: Vec<f64> = (0..21).map(|i| i as f64).collect();
        let mut y: Vec<f64> = x.iter().map(|&xi| 0.5 * xi + 1.0).collect();
        y[20] = 1000.0;

        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        let c = fitted.function().coefficients();
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!((c[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        let x: Vec<f64> = (0..30).map(|i| (i as f64 * 0.37).cos() * 5.0).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 2.0 - 0.7 * xi + (xi * 2.3).sin()).collect();

        let model = LadRegressor::new(ModelSpec::line());
        let a = model.fit(&x, &y).unwrap();
        let b = model.fit(&x, &y).unwrap();
        assert_eq!(a.function().coefficients(), b.function().coefficients());
        assert_eq!(a.objective(), b.objective());
    }

    #[test]
    fn test_residuals_match_function() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.1, 0.9, 2.2, 2.8, 4.1];
        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        for (i, (&xi, &yi)) in x.iter().zip(&y).enumerate() {
            let expected = fitted.function().residual(xi, yi);
            assert!(
                (fitted.residuals().as_slice()[i] - expected).abs() < 1e-9,
                "residual {i}"
            );
        }
    }

    #[test]
    fn test_rank_deficient_column_parked() {
        // Duplicate basis column: x and x again.
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 2.1, 2.9, 4.0];
        let fitted = LadRegressor::new(ModelSpec::power_combination(vec![1.0, 1.0]))
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.rank(), 1);
        assert!(!fitted.is_unique());
    }

    #[test]
    fn test_pivot_cap() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| xi * 1.1 + (xi * 0.9).sin()).collect();
        let result = LadRegressor::builder()
            .model(ModelSpec::line())
            .max_pivots(1)
            .build()
            .fit(&x, &y);
        assert!(matches!(
            result,
            Err(RegressionError::ConvergenceFailure { .. })
        ));
    }

    #[test]
    fn test_negative_observations() {
        let x: Vec<f64> = (0..12).map(|i| i as f64 - 6.0).collect();
        let y: Vec<f64> = x.iter().map(|&xi| -3.0 * xi - 2.0).collect();
        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        let c = fitted.function().coefficients();
        assert!((c[0] + 2.0).abs() < 1e-9);
        assert!((c[1] + 3.0).abs() < 1e-9);
    }
}
