//! Exact fits through elemental subsets.
//!
//! The randomized robust estimators repeatedly solve for the unique model
//! passing exactly through p sampled points. The common model shapes
//! (lines, quadratics, single powers, the x/x^1.5 combination) have cheap
//! closed forms; everything else goes through an LU solve of the p×p
//! elemental system. Both paths agree to floating-point accuracy, and both
//! report a degenerate subset (collinear or duplicate x values) as `None`
//! so the search can skip the start.

use faer::{Col, Mat};

use crate::core::{power_term, ModelSpec, SpecialForm};
use crate::solvers::linalg::lu_solve;

/// Coefficients of the model in `spec` interpolating exactly the points
/// `(xs[i], ys[i])`; `None` when the elemental system is singular.
///
/// `xs` and `ys` must both hold exactly `spec.parameter_count()` points.
pub(crate) fn elemental_fit(spec: &ModelSpec, xs: &[f64], ys: &[f64]) -> Option<Vec<f64>> {
    debug_assert_eq!(xs.len(), spec.parameter_count());
    debug_assert_eq!(ys.len(), spec.parameter_count());

    let coefficients = match spec.special_form() {
        Some(SpecialForm::Constant) => vec![ys[0]],
        Some(SpecialForm::LineThroughOrigin) => vec![ys[0] / xs[0]],
        Some(SpecialForm::Line) => {
            let slope = (ys[1] - ys[0]) / (xs[1] - xs[0]);
            vec![ys[0] - slope * xs[0], slope]
        }
        Some(SpecialForm::QuadraticThroughOrigin) => vec![ys[0] / (xs[0] * xs[0])],
        Some(SpecialForm::QuadraticNoIntercept) => {
            // a x + b x^2 through two points with non-zero, distinct x.
            let b = (ys[1] / xs[1] - ys[0] / xs[0]) / (xs[1] - xs[0]);
            let a = ys[0] / xs[0] - b * xs[0];
            vec![a, b]
        }
        Some(SpecialForm::Quadratic) => {
            // Newton divided differences through three points, expanded to
            // monomial coefficients.
            let d1 = (ys[1] - ys[0]) / (xs[1] - xs[0]);
            let d2 = (ys[2] - ys[1]) / (xs[2] - xs[1]);
            let c2 = (d2 - d1) / (xs[2] - xs[0]);
            let a0 = ys[0] - d1 * xs[0] + c2 * xs[0] * xs[1];
            let a1 = d1 - c2 * (xs[0] + xs[1]);
            vec![a0, a1, c2]
        }
        Some(SpecialForm::Power) => {
            let e = spec.exponents()[0];
            vec![ys[0] / power_term(xs[0], e)]
        }
        Some(SpecialForm::SesquiLinear) => {
            let s0 = xs[0] * xs[0].sqrt();
            let s1 = xs[1] * xs[1].sqrt();
            let det = xs[0] * s1 - xs[1] * s0;
            let a = (ys[0] * s1 - ys[1] * s0) / det;
            let b = (xs[0] * ys[1] - xs[1] * ys[0]) / det;
            vec![a, b]
        }
        None => return elemental_fit_general(spec, xs, ys),
    };

    if coefficients.iter().all(|c| c.is_finite()) {
        Some(coefficients)
    } else {
        None
    }
}

/// General path: LU with partial pivoting on the square elemental system.
fn elemental_fit_general(spec: &ModelSpec, xs: &[f64], ys: &[f64]) -> Option<Vec<f64>> {
    let exponents = spec.exponents();
    let p = exponents.len();
    let a = Mat::from_fn(p, p, |i, j| power_term(xs[i], exponents[j]));
    let b = Col::from_fn(p, |i| ys[i]);
    let solution = lu_solve(&a, &b)?;
    Some((0..p).map(|i| solution[i]).collect())
}
