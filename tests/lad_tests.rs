//! L1 (least absolute deviations) solver validation.
//!
//! The optimality checks exploit the LP structure of the problem: an
//! optimal L1 line always exists that passes through two data points, so a
//! brute-force sweep over all point pairs bounds the achievable objective.

mod common;

use anofox_robust::core::ModelSpec;
use anofox_robust::solvers::{FittedModel, LadRegressor, Regressor};
use common::{approx_eq, generate_line_data, inject_outliers, lcg_stream};

/// Minimal Σ|residual| over every line through two sample points.
fn brute_force_l1_minimum(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    let mut best = f64::INFINITY;
    for i in 0..n {
        for j in (i + 1)..n {
            if x[i] == x[j] {
                continue;
            }
            let slope = (y[j] - y[i]) / (x[j] - x[i]);
            let intercept = y[i] - slope * x[i];
            let objective: f64 = x
                .iter()
                .zip(y)
                .map(|(&xi, &yi)| (yi - intercept - slope * xi).abs())
                .sum();
            if objective < best {
                best = objective;
            }
        }
    }
    best
}

// =============================================================================
// Optimality
// =============================================================================

#[test]
fn test_textbook_example_matches_brute_force() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let y = [0.0, 1.0, 0.0, 1.0];

    let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
    let expected = brute_force_l1_minimum(&x, &y);
    assert!(approx_eq(fitted.objective(), expected, 1e-9));
    assert!(approx_eq(expected, 4.0 / 3.0, 1e-12));
}

#[test]
fn test_random_samples_match_brute_force() {
    let mut next_rand = lcg_stream(17);
    for round in 0..10 {
        let n = 8 + round;
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 0.8 * xi - 2.0 + next_rand() * 3.0).collect();

        let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
        let expected = brute_force_l1_minimum(&x, &y);
        assert!(
            approx_eq(fitted.objective(), expected, 1e-8),
            "round {round}: {} vs {expected}",
            fitted.objective()
        );
    }
}

#[test]
fn test_objective_equals_residual_sum() {
    let (x, y) = generate_line_data(50, 1.0, -0.5, 2.0, 23);
    let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
    assert!(approx_eq(
        fitted.objective(),
        fitted.residuals().sum_of_absolute_values(),
        1e-9
    ));
}

// =============================================================================
// Robustness and Determinism
// =============================================================================

#[test]
fn test_single_outlier_does_not_move_fit() {
    let (x, mut y) = generate_line_data(40, 5.0, 1.5, 0.0, 1);
    inject_outliers(&mut y, 1, 1e6, 2);

    let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
    let c = fitted.function().coefficients();
    assert!(approx_eq(c[0], 5.0, 1e-6));
    assert!(approx_eq(c[1], 1.5, 1e-6));
}

#[test]
fn test_repeated_fits_bit_identical() {
    let (x, y) = generate_line_data(70, -3.0, 0.9, 1.5, 11);
    let model = LadRegressor::new(ModelSpec::polynomial(2, true));
    let a = model.fit(&x, &y).unwrap();
    let b = model.fit(&x, &y).unwrap();
    assert_eq!(a.function().coefficients(), b.function().coefficients());
    assert_eq!(a.objective(), b.objective());
    assert_eq!(a.pivots(), b.pivots());
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_quadratic_interpolation_three_points() {
    let x = [0.0, 1.0, 2.0];
    let y = [1.0, 2.0, 5.0];
    let fitted = LadRegressor::new(ModelSpec::polynomial(2, true))
        .fit(&x, &y)
        .unwrap();
    assert!(fitted.objective() < 1e-9);
    for (&xi, &yi) in x.iter().zip(&y) {
        assert!(approx_eq(fitted.function().value(xi), yi, 1e-9));
    }
}

#[test]
fn test_vertical_spread_takes_median_like_path() {
    // Three identical x groups; the L1 line must pass within the middle
    // of each group's values.
    let x = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0];
    let y = [0.0, 1.0, 2.0, 1.0, 2.0, 3.0, 2.0, 3.0, 4.0];
    let fitted = LadRegressor::new(ModelSpec::line()).fit(&x, &y).unwrap();
    // Optimal objective: each group contributes its within-group spread.
    assert!(fitted.objective() <= 6.0 + 1e-9);
}

#[test]
fn test_mismatched_inputs_rejected() {
    let result = LadRegressor::new(ModelSpec::line()).fit(&[1.0, 2.0], &[1.0]);
    assert!(result.is_err());
}

#[test]
fn test_empty_model_rejected() {
    let result =
        LadRegressor::new(ModelSpec::power_combination(vec![])).fit(&[1.0, 2.0], &[1.0, 2.0]);
    assert!(result.is_err());
}
