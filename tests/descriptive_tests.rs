//! Descriptive statistics validation.
//!
//! Round-trip values, NaN handling, quantile ordering and the behavior of
//! statistics that are undefined for small samples.

mod common;

use anofox_robust::stats::{select_nth, select_ranks, DescriptiveStatistics};
use common::{approx_eq, lcg_stream};

// =============================================================================
// Reference Values
// =============================================================================

#[test]
fn test_round_trip_one_to_five() {
    let stats = DescriptiveStatistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], "sample");
    assert_eq!(stats.size(), 5);
    assert!(approx_eq(stats.mean(), 3.0, 1e-12));
    assert!(approx_eq(stats.median(), 3.0, 1e-12));
    assert!(approx_eq(stats.variance(), 2.5, 1e-12));
    assert!(approx_eq(stats.standard_deviation(), 1.5811388300841898, 1e-12));
    assert!(approx_eq(stats.skewness(), 0.0, 1e-12));
    assert_eq!(stats.name(), "sample");
}

#[test]
fn test_known_quartiles() {
    // Positions in a sample of 8 are 8p + 0.5.
    let sample: Vec<f64> = (1..=8).map(|i| i as f64).collect();
    let stats = DescriptiveStatistics::compute(&sample, "s");
    assert!(approx_eq(stats.lower_quartile(), 2.5, 1e-12));
    assert!(approx_eq(stats.median(), 4.5, 1e-12));
    assert!(approx_eq(stats.upper_quartile(), 6.5, 1e-12));
}

#[test]
fn test_constant_sample() {
    let stats = DescriptiveStatistics::compute(&[7.0; 12], "constant");
    assert!(approx_eq(stats.mean(), 7.0, 1e-12));
    assert!(approx_eq(stats.median(), 7.0, 1e-12));
    assert!(approx_eq(stats.variance(), 0.0, 1e-12));
    assert!(approx_eq(stats.interquartile_range(), 0.0, 1e-12));
}

// =============================================================================
// NaN Handling
// =============================================================================

#[test]
fn test_nan_values_are_filtered() {
    let with_nan =
        DescriptiveStatistics::compute(&[1.0, f64::NAN, 3.0, f64::NAN, 5.0], "s");
    let without = DescriptiveStatistics::compute(&[1.0, 3.0, 5.0], "s");
    assert_eq!(with_nan.size(), without.size());
    assert_eq!(with_nan.mean(), without.mean());
    assert_eq!(with_nan.median(), without.median());
    assert_eq!(with_nan.variance(), without.variance());
    assert_eq!(with_nan.standard_error(), without.standard_error());
    assert_eq!(with_nan.skewness(), without.skewness());
    assert_eq!(with_nan.trimmed_mean(), without.trimmed_mean());
}

#[test]
fn test_all_nan_sample_behaves_like_empty() {
    let stats = DescriptiveStatistics::compute(&[f64::NAN, f64::NAN], "s");
    assert_eq!(stats.size(), 0);
    assert!(stats.mean().is_nan());
    assert!(stats.median().is_nan());
}

// =============================================================================
// Quantile Ordering
// =============================================================================

#[test]
fn test_quantile_monotonicity_random_samples() {
    let mut next_rand = lcg_stream(42);
    for round in 0..50 {
        let n = 20 + round * 3;
        let sample: Vec<f64> = (0..n).map(|_| next_rand() * 100.0).collect();
        let stats = DescriptiveStatistics::compute(&sample, "s");

        assert!(stats.lower_quartile() <= stats.median(), "round {round}");
        assert!(stats.median() <= stats.upper_quartile(), "round {round}");
        assert!(stats.percentile5() <= stats.percentile95(), "round {round}");
        assert!(stats.percentile5() <= stats.lower_quartile(), "round {round}");
        assert!(stats.upper_quartile() <= stats.percentile95(), "round {round}");
    }
}

#[test]
fn test_quantiles_match_sorted_reference() {
    let mut next_rand = lcg_stream(7);
    let sample: Vec<f64> = (0..200).map(|_| next_rand() * 10.0).collect();
    let stats = DescriptiveStatistics::compute(&sample, "s");

    let mut sorted = sample.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let reference = |p: f64| {
        let pos = 200.0 * p + 0.5;
        let k = pos.floor() as usize;
        let frac = pos - pos.floor();
        sorted[k - 1] + frac * (sorted[k] - sorted[k - 1])
    };

    assert!(approx_eq(stats.median(), reference(0.5), 1e-12));
    assert!(approx_eq(stats.lower_quartile(), reference(0.25), 1e-12));
    assert!(approx_eq(stats.upper_quartile(), reference(0.75), 1e-12));
    assert!(approx_eq(stats.percentile5(), reference(0.05), 1e-12));
    assert!(approx_eq(stats.percentile95(), reference(0.95), 1e-12));
}

// =============================================================================
// Undefined Statistics
// =============================================================================

#[test]
fn test_small_sample_moments_are_nan() {
    let one = DescriptiveStatistics::compute(&[5.0], "one");
    assert!(one.variance().is_nan());
    assert!(one.skewness().is_nan());
    assert!(one.kurtosis().is_nan());
    assert!(approx_eq(one.mean(), 5.0, 1e-12));
    assert!(approx_eq(one.median(), 5.0, 1e-12));

    let two = DescriptiveStatistics::compute(&[1.0, 3.0], "two");
    assert!(!two.variance().is_nan());
    assert!(two.skewness().is_nan());

    let three = DescriptiveStatistics::compute(&[1.0, 3.0, 4.0], "three");
    assert!(!three.skewness().is_nan());
    assert!(three.kurtosis().is_nan());
}

// =============================================================================
// Selection Utilities
// =============================================================================

#[test]
fn test_selection_agrees_with_sort() {
    let mut next_rand = lcg_stream(99);
    let data: Vec<f64> = (0..150).map(|_| next_rand() * 50.0).collect();
    let mut sorted = data.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    for &rank in &[0, 1, 74, 148, 149] {
        let mut work = data.clone();
        assert_eq!(select_nth(&mut work, rank), sorted[rank]);
    }

    let ranks = [3, 10, 75, 120, 149];
    let mut work = data.clone();
    select_ranks(&mut work, &ranks);
    for &rank in &ranks {
        assert_eq!(work[rank], sorted[rank]);
    }
}

#[test]
fn test_trimmed_mean_between_extremes() {
    let mut next_rand = lcg_stream(1234);
    let mut sample: Vec<f64> = (0..100).map(|_| next_rand() * 4.0 + 10.0).collect();
    sample[0] = 1.0e8;
    sample[1] = -1.0e8;
    let stats = DescriptiveStatistics::compute(&sample, "s");
    // The trimmed mean must ignore both planted extremes.
    assert!(stats.trimmed_mean() > 9.0 && stats.trimmed_mean() < 15.0);
}
