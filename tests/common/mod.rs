//! Common test utilities and data generators.

/// Simple deterministic "random" stream for reproducible test data.
#[allow(dead_code)]
pub fn lcg_stream(seed: u64) -> impl FnMut() -> f64 {
    let mut state = seed;
    move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    }
}

/// Generate noisy line data: y = intercept + slope * x + noise.
#[allow(dead_code)]
pub fn generate_line_data(
    n_samples: usize,
    intercept: f64,
    slope: f64,
    noise_std: f64,
    seed: u64,
) -> (Vec<f64>, Vec<f64>) {
    let mut next_rand = lcg_stream(seed);
    let mut x = Vec::with_capacity(n_samples);
    let mut y = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let xi = i as f64 * 0.25;
        x.push(xi);
        y.push(intercept + slope * xi + noise_std * next_rand());
    }
    (x, y)
}

/// Replace the last `count` observations with gross vertical outliers.
#[allow(dead_code)]
pub fn inject_outliers(y: &mut [f64], count: usize, magnitude: f64, seed: u64) {
    let mut next_rand = lcg_stream(seed);
    let n = y.len();
    for value in y.iter_mut().skip(n - count) {
        *value = magnitude * (1.0 + next_rand().abs());
    }
}

/// Exact polynomial data for a coefficient vector in ascending-power order.
#[allow(dead_code)]
pub fn generate_polynomial_data(
    n_samples: usize,
    coefficients: &[f64],
    x_step: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(n_samples);
    let mut y = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let xi = i as f64 * x_step;
        let mut yi = 0.0;
        let mut pow = 1.0;
        for &c in coefficients {
            yi += c * pow;
            pow *= xi;
        }
        x.push(xi);
        y.push(yi);
    }
    (x, y)
}

/// Approximate equality check for floating point values.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
