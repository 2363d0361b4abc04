//! Descriptive statistics over raw numeric samples.
//!
//! Computes location, dispersion and shape measures in a fixed number of
//! passes: one accumulation pass for the mean, one pass over centered values
//! for the 2nd/3rd/4th central power sums, and a single combined
//! order-statistic selection for all five percentiles and the trimmed-mean
//! window.
//!
//! NaN entries are filtered before anything else, so a sample containing
//! NaN is treated exactly like the same sample with those entries removed.
//! Statistics that are undefined for the (filtered) sample size are NaN,
//! never errors: skewness needs n > 2, excess kurtosis n > 3, and a
//! percentile is NaN whenever its interpolation position falls outside the
//! sample.

use crate::stats::selection::select_ranks;

/// An immutable snapshot of sample summaries.
///
/// All fields are frozen at construction by [`DescriptiveStatistics::compute`];
/// the input slice is never mutated (filtering and selection work on an
/// internal copy).
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStatistics {
    name: String,
    size: usize,
    mean: f64,
    trimmed_mean: f64,
    median: f64,
    lower_quartile: f64,
    upper_quartile: f64,
    interquartile_range: f64,
    percentile5: f64,
    percentile95: f64,
    variance: f64,
    standard_deviation: f64,
    standard_error: f64,
    skewness: f64,
    kurtosis: f64,
}

/// 1-based interpolation position of the p-th quantile in a sample of
/// size n: `n*p + 0.5`.
fn quantile_position(n: usize, p: f64) -> f64 {
    n as f64 * p + 0.5
}

impl DescriptiveStatistics {
    /// Compute all summaries for `sample`, ignoring NaN entries.
    ///
    /// `name` is a caller-supplied label carried along with the snapshot
    /// (sample identifiers in batch processing).
    pub fn compute(sample: &[f64], name: &str) -> Self {
        let values: Vec<f64> = sample.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = values.len();

        let mean = if n > 0 {
            values.iter().sum::<f64>() / n as f64
        } else {
            f64::NAN
        };

        // Central power sums in one pass over centered values.
        let mut sum2 = 0.0;
        let mut sum3 = 0.0;
        let mut sum4 = 0.0;
        for &v in &values {
            let d = v - mean;
            let d2 = d * d;
            sum2 += d2;
            sum3 += d2 * d;
            sum4 += d2 * d2;
        }

        let nf = n as f64;
        let variance = if n > 1 { sum2 / (nf - 1.0) } else { f64::NAN };
        let standard_deviation = variance.sqrt();
        let standard_error = if n > 0 {
            standard_deviation / nf.sqrt()
        } else {
            f64::NAN
        };

        let skewness = if n > 2 {
            let s3 = standard_deviation.powi(3);
            nf / ((nf - 1.0) * (nf - 2.0)) * sum3 / s3
        } else {
            f64::NAN
        };

        let kurtosis = if n > 3 {
            let s4 = variance * variance;
            nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum4 / s4
                - 3.0 * (nf - 1.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
        } else {
            f64::NAN
        };

        let (percentile5, lower_quartile, median, upper_quartile, percentile95, trimmed_mean) =
            Self::order_statistics(values);

        let interquartile_range = upper_quartile - lower_quartile;

        DescriptiveStatistics {
            name: name.to_owned(),
            size: n,
            mean,
            trimmed_mean,
            median,
            lower_quartile,
            upper_quartile,
            interquartile_range,
            percentile5,
            percentile95,
            variance,
            standard_deviation,
            standard_error,
            skewness,
            kurtosis,
        }
    }

    /// All five percentiles and the 5/95 trimmed mean from one combined
    /// multi-rank selection over the (NaN-free) working buffer.
    fn order_statistics(mut values: Vec<f64>) -> (f64, f64, f64, f64, f64, f64) {
        let n = values.len();
        if n == 0 {
            return (f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        }

        let probs = [0.05, 0.25, 0.5, 0.75, 0.95];
        let mut ranks: Vec<usize> = Vec::with_capacity(2 * probs.len());
        for &p in &probs {
            let pos = quantile_position(n, p);
            let lower = pos.floor() as i64;
            // Both interpolation neighbours must be placed.
            for rank_1b in [lower, lower + 1] {
                if rank_1b >= 1 && rank_1b <= n as i64 {
                    ranks.push((rank_1b - 1) as usize);
                }
            }
        }
        select_ranks(&mut values, &ranks);

        let q = |p: f64| -> f64 { Self::interpolated(&values, p) };
        let p5 = q(0.05);
        let q1 = q(0.25);
        let med = q(0.5);
        let q3 = q(0.75);
        let p95 = q(0.95);

        // Trimmed mean: arithmetic mean over the inclusive 5th..95th
        // percentile rank window. When a position falls outside the sample
        // the window is clamped, so small samples degenerate to the plain
        // mean.
        let lo = ((quantile_position(n, 0.05).floor() as i64) - 1).max(0) as usize;
        let hi_pos = quantile_position(n, 0.95);
        let hi_rank = if hi_pos.fract() == 0.0 {
            hi_pos as i64
        } else {
            hi_pos.ceil() as i64
        };
        let hi = ((hi_rank - 1).max(0) as usize).min(n - 1);
        let window = &values[lo..=hi];
        let trimmed_mean = window.iter().sum::<f64>() / window.len() as f64;

        (p5, q1, med, q3, p95, trimmed_mean)
    }

    /// Linear interpolation at position `n*p + 0.5` over a buffer whose
    /// relevant ranks have been placed by selection. NaN when the position
    /// has no defined neighbours in the sample.
    fn interpolated(placed: &[f64], p: f64) -> f64 {
        let n = placed.len();
        let pos = quantile_position(n, p);
        let lower = pos.floor() as i64;
        let frac = pos - pos.floor();

        if lower < 1 {
            return f64::NAN;
        }
        if frac == 0.0 {
            if lower > n as i64 {
                return f64::NAN;
            }
            return placed[(lower - 1) as usize];
        }
        if lower + 1 > n as i64 {
            return f64::NAN;
        }
        let a = placed[(lower - 1) as usize];
        let b = placed[lower as usize];
        a + frac * (b - a)
    }

    /// Caller-supplied sample label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values after NaN filtering.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Mean over the inclusive 5th..95th percentile window.
    pub fn trimmed_mean(&self) -> f64 {
        self.trimmed_mean
    }

    /// 50th percentile.
    pub fn median(&self) -> f64 {
        self.median
    }

    /// 25th percentile.
    pub fn lower_quartile(&self) -> f64 {
        self.lower_quartile
    }

    /// 75th percentile.
    pub fn upper_quartile(&self) -> f64 {
        self.upper_quartile
    }

    /// Q3 - Q1.
    pub fn interquartile_range(&self) -> f64 {
        self.interquartile_range
    }

    /// 5th percentile.
    pub fn percentile5(&self) -> f64 {
        self.percentile5
    }

    /// 95th percentile.
    pub fn percentile95(&self) -> f64 {
        self.percentile95
    }

    /// Sample variance (n - 1 denominator).
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Sample standard deviation.
    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    /// Standard error of the mean.
    pub fn standard_error(&self) -> f64 {
        self.standard_error
    }

    /// Adjusted Fisher-Pearson skewness; NaN for n <= 2.
    pub fn skewness(&self) -> f64 {
        self.skewness
    }

    /// Bias-corrected excess kurtosis; NaN for n <= 3.
    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }
}
