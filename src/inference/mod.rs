//! Statistical inference (significance tests, confidence intervals).


pub use t_test::{one_sample_t_test, two_sample_t_test, TTestResult, VarianceAssumption};
