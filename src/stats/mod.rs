//! Descriptive statistics and the order-statistic selection they build on.

mod descriptive;
pub mod selection;

pub use descriptive::DescriptiveStatistics;
pub use selection::{select_nth, select_ranks, sum_of_smallest};
