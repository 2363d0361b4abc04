//! Order-statistic selection without full sorts.
//!
//! The quantile and trimming routines in this crate repeatedly need the
//! value that would land at a given index under an ascending sort, for a
//! handful of indices at a time. Quickselect gives each single rank in
//! expected O(n); when several ranks are requested together the recursion
//! partitions between already-placed pivots so the whole set costs one
//! pass instead of one quickselect per rank.
//!
//! After a call, every target index holds its ascending-sort value and all
//! smaller values sit to its left. The surrounding regions are only
//! partially ordered.

use std::cmp::Ordering;

/// Partially sort `values` so that `values[rank]` holds the value a full
/// ascending sort would place there, and return that value.
///
/// All elements left of `rank` are `<=` the returned value, all elements to
/// the right are `>=` it.
///
/// # Panics
///
/// Panics if `rank` is out of `[0, values.len())`.
pub fn select_nth(values: &mut [f64], rank: usize) -> f64 {
    assert!(
        rank < values.len(),
        "selection rank {} out of bounds for sample of size {}",
        rank,
        values.len()
    );
    let (_, nth, _) = values.select_nth_unstable_by(rank, total_cmp);
    *nth
}

/// Place every rank in `ranks` at its ascending-sort position in one pass.
///
/// Equivalent to calling [`select_nth`] for each rank, but the slice is
/// partitioned recursively between already-placed ranks, so shared work is
/// done once. Duplicate ranks collapse; an empty rank set or empty slice is
/// a no-op.
///
/// # Panics
///
/// Panics if any rank is out of `[0, values.len())`.
pub fn select_ranks(values: &mut [f64], ranks: &[usize]) {
    if values.is_empty() && ranks.is_empty() {
        return;
    }
    for &rank in ranks {
        assert!(
            rank < values.len(),
            "selection rank {} out of bounds for sample of size {}",
            rank,
            values.len()
        );
    }
    let mut sorted_ranks: Vec<usize> = ranks.to_vec();
    sorted_ranks.sort_unstable();
    sorted_ranks.dedup();
    if sorted_ranks.is_empty() {
        return;
    }
    select_ranks_within(values, 0, &sorted_ranks);
}

/// Recursive worker: `ranks` are absolute, ascending and unique; `values`
/// is the sub-slice starting at absolute index `offset`.
fn select_ranks_within(values: &mut [f64], offset: usize, ranks: &[usize]) {
    if ranks.is_empty() || values.is_empty() {
        return;
    }
    // Place the middle rank, then recurse into the two untouched regions
    // with the ranks that fall inside each.
    let mid = ranks.len() / 2;
    let pivot_rank = ranks[mid] - offset;
    let (left, _, right) = values.select_nth_unstable_by(pivot_rank, total_cmp);

    let left_ranks = &ranks[..mid];
    let right_ranks = &ranks[mid + 1..];
    select_ranks_within(left, offset, left_ranks);
    select_ranks_within(right, offset + pivot_rank + 1, right_ranks);
}

fn total_cmp(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Sum of the `count` smallest elements of `values`, partially reordering
/// the slice. `count` is clamped to the slice length.
///
/// Used by the trimmed-criterion evaluation of the robust estimators, where
/// a full sort per random start would dominate the search.
pub fn sum_of_smallest(values: &mut [f64], count: usize) -> f64 {
    let n = values.len();
    if n == 0 || count == 0 {
        return 0.0;
    }
    let count = count.min(n);
    if count < n {
        select_nth(values, count - 1);
    }
    values[..count].iter().sum()
}
