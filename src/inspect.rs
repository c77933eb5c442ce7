//! Frequency-range views over a Good-Turing table.

use crate::good_turing::GoodTuringRow;

/// Resolves optional bounds against the largest frequency present in `rows`.
///
/// A missing lower bound is 0. A missing upper bound, or one below `lower` or above the
/// maximum frequency, becomes the maximum frequency.
#[must_use]
pub fn resolve_bounds(
    rows: &[GoodTuringRow],
    lower: Option<usize>,
    upper: Option<usize>,
) -> (usize, usize) {
    let max = rows.iter().map(|row| row.frequency).max().unwrap_or(0);
    let lower = lower.unwrap_or(0);
    let upper = match upper {
        Some(upper) if upper >= lower && upper <= max => upper,
        _ => max,
    };
    (lower, upper)
}

/// Rows whose frequency lies within the resolved `[lower, upper]` window.
#[must_use]
pub fn frequency_window(
    rows: &[GoodTuringRow],
    lower: Option<usize>,
    upper: Option<usize>,
) -> Vec<GoodTuringRow> {
    let (lower, upper) = resolve_bounds(rows, lower, upper);
    rows.iter()
        .filter(|row| (lower..=upper).contains(&row.frequency))
        .copied()
        .collect()
}
