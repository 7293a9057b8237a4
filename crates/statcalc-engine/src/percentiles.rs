//! Percentiles of sorted data.

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the two closest ranks: the value sits
/// at fractional rank `p / 100 * (n - 1)` of the sorted data. This matches
/// the common "linear" definition used by spreadsheet and numeric packages,
/// so the 50th percentile always equals the median.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use statcalc_engine::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// assert_eq!(compute_percentile(&values, 75.0), 7.75);
/// assert_eq!(compute_percentile(&values, 0.0), 1.0);
/// assert_eq!(compute_percentile(&values, 100.0), 10.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return f64::NAN;
    };
    let rank = (percentile / 100.0).clamp(0.0, 1.0) * last as f64;
    let lower = (rank.floor() as usize).min(last);
    let upper = (rank.ceil() as usize).min(last);
    let fraction = rank - lower as f64;
    sorted_values[lower] + fraction * (sorted_values[upper] - sorted_values[lower])
}
