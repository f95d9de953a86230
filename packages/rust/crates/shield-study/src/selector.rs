//! Weighted-bucket selection of a variation from a fraction.

use crate::error::StudyError;
use crate::types::VariationSpec;

/// Select the variation whose cumulative-weight bucket contains `fraction`.
///
/// `[0, total_weight)` is split into half-open buckets in table order, each as
/// wide as its variation's weight. The scaled fraction lands in the first
/// bucket whose upper edge is strictly greater than it, so a value sitting
/// exactly on a boundary belongs to the next bucket. Zero-weight entries own
/// an empty bucket and are never chosen.
///
/// # Errors
/// Returns [`StudyError::InvalidArgument`] if the table is empty, every weight
/// is zero, any weight is negative or not finite, the weights sum to
/// infinity, or `fraction` is not in `[0, 1)`.
pub fn choose_from(table: &[VariationSpec], fraction: f64) -> Result<&VariationSpec, StudyError> {
    if table.is_empty() {
        return Err(StudyError::invalid("variation table is empty"));
    }
    if !(0.0..1.0).contains(&fraction) {
        return Err(StudyError::invalid(format!(
            "fraction must be in [0, 1), got {fraction}"
        )));
    }
    if let Some(bad) = table
        .iter()
        .find(|v| !v.weight.is_finite() || v.weight < 0.0)
    {
        return Err(StudyError::invalid(format!(
            "variation '{}' has invalid weight {}",
            bad.name, bad.weight
        )));
    }

    let total: f64 = table.iter().map(|v| v.weight).sum();
    if !total.is_finite() {
        return Err(StudyError::invalid("sum of variation weights overflows"));
    }
    if total <= 0.0 {
        return Err(StudyError::invalid("every variation weight is zero"));
    }

    let target = fraction * total;
    let mut cumulative = 0.0;
    for variation in table {
        cumulative += variation.weight;
        if variation.weight > 0.0 && cumulative > target {
            return Ok(variation);
        }
    }

    // Accumulated rounding can leave the last edge at or below the target.
    table
        .iter()
        .rev()
        .find(|v| v.weight > 0.0)
        .ok_or_else(|| StudyError::invalid("every variation weight is zero"))
}
