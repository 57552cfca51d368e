//! # engine::axis
//!
//! Symmetric value-axis bounds, computed independently per channel.

use crate::models::ScaledAxis;

/// Headroom applied to the largest magnitude on either side of zero.
pub const AXIS_PADDING: f64 = 1.1;

/// Smallest half-width an axis may have.
const MIN_BOUND: f64 = 1.0;

/// `±max(|min(values ∪ {0})|, max(values ∪ {0})) × 1.1`, never narrower than ±1.
///
/// Non-finite values are ignored; an empty channel yields `{-1, 1}`.
pub fn scale(values: &[f64]) -> ScaledAxis {
    let (lowest, highest) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let negative = lowest.abs() * AXIS_PADDING;
    let positive = highest * AXIS_PADDING;

    ScaledAxis::symmetric(negative.max(positive).max(MIN_BOUND))
}
