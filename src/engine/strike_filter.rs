//! # engine::strike_filter
//!
//! Chooses the contiguous run of strikes a widget displays.
//!
//! ```text
//!  sorted strikes   ─┬─ annotation range present ──▶ [minIdx − below, maxIdx + above)
//!                    ├─ spot only ─────────────────▶ last N below spot ++ first N at/above
//!                    └─ nothing ───────────────────▶ everything
//! ```
//!
//! Every branch returns a slice of the sorted input, so the window is always
//! ascending and gap-free.  Short sides are taken as-is, never padded.

use crate::models::{AnnotationRange, LevelKind, ReferenceLevels, Strike, WindowMode, WindowSpec};

/// Selects the display window for one refresh.
pub fn select(strikes: &[Strike], levels: &ReferenceLevels, window: &WindowSpec) -> Vec<Strike> {
    let mut sorted: Vec<Strike> = strikes
        .iter()
        .copied()
        .filter(|s| s.price.is_finite() && s.value.is_finite())
        .collect();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));

    let range = match window.mode {
        WindowMode::Annotations => levels.annotation_range(),
        WindowMode::Spot        => None,
    };

    if let Some(range) = range {
        return annotation_window(&sorted, range, window.levels_above, window.levels_below).to_vec();
    }

    if let Some(spot) = levels.get(LevelKind::Spot) {
        return spot_window(&sorted, spot, window.bar_levels).to_vec();
    }

    sorted
}

/// Strikes spanning `range`, padded by `below` strikes under its first strike
/// and `above` strikes past its end.
///
/// If no strike reaches `range.min` the window starts at the first strike.
fn annotation_window(
    sorted: &[Strike],
    range: AnnotationRange,
    above: usize,
    below: usize,
) -> &[Strike] {
    let start = sorted
        .iter()
        .position(|s| s.price >= range.min)
        .map_or(0, |i| i.saturating_sub(below));

    let end = sorted
        .iter()
        .position(|s| s.price > range.max)
        .map_or(sorted.len(), |i| (i + above).min(sorted.len()));

    &sorted[start..end]
}

/// The `bar_levels` strikes strictly below `spot` followed by the
/// `bar_levels` strikes at or above it.
fn spot_window(sorted: &[Strike], spot: f64, bar_levels: usize) -> &[Strike] {
    let split = sorted.partition_point(|s| s.price < spot);
    let start = split.saturating_sub(bar_levels);
    let end = (split + bar_levels).min(sorted.len());

    &sorted[start..end]
}

// ─── Tests ────────────────────────────────────────────────────────────────────
