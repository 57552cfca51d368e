//! # models::frame
//!
//! [`RenderFrame`] — the immutable, render-ready snapshot produced by one
//! refresh tick and handed to the overlay.  Nothing in a frame is mutated
//! after it is built; the next tick builds a new one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::levels::LevelKind;

// ─── ScaledAxis ───────────────────────────────────────────────────────────────

/// Value-axis bounds, always symmetric about zero so the zero gridline sits in
/// the middle of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledAxis {
    pub min: f64,
    pub max: f64,
}

impl ScaledAxis {
    #[inline]
    pub fn symmetric(bound: f64) -> Self {
        Self { min: -bound, max: bound }
    }
}

// ─── AnnotationPosition ───────────────────────────────────────────────────────

/// Placement of one reference level line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPosition {
    pub kind:         LevelKind,
    /// The level's price, `None` when absent this tick.
    pub price:        Option<f64>,
    /// Fractional index into `ordered_prices` (ascending), or `-1`.
    pub index:        f64,
    /// The same position counted from the top row when the widget draws the
    /// highest strike first, or `-1`.
    pub row_from_top: f64,
    /// Price label drawn next to the line.
    pub text:         Option<String>,
}

impl AnnotationPosition {
    pub fn is_placed(&self) -> bool {
        self.index >= 0.0
    }
}

// ─── SumReading ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Negative,
    Flat,
}

/// A net-GEX total shown in the widget corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumReading {
    pub value: f64,
    /// Compact text, e.g. `"13K"`, `"-1.5K"`, `"412"`.
    pub text:  String,
    pub sign:  Sign,
}

// ─── RenderFrame ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub symbol:               String,
    pub generated_at:         DateTime<Utc>,
    /// Displayed strike prices, strictly ascending.
    pub ordered_prices:       Vec<f64>,
    /// Primary (classic GEX) value per displayed price.
    pub primary_values:       Vec<f64>,
    /// Secondary (state gamma) value per displayed price; zeros when the
    /// secondary source is off or unavailable.
    pub secondary_values:     Vec<f64>,
    pub has_secondary:        bool,
    pub axis_primary:         ScaledAxis,
    pub axis_secondary:       ScaledAxis,
    pub annotation_positions: BTreeMap<LevelKind, AnnotationPosition>,
    pub sum_gex_vol:          Option<SumReading>,
    pub sum_gex_oi:           Option<SumReading>,
}

impl RenderFrame {
    pub fn rows(&self) -> usize {
        self.ordered_prices.len()
    }
}

#[cfg(test)]
impl RenderFrame {
    pub fn annotation(&self, kind: LevelKind) -> Option<&AnnotationPosition> {
        self.annotation_positions.get(&kind)
    }
}
