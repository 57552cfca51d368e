//! # engine::pipeline
//!
//! **Chart data pipeline** — turns one tick's vendor payloads into a
//! [`RenderFrame`].
//!
//! ```text
//! FeedPair ──▶ ClassicPayload ──▶ strike_filter::select ──┬─▶ axis::scale (per channel)
//!          └─▶ StatePayload? ─────── price-key lookup ─────┤
//!                                                          └─▶ interpolate::position (per level)
//! ```
//!
//! [`build_frame`] is pure: identical inputs give an identical frame.
//! [`build_from_feed`] adds payload validation in front of it and reports a
//! bad secondary payload as a warning instead of failing the tick.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::engine::{axis, format, interpolate, strike_filter};
use crate::error::FeedError;
use crate::feed::{FeedPair, SecondaryFetch};
use crate::models::{
    AnnotationPosition, ChartConfig, ClassicPayload, LevelKind, ReferenceLevels, RenderFrame,
    StatePayload,
};

/// A frame plus whatever went wrong with the secondary stage.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFrame {
    pub frame:             RenderFrame,
    pub secondary_warning: Option<FeedError>,
}

/// Validates the fetched payloads and builds the frame.
///
/// A primary payload without strikes fails the tick with
/// [`FeedError::DataShape`].  A secondary failure of either kind only drops
/// the secondary channel.
pub fn build_from_feed(
    pair: FeedPair,
    config: &ChartConfig,
    now: DateTime<Utc>,
) -> Result<BuiltFrame, FeedError> {
    let primary = ClassicPayload::from_value(pair.primary)?;

    let (secondary, secondary_warning) = match pair.secondary {
        SecondaryFetch::Skipped => (None, None),
        SecondaryFetch::Fetched(value) => match StatePayload::from_value(value) {
            Ok(state) => (Some(state), None),
            Err(e) => (None, Some(e)),
        },
        SecondaryFetch::Failed(e) => (None, Some(e)),
    };

    if let Some(e) = &secondary_warning {
        warn!(symbol = %config.symbol, error = %e, "Secondary source unavailable — primary only");
    }

    let frame = build_frame(&primary, secondary.as_ref(), config, now);
    Ok(BuiltFrame { frame, secondary_warning })
}

/// Filters, scales and interpolates one refresh.
pub fn build_frame(
    primary: &ClassicPayload,
    secondary: Option<&StatePayload>,
    config: &ChartConfig,
    now: DateTime<Utc>,
) -> RenderFrame {
    let levels = ReferenceLevels::from_payloads(primary, secondary);
    let window = strike_filter::select(&primary.strikes, &levels, &config.window);

    let ordered_prices: Vec<f64> = window.iter().map(|s| s.price).collect();
    let primary_values: Vec<f64> = window.iter().map(|s| s.value).collect();
    let secondary_values = map_secondary(&ordered_prices, secondary);

    let annotation_positions = LevelKind::ALL
        .into_iter()
        .map(|kind| (kind, place(kind, &levels, &ordered_prices)))
        .collect::<BTreeMap<_, _>>();

    debug!(
        symbol  = %config.symbol,
        rows    = ordered_prices.len(),
        placed  = annotation_positions.values().filter(|a| a.is_placed()).count(),
        "Frame built"
    );

    RenderFrame {
        symbol:               config.symbol.clone(),
        generated_at:         now,
        axis_primary:         axis::scale(&primary_values),
        axis_secondary:       axis::scale(&secondary_values),
        has_secondary:        secondary.is_some(),
        ordered_prices,
        primary_values,
        secondary_values,
        annotation_positions,
        sum_gex_vol:          format::sum_reading(primary.sum_gex_vol),
        sum_gex_oi:           format::sum_reading(primary.sum_gex_oi),
    }
}

fn place(kind: LevelKind, levels: &ReferenceLevels, ordered_prices: &[f64]) -> AnnotationPosition {
    let price = levels.get(kind);
    let index = interpolate::position(price, ordered_prices);

    AnnotationPosition {
        kind,
        price,
        index,
        row_from_top: interpolate::mirrored(index, ordered_prices.len()),
        text:         price.map(format::price_label),
    }
}

/// Bit pattern used as an exact price key; `-0.0` and `0.0` share a key.
fn price_key(price: f64) -> u64 {
    if price == 0.0 { 0 } else { price.to_bits() }
}

/// Secondary value at each displayed price, `0` where the secondary source
/// has no row at exactly that price.  Later duplicate rows win.
fn map_secondary(ordered_prices: &[f64], secondary: Option<&StatePayload>) -> Vec<f64> {
    let Some(state) = secondary else {
        return vec![0.0; ordered_prices.len()];
    };

    let by_price: HashMap<u64, f64> = state
        .contracts
        .iter()
        .map(|s| (price_key(s.price), s.value))
        .collect();

    ordered_prices
        .iter()
        .map(|&p| by_price.get(&price_key(p)).copied().unwrap_or(0.0))
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
