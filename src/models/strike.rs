//! # models::strike
//!
//! Defines [`Strike`] and the two vendor payloads strikes are pulled out of:
//! [`ClassicPayload`] (`/{symbol}/classic/zero`, the primary source) and
//! [`StatePayload`] (`/{symbol}/state/gamma`, the secondary source).
//!
//! gexbot returns strike rows as heterogeneous JSON arrays such as
//! `[price, gex_vol, gex_oi, [priors...]]`, so rows are read cell by cell
//! instead of through a fixed tuple type.  Rows with a null or non-numeric
//! price or value are dropped here, before any computation sees them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FeedError;

/// Column holding the GEX value in a `classic` strike row.
const CLASSIC_VALUE_COLUMN: usize = 1;

/// Column holding the gamma value in a `state` `mini_contracts` row.
const STATE_VALUE_COLUMN: usize = 3;

// ─── Strike ───────────────────────────────────────────────────────────────────

/// One option-strike row: a price level and the exposure measured there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strike {
    pub price: f64,
    pub value: f64,
}

#[cfg(test)]
impl Strike {
    pub fn new(price: f64, value: f64) -> Self {
        Self { price, value }
    }
}

impl Strike {
    /// Reads the price from column 0 and the value from `value_column`.
    ///
    /// Returns `None` for anything that is not an array or whose cells are
    /// missing, null, non-numeric or non-finite.
    pub fn from_row(row: &Value, value_column: usize) -> Option<Self> {
        let cells = row.as_array()?;
        let price = cells.first()?.as_f64()?;
        let value = cells.get(value_column)?.as_f64()?;

        (price.is_finite() && value.is_finite()).then_some(Self { price, value })
    }
}

fn collect_rows(rows: &[Value], value_column: usize) -> Vec<Strike> {
    rows.iter()
        .filter_map(|row| Strike::from_row(row, value_column))
        .collect()
}

// ─── Classic (primary) ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawClassic {
    strikes:       Option<Vec<Value>>,
    spot:          Option<f64>,
    zero_gamma:    Option<f64>,
    major_pos_vol: Option<f64>,
    major_neg_vol: Option<f64>,
    sum_gex_vol:   Option<f64>,
    sum_gex_oi:    Option<f64>,
}

/// Validated `classic/zero` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicPayload {
    pub strikes:       Vec<Strike>,
    pub spot:          Option<f64>,
    pub zero_gamma:    Option<f64>,
    pub major_pos_vol: Option<f64>,
    pub major_neg_vol: Option<f64>,
    pub sum_gex_vol:   Option<f64>,
    pub sum_gex_oi:    Option<f64>,
}

impl ClassicPayload {
    /// Validates a raw response body.
    ///
    /// A missing, non-array or empty `strikes` collection is a
    /// [`FeedError::DataShape`].  Individual unusable rows are not an error;
    /// they are silently dropped.
    pub fn from_value(value: Value) -> Result<Self, FeedError> {
        let raw: RawClassic = serde_json::from_value(value)
            .map_err(|e| FeedError::DataShape(format!("classic payload: {e}")))?;

        let rows = raw
            .strikes
            .ok_or_else(|| FeedError::DataShape("classic payload has no strikes".into()))?;

        if rows.is_empty() {
            return Err(FeedError::DataShape("classic payload has empty strikes".into()));
        }

        Ok(Self {
            strikes:       collect_rows(&rows, CLASSIC_VALUE_COLUMN),
            spot:          raw.spot,
            zero_gamma:    raw.zero_gamma,
            major_pos_vol: raw.major_pos_vol,
            major_neg_vol: raw.major_neg_vol,
            sum_gex_vol:   raw.sum_gex_vol,
            sum_gex_oi:    raw.sum_gex_oi,
        })
    }
}

// ─── State (secondary) ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawState {
    mini_contracts:    Option<Vec<Value>>,
    major_long_gamma:  Option<f64>,
    major_short_gamma: Option<f64>,
}

/// Validated `state/gamma` response.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePayload {
    /// `mini_contracts` rows as (price, column 3) pairs, in vendor order.
    pub contracts:         Vec<Strike>,
    pub major_long_gamma:  Option<f64>,
    pub major_short_gamma: Option<f64>,
}

impl StatePayload {
    /// Only a missing `mini_contracts` collection is a shape error; an empty
    /// one simply maps every displayed price to zero.
    pub fn from_value(value: Value) -> Result<Self, FeedError> {
        let raw: RawState = serde_json::from_value(value)
            .map_err(|e| FeedError::DataShape(format!("state payload: {e}")))?;

        let rows = raw
            .mini_contracts
            .ok_or_else(|| FeedError::DataShape("state payload has no mini_contracts".into()))?;

        Ok(Self {
            contracts:         collect_rows(&rows, STATE_VALUE_COLUMN),
            major_long_gamma:  raw.major_long_gamma,
            major_short_gamma: raw.major_short_gamma,
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_with_extra_columns() {
        let row = json!([5800.0, -1200.5, 300.0, [1.0, 2.0]]);
        assert_eq!(Strike::from_row(&row, 1), Some(Strike::new(5800.0, -1200.5)));
    }

    #[test]
    fn test_row_with_null_cells_is_dropped() {
        assert_eq!(Strike::from_row(&json!([null, 3.0]), 1), None);
        assert_eq!(Strike::from_row(&json!([5800.0, null]), 1), None);
        assert_eq!(Strike::from_row(&json!([5800.0]), 1), None);
        assert_eq!(Strike::from_row(&json!(null), 1), None);
        assert_eq!(Strike::from_row(&json!(["5800", 1.0]), 1), None);
    }

    #[test]
    fn test_classic_payload_parses_levels() {
        let payload = ClassicPayload::from_value(json!({
            "strikes":     [[100, 5], [105, -3], null, [110, 8]],
            "spot":        106.0,
            "zero_gamma":  null,
            "sum_gex_vol": 12500.0,
        }))
        .unwrap();

        assert_eq!(payload.strikes.len(), 3);
        assert_eq!(payload.spot, Some(106.0));
        assert_eq!(payload.zero_gamma, None);
        assert_eq!(payload.major_pos_vol, None);
        assert_eq!(payload.sum_gex_vol, Some(12500.0));
    }

    #[test]
    fn test_classic_payload_without_strikes() {
        let err = ClassicPayload::from_value(json!({ "spot": 106.0 })).unwrap_err();
        assert!(matches!(err, FeedError::DataShape(_)));

        let err = ClassicPayload::from_value(json!({ "strikes": [] })).unwrap_err();
        assert!(matches!(err, FeedError::DataShape(_)));

        let err = ClassicPayload::from_value(json!({ "strikes": "nope" })).unwrap_err();
        assert!(matches!(err, FeedError::DataShape(_)));
    }

    #[test]
    fn test_state_payload_reads_fourth_column() {
        let payload = StatePayload::from_value(json!({
            "mini_contracts":   [[105, 0, 0, 42.0], [110, 1, 1, null]],
            "major_long_gamma": 108.0,
        }))
        .unwrap();

        assert_eq!(payload.contracts, vec![Strike::new(105.0, 42.0)]);
        assert_eq!(payload.major_long_gamma, Some(108.0));
        assert_eq!(payload.major_short_gamma, None);
    }

    #[test]
    fn test_state_payload_without_contracts() {
        let err = StatePayload::from_value(json!({ "major_long_gamma": 1.0 })).unwrap_err();
        assert!(matches!(err, FeedError::DataShape(_)));
    }
}
