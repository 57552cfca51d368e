//! # engine::format
//!
//! Text shown next to bars and lines: compact net-GEX totals and price labels.

use crate::models::{Sign, SumReading};

/// Prices at or above this are labelled without decimals.
const WHOLE_PRICE_FROM: f64 = 2000.0;

/// Rounds half-way cases towards +∞, so `-12.5` becomes `-12`.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// One decimal place; ties go away from zero, the way `toFixed(1)` does.
fn tenths(value: f64) -> String {
    let rounded = (value.abs() * 10.0 + 0.5).floor() / 10.0;
    if value < 0.0 {
        format!("-{rounded:.1}")
    } else {
        format!("{rounded:.1}")
    }
}

fn whole(value: f64) -> String {
    // `as i64` also folds -0.0 into "0"
    format!("{}", round_half_up(value) as i64)
}

/// `12_500 → "13K"`, `-1_520 → "-1.5K"`, `412.4 → "412"`.
pub fn compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 10_000.0 {
        format!("{}K", whole(value / 1000.0))
    } else if magnitude >= 1_000.0 {
        format!("{}K", tenths(value / 1000.0))
    } else {
        whole(value)
    }
}

/// `5823.4 → "5823"`, `512.37 → "512.4"`.
pub fn price_label(price: f64) -> String {
    if price < WHOLE_PRICE_FROM {
        tenths(price)
    } else {
        whole(price)
    }
}

pub fn sum_reading(value: Option<f64>) -> Option<SumReading> {
    let value = value.filter(|v| v.is_finite())?;
    let sign = if value > 0.0 {
        Sign::Positive
    } else if value < 0.0 {
        Sign::Negative
    } else {
        Sign::Flat
    };

    Some(SumReading { value, text: compact(value), sign })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_thousands() {
        assert_eq!(compact(12_500.0), "13K");
        assert_eq!(compact(-48_200.0), "-48K");
        assert_eq!(compact(1_520.0), "1.5K");
        assert_eq!(compact(-2_340.0), "-2.3K");
    }

    #[test]
    fn test_tenths_ties_round_away_from_zero() {
        assert_eq!(compact(1_250.0), "1.3K");
        assert_eq!(compact(-2_250.0), "-2.3K");
        assert_eq!(price_label(512.25), "512.3");
        assert_eq!(price_label(100.0), "100.0");
    }

    #[test]
    fn test_compact_small() {
        assert_eq!(compact(412.4), "412");
        assert_eq!(compact(-0.3), "0");
        assert_eq!(compact(999.0), "999");
    }

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(512.37), "512.4");
        assert_eq!(price_label(5823.4), "5823");
        assert_eq!(price_label(21004.6), "21005");
    }

    #[test]
    fn test_sum_reading_sign() {
        assert_eq!(sum_reading(Some(-3.0)).map(|r| r.sign), Some(Sign::Negative));
        assert_eq!(sum_reading(Some(0.0)).map(|r| r.sign), Some(Sign::Flat));
        assert_eq!(sum_reading(Some(5.0)).map(|r| r.sign), Some(Sign::Positive));
        assert_eq!(sum_reading(None), None);
        assert_eq!(sum_reading(Some(f64::NAN)), None);
    }
}
