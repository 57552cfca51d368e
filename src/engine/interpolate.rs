//! # engine::interpolate
//!
//! Places a price between the discrete rows of a display window.
//!
//! Positions are always computed against the **ascending** price order the
//! pipeline emits.  Widgets that draw the highest strike on top use
//! [`mirrored`] to flip the result instead of interpolating a second time.

/// Sentinel for "this level cannot be placed".
pub const NOT_APPLICABLE: f64 = -1.0;

/// Fractional row index of `target` within ascending `ordered_prices`.
///
/// * absent / non-finite target, or no rows → [`NOT_APPLICABLE`]
/// * below every row → `0`; above every row → last index
/// * exactly on a row → that row's index
/// * otherwise linear between the two bracketing rows
pub fn position(target: Option<f64>, ordered_prices: &[f64]) -> f64 {
    let Some(target) = target.filter(|t| t.is_finite()) else {
        return NOT_APPLICABLE;
    };

    let lower = ordered_prices.iter().rposition(|&p| p <= target);
    let upper = ordered_prices.iter().position(|&p| p >= target);

    match (lower, upper) {
        (None, None) => NOT_APPLICABLE,
        (None, Some(u)) => u as f64,
        (Some(l), None) => l as f64,
        (Some(l), Some(u)) => {
            let (low_price, high_price) = (ordered_prices[l], ordered_prices[u]);
            // Equal bracketing prices only happen on an exact hit; with
            // duplicated rows the first one wins.
            if high_price == low_price {
                return l.min(u) as f64;
            }
            l as f64 + (target - low_price) / (high_price - low_price)
        }
    }
}

/// Converts an ascending index into a top-down row index for `rows` rows.
pub fn mirrored(index: f64, rows: usize) -> f64 {
    if index < 0.0 || rows == 0 {
        return NOT_APPLICABLE;
    }
    (rows - 1) as f64 - index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_absent_target() {
        assert_eq!(position(None, &[1.0, 2.0]), NOT_APPLICABLE);
        assert_eq!(position(Some(f64::NAN), &[1.0, 2.0]), NOT_APPLICABLE);
    }

    #[test]
    fn test_empty_prices() {
        assert_eq!(position(Some(100.0), &[]), NOT_APPLICABLE);
    }

    #[test]
    fn test_exact_match_returns_index() {
        let prices = [95.0, 100.0, 105.0, 110.0, 115.0];
        for (i, &p) in prices.iter().enumerate() {
            assert_eq!(position(Some(p), &prices), i as f64);
        }
    }

    #[test]
    fn test_between_rows_is_proportional() {
        assert_close(position(Some(106.0), &[105.0, 110.0]), 0.2);

        let prices = [100.0, 105.0, 110.0, 120.0];
        let pos = position(Some(112.5), &prices);
        assert_close(pos, 2.25);
        assert!(pos > 2.0 && pos < 3.0);
    }

    #[test]
    fn test_outside_window_clamps() {
        let prices = [100.0, 105.0, 110.0];
        assert_eq!(position(Some(90.0), &prices), 0.0);
        assert_eq!(position(Some(130.0), &prices), 2.0);
    }

    #[test]
    fn test_duplicate_rows_do_not_divide_by_zero() {
        let prices = [100.0, 105.0, 105.0, 110.0];
        assert_eq!(position(Some(105.0), &prices), 1.0);
    }

    #[test]
    fn test_mirrored() {
        assert_close(mirrored(0.2, 2), 0.8);
        assert_eq!(mirrored(0.0, 5), 4.0);
        assert_eq!(mirrored(NOT_APPLICABLE, 5), NOT_APPLICABLE);
        assert_eq!(mirrored(0.0, 0), NOT_APPLICABLE);
    }
}
