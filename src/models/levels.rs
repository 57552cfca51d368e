//! # models::levels
//!
//! Named reference price levels drawn as horizontal annotation lines, and the
//! [`AnnotationRange`] they span.
//!
//! Every level is an explicit `Option<f64>`.  gexbot reports a level it has
//! not computed as `null` or `0`, so a level only counts as *present* when it
//! is `Some`, finite and non-zero.

use serde::{Deserialize, Serialize};

use crate::models::strike::{ClassicPayload, StatePayload};

// ─── LevelKind ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    /// Current underlying price.
    Spot,
    ZeroGamma,
    MajorPosVol,
    MajorNegVol,
    /// Secondary source only.
    MajorLongGamma,
    /// Secondary source only.
    MajorShortGamma,
}

impl LevelKind {
    pub const ALL: [LevelKind; 6] = [
        LevelKind::Spot,
        LevelKind::ZeroGamma,
        LevelKind::MajorPosVol,
        LevelKind::MajorNegVol,
        LevelKind::MajorLongGamma,
        LevelKind::MajorShortGamma,
    ];
}

// ─── ReferenceLevels ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLevels {
    pub spot:              Option<f64>,
    pub zero_gamma:        Option<f64>,
    pub major_pos_vol:     Option<f64>,
    pub major_neg_vol:     Option<f64>,
    pub major_long_gamma:  Option<f64>,
    pub major_short_gamma: Option<f64>,
}

impl ReferenceLevels {
    /// Collects levels from the primary payload and, when one was fetched,
    /// the secondary payload.
    pub fn from_payloads(primary: &ClassicPayload, secondary: Option<&StatePayload>) -> Self {
        Self {
            spot:              primary.spot,
            zero_gamma:        primary.zero_gamma,
            major_pos_vol:     primary.major_pos_vol,
            major_neg_vol:     primary.major_neg_vol,
            major_long_gamma:  secondary.and_then(|s| s.major_long_gamma),
            major_short_gamma: secondary.and_then(|s| s.major_short_gamma),
        }
    }

    /// The level's price if it is present.
    pub fn get(&self, kind: LevelKind) -> Option<f64> {
        let raw = match kind {
            LevelKind::Spot            => self.spot,
            LevelKind::ZeroGamma       => self.zero_gamma,
            LevelKind::MajorPosVol     => self.major_pos_vol,
            LevelKind::MajorNegVol     => self.major_neg_vol,
            LevelKind::MajorLongGamma  => self.major_long_gamma,
            LevelKind::MajorShortGamma => self.major_short_gamma,
        };
        raw.filter(|p| p.is_finite() && *p != 0.0)
    }

    pub fn present(&self) -> impl Iterator<Item = (LevelKind, f64)> + '_ {
        LevelKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|price| (kind, price)))
    }

    /// `{min, max}` over every present level; `None` when nothing is present.
    pub fn annotation_range(&self) -> Option<AnnotationRange> {
        self.present().fold(None, |range, (_, price)| {
            Some(match range {
                None => AnnotationRange { min: price, max: price },
                Some(r) => AnnotationRange { min: r.min.min(price), max: r.max.max(price) },
            })
        })
    }
}

#[cfg(test)]
impl ReferenceLevels {
    pub fn spot_only(spot: f64) -> Self {
        Self { spot: Some(spot), ..Self::default() }
    }
}

// ─── AnnotationRange ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRange {
    pub min: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_levels_no_range() {
        assert_eq!(ReferenceLevels::default().annotation_range(), None);
    }

    #[test]
    fn test_zero_and_nan_are_absent() {
        let levels = ReferenceLevels {
            spot:       Some(0.0),
            zero_gamma: Some(f64::NAN),
            ..ReferenceLevels::default()
        };
        assert_eq!(levels.get(LevelKind::Spot), None);
        assert_eq!(levels.get(LevelKind::ZeroGamma), None);
        assert_eq!(levels.annotation_range(), None);
    }

    #[test]
    fn test_range_spans_present_levels() {
        let levels = ReferenceLevels {
            spot:             Some(5810.0),
            zero_gamma:       Some(5790.0),
            major_neg_vol:    Some(5750.0),
            major_long_gamma: Some(5850.0),
            ..ReferenceLevels::default()
        };
        assert_eq!(
            levels.annotation_range(),
            Some(AnnotationRange { min: 5750.0, max: 5850.0 })
        );
        assert_eq!(levels.present().count(), 4);
    }
}
