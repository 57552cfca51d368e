//! # models::chart
//!
//! Per-instance chart configuration: which symbol to poll, where the widget
//! sits on the page, and how wide a strike window to display.

use serde::{Deserialize, Serialize};

/// Levels kept above / below the annotation range when a preset leaves them unset.
pub const DEFAULT_ANNOTATION_PADDING: usize = 5;

const CLASSIC_WEB_URL: &str = "https://www.gexbot.com/classic";

// ─── Position ─────────────────────────────────────────────────────────────────

/// Where the overlay widget is anchored on the charting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPosition {
    Left,
    Right,
}

/// CSS offsets the overlay applies to the widget container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenAnchor {
    pub bottom: &'static str,
    pub left:   &'static str,
}

impl ChartPosition {
    pub fn anchor(&self) -> ScreenAnchor {
        match self {
            ChartPosition::Left  => ScreenAnchor { bottom: "5px", left: "50%" },
            ChartPosition::Right => ScreenAnchor { bottom: "5px", left: "calc(50% + 210px)" },
        }
    }
}

// ─── Window ───────────────────────────────────────────────────────────────────

/// Which anchor the strike window is centred on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Span every present reference level, padded by `levels_above` /
    /// `levels_below`.  Falls back to the spot window when no level is present.
    #[default]
    Annotations,
    /// Always `bar_levels` strikes either side of spot.
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Strikes taken on each side of spot in the spot window.
    pub bar_levels:   usize,
    pub levels_above: usize,
    pub levels_below: usize,
    #[serde(default)]
    pub mode:         WindowMode,
}

// ─── ChartConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// gexbot ticker, e.g. `"ES_SPX"`, `"QQQ"`.
    pub symbol:    String,
    pub position:  ChartPosition,
    pub window:    WindowSpec,
    /// Also poll `state/gamma` and overlay it as the secondary channel.
    #[serde(default = "default_secondary")]
    pub secondary: bool,
}

fn default_secondary() -> bool {
    true
}

impl ChartConfig {
    pub fn new(
        symbol: &str,
        position: ChartPosition,
        bar_levels: usize,
        levels_above: Option<usize>,
        levels_below: Option<usize>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
            window: WindowSpec {
                bar_levels,
                levels_above: levels_above.unwrap_or(DEFAULT_ANNOTATION_PADDING),
                levels_below: levels_below.unwrap_or(DEFAULT_ANNOTATION_PADDING),
                mode:         WindowMode::Annotations,
            },
            secondary: true,
        }
    }

    /// Link to the vendor's classic web view for this symbol.
    pub fn classic_link(&self) -> String {
        format!("{CLASSIC_WEB_URL}#{}#latest", self.symbol)
    }
}
