//! # layout — which charts a page gets
//!
//! Each supported charting page is identified by a fragment of its URL and
//! mapped to the gexbot symbols shown on it, the side each widget sits on,
//! and its window sizes.  Pages with no preset get no charts.

use crate::models::{ChartConfig, ChartPosition};

struct Preset {
    page:   &'static str,
    charts: &'static [(&'static str, ChartPosition, usize, usize, usize)],
}

/// `(symbol, position, bar_levels, levels_above, levels_below)` per page.
const PRESETS: &[Preset] = &[
    // MES
    Preset {
        page:   "/chart/RwyW88xf/",
        charts: &[("ES_SPX", ChartPosition::Left, 15, 4, 4), ("SPY", ChartPosition::Right, 15, 2, 2)],
    },
    // MNQ
    Preset {
        page:   "/chart/WTxk3Mhm/",
        charts: &[("NQ_NDX", ChartPosition::Left, 25, 5, 5), ("QQQ", ChartPosition::Right, 25, 2, 2)],
    },
    // M2K
    Preset {
        page:   "/chart/2quwgD8W/",
        charts: &[("IWM", ChartPosition::Left, 8, 3, 3), ("RUT", ChartPosition::Right, 8, 2, 2)],
    },
    // GLD
    Preset {
        page:   "/chart/XxfKvVMV/",
        charts: &[("GLD", ChartPosition::Left, 10, 2, 2)],
    },
    // MCL
    Preset {
        page:   "/chart/kkaSjk8Y/",
        charts: &[("USO", ChartPosition::Left, 10, 2, 2)],
    },
];

/// Chart configs for the page at `url`; empty when the page is unknown.
pub fn configs_for_page(url: &str) -> Vec<ChartConfig> {
    PRESETS
        .iter()
        .find(|preset| url.contains(preset.page))
        .map(|preset| {
            preset
                .charts
                .iter()
                .map(|&(symbol, position, bars, above, below)| {
                    ChartConfig::new(symbol, position, bars, Some(above), Some(below))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_page() {
        let configs = configs_for_page("https://www.tradingview.com/chart/WTxk3Mhm/?symbol=CME_MINI%3AMNQ1%21");
        let symbols: Vec<&str> = configs.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["NQ_NDX", "QQQ"]);
        assert_eq!(configs[0].window.bar_levels, 25);
        assert_eq!(configs[1].window.levels_above, 2);
        assert_eq!(configs[1].position, ChartPosition::Right);
    }

    #[test]
    fn test_single_chart_page() {
        let configs = configs_for_page("https://www.tradingview.com/chart/kkaSjk8Y/");
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].symbol, "USO");
    }

    #[test]
    fn test_unknown_page() {
        assert!(configs_for_page("https://www.tradingview.com/chart/abcdef/").is_empty());
    }
}
