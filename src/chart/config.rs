// =============================================================================
// Render Configuration
// =============================================================================
//
// Flat set of named chart options. Every field carries a serde default so a
// partial JSON object (or none at all) still yields a usable config.

use serde::{Deserialize, Serialize};

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    350.0
}

fn default_padding() -> f64 {
    40.0
}

fn default_bullish_color() -> String {
    "rgb(34, 197, 94)".to_string()
}

fn default_bearish_color() -> String {
    "rgb(239, 68, 68)".to_string()
}

fn default_grid_color() -> String {
    "currentColor".to_string()
}

fn default_grid_opacity() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_candle_width_ratio() -> f64 {
    0.6
}

/// Presentation options for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_width")]
    pub width: f64,

    /// Canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: f64,

    /// Uniform inset on all four sides. The plot area collapses when
    /// `2 * padding` reaches the width or height.
    #[serde(default = "default_padding")]
    pub padding: f64,

    /// Color of candles closing at or above their open.
    #[serde(default = "default_bullish_color")]
    pub bullish_color: String,

    /// Color of candles closing below their open.
    #[serde(default = "default_bearish_color")]
    pub bearish_color: String,

    #[serde(default = "default_grid_color")]
    pub grid_color: String,

    #[serde(default = "default_grid_opacity")]
    pub grid_opacity: f64,

    #[serde(default = "default_true")]
    pub show_grid: bool,

    #[serde(default = "default_true")]
    pub show_price_labels: bool,

    /// Share of each candle slot taken by the body, in (0, 1].
    #[serde(default = "default_candle_width_ratio")]
    pub candle_width_ratio: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: default_padding(),
            bullish_color: default_bullish_color(),
            bearish_color: default_bearish_color(),
            grid_color: default_grid_color(),
            grid_opacity: default_grid_opacity(),
            show_grid: true,
            show_price_labels: true,
            candle_width_ratio: default_candle_width_ratio(),
        }
    }
}

impl RenderConfig {
    /// Width of the plot area inside the padding. May be zero or negative.
    pub fn chart_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    /// Height of the plot area inside the padding. May be zero or negative.
    pub fn chart_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_chart() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.width, 800.0);
        assert_eq!(cfg.height, 350.0);
        assert_eq!(cfg.padding, 40.0);
        assert_eq!(cfg.bullish_color, "rgb(34, 197, 94)");
        assert_eq!(cfg.bearish_color, "rgb(239, 68, 68)");
        assert!(cfg.show_grid);
        assert!(cfg.show_price_labels);
        assert!((cfg.candle_width_ratio - 0.6).abs() < f64::EPSILON);
        assert!((cfg.grid_opacity - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_json_uses_defaults() {
        let cfg: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RenderConfig::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: RenderConfig =
            serde_json::from_str(r#"{ "width": 900, "padding": 50, "show_grid": false }"#).unwrap();
        assert_eq!(cfg.width, 900.0);
        assert_eq!(cfg.padding, 50.0);
        assert!(!cfg.show_grid);
        assert_eq!(cfg.height, 350.0);
        assert_eq!(cfg.chart_width(), 800.0);
        assert_eq!(cfg.chart_height(), 250.0);
    }

    #[test]
    fn oversized_padding_gives_negative_plot_area() {
        let cfg = RenderConfig {
            padding: 500.0,
            ..RenderConfig::default()
        };
        assert!(cfg.chart_width() < 0.0);
        assert!(cfg.chart_height() < 0.0);
    }
}
