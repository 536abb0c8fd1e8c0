// =============================================================================
// Candlestick Geometry Engine
// =============================================================================
//
// Maps a sequence of OHLC records into pixel-space primitives:
//
//   - 5 horizontal grid lines at the 0/25/50/75/100% points of the price range
//   - one wick (high → low) and one body (open → close) per valid record
//
// Every price goes through `PriceScale::price_to_y`, so grid, wicks and
// bodies always share one scale. Degenerate inputs (flat series, a single
// record, padding larger than the canvas) produce defined output; the only
// reported condition is an empty dataset.

use serde::Serialize;
use thiserror::Error;

use super::config::RenderConfig;
use super::record::{filter_valid, OhlcRecord};

/// Price points at which grid lines are drawn, as a fraction of the range.
pub const GRID_RATIOS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

pub const MIN_CANDLE_WIDTH: f64 = 2.0;
pub const MAX_CANDLE_WIDTH: f64 = 20.0;

/// Minimum body height so a doji (open == close) stays visible.
pub const MIN_BODY_HEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Nothing to draw: the input was empty (`total == 0`) or every one of
    /// the `total` records failed validation.
    #[error("empty dataset ({total} records, none drawable)")]
    EmptyDataset { total: usize },
}

impl ChartError {
    /// Short message for the placeholder a surface shows instead of a chart.
    pub fn placeholder_text(&self) -> &'static str {
        match self {
            Self::EmptyDataset { total: 0 } => "No data",
            Self::EmptyDataset { .. } => "Invalid data",
        }
    }
}

// =============================================================================
// Price scale
// =============================================================================

/// Affine price → y mapping for one chart.
///
/// `[min_price, max_price]` maps onto `[padding + chart_height, padding]`:
/// higher prices sit higher on screen (smaller y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceScale {
    pub min_price: f64,
    pub max_price: f64,
    /// `max_price - min_price`, or 1 when the series is flat.
    pub price_range: f64,
    pub padding: f64,
    pub chart_height: f64,
}

impl PriceScale {
    pub fn new(min_price: f64, max_price: f64, padding: f64, chart_height: f64) -> Self {
        let span = max_price - min_price;
        let price_range = if span == 0.0 { 1.0 } else { span };
        Self {
            min_price,
            max_price,
            price_range,
            padding,
            chart_height,
        }
    }

    /// Fit a scale to the lowest low and highest high of `records`.
    /// Returns `None` for an empty slice.
    pub fn fit(records: &[&OhlcRecord], padding: f64, chart_height: f64) -> Option<Self> {
        let first = records.first()?;
        let (min_price, max_price) = records
            .iter()
            .fold((first.low, first.high), |(lo, hi), r| {
                (lo.min(r.low), hi.max(r.high))
            });
        Some(Self::new(min_price, max_price, padding, chart_height))
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        self.padding + self.chart_height
            - ((price - self.min_price) / self.price_range) * self.chart_height
    }

    /// Observed spread of the data. Zero for a flat series, unlike
    /// `price_range`.
    pub fn span(&self) -> f64 {
        self.max_price - self.min_price
    }
}

// =============================================================================
// Output primitives
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLine {
    pub ratio: f64,
    pub price: f64,
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    /// Price with two decimals; `None` when labels are disabled.
    pub label: Option<String>,
}

/// Vertical high → low segment. `y_high <= y_low` for ordered records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WickSegment {
    pub x: f64,
    pub y_high: f64,
    pub y_low: f64,
}

/// Open/close rectangle, `(x, y)` being its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlePrimitive {
    pub time: String,
    pub volume: Option<u64>,
    /// Horizontal center of the candle.
    pub x: f64,
    pub bullish: bool,
    pub color: String,
    pub wick: WickSegment,
    pub body: BodyRect,
}

/// Everything a surface needs to draw one candlestick chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub chart_width: f64,
    pub chart_height: f64,
    pub scale: PriceScale,
    pub candle_width: f64,
    pub grid_color: String,
    pub grid_opacity: f64,
    pub grid_lines: Vec<GridLine>,
    pub candles: Vec<CandlePrimitive>,
    /// Input records dropped by validation.
    pub skipped: usize,
}

// =============================================================================
// Layout helpers
// =============================================================================

/// Body width for `count` candles, clamped to `[2, 20]` px.
pub fn candle_width(chart_width: f64, count: usize, ratio: f64) -> f64 {
    let slot = chart_width / count.max(1) as f64;
    (slot * ratio).clamp(MIN_CANDLE_WIDTH, MAX_CANDLE_WIDTH)
}

/// Center x of the `index`-th of `count` candles. A lone candle sits in the
/// middle of the plot area.
pub fn candle_x(index: usize, count: usize, padding: f64, chart_width: f64) -> f64 {
    if count <= 1 {
        padding + chart_width / 2.0
    } else {
        padding + (index as f64 / (count - 1) as f64) * chart_width
    }
}

fn grid_lines(scale: &PriceScale, config: &RenderConfig) -> Vec<GridLine> {
    if !config.show_grid {
        return Vec::new();
    }
    // A flat series keeps all five lines on the single observed price.
    let span = scale.span();
    GRID_RATIOS
        .iter()
        .map(|&ratio| {
            let price = scale.min_price + span * ratio;
            GridLine {
                ratio,
                price,
                y: scale.price_to_y(price),
                x1: config.padding,
                x2: config.width - config.padding,
                label: config.show_price_labels.then(|| format!("{price:.2}")),
            }
        })
        .collect()
}

fn candle_primitive(
    record: &OhlcRecord,
    x: f64,
    width: f64,
    scale: &PriceScale,
    config: &RenderConfig,
) -> CandlePrimitive {
    let bullish = record.is_bullish();
    let color = if bullish {
        config.bullish_color.clone()
    } else {
        config.bearish_color.clone()
    };

    let y_open = scale.price_to_y(record.open);
    let y_close = scale.price_to_y(record.close);

    CandlePrimitive {
        time: record.time.clone(),
        volume: record.volume,
        x,
        bullish,
        color,
        wick: WickSegment {
            x,
            y_high: scale.price_to_y(record.high),
            y_low: scale.price_to_y(record.low),
        },
        body: BodyRect {
            x: x - width / 2.0,
            y: y_open.min(y_close),
            width,
            height: (y_close - y_open).abs().max(MIN_BODY_HEIGHT),
        },
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Compute the chart geometry for `records` under `config`.
///
/// Invalid records are skipped. Returns `ChartError::EmptyDataset` when no
/// record survives validation.
pub fn compute_geometry(
    records: &[OhlcRecord],
    config: &RenderConfig,
) -> Result<ChartGeometry, ChartError> {
    let valid = filter_valid(records);
    let chart_width = config.chart_width();
    let chart_height = config.chart_height();

    let scale = PriceScale::fit(&valid, config.padding, chart_height).ok_or(
        ChartError::EmptyDataset {
            total: records.len(),
        },
    )?;

    let count = valid.len();
    let width = candle_width(chart_width, count, config.candle_width_ratio);

    let candles = valid
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let x = candle_x(i, count, config.padding, chart_width);
            candle_primitive(record, x, width, &scale, config)
        })
        .collect();

    Ok(ChartGeometry {
        width: config.width,
        height: config.height,
        padding: config.padding,
        chart_width,
        chart_height,
        scale,
        candle_width: width,
        grid_color: config.grid_color.clone(),
        grid_opacity: config.grid_opacity,
        grid_lines: grid_lines(&scale, config),
        candles,
        skipped: records.len() - count,
    })
}
