// =============================================================================
// Candlestick Chart Module
// =============================================================================
//
// Geometry is computed here as plain values; drawing lives in `svg`. The
// engine holds no state between calls: every chart is re-derived from the
// records and the render config it is given.

pub mod config;
pub mod geometry;
pub mod record;
pub mod svg;

pub use config::RenderConfig;
pub use geometry::{
    compute_geometry, BodyRect, CandlePrimitive, ChartError, ChartGeometry, GridLine, PriceScale,
    WickSegment,
};
pub use record::OhlcRecord;
