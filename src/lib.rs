// =============================================================================
// Stockboard — stock dashboard backend and candlestick geometry engine
// =============================================================================

pub mod analytics;
pub mod api;
pub mod app_state;
pub mod chart;
pub mod error;
pub mod market_data;
pub mod runtime_config;
pub mod types;
