// =============================================================================
// Shared types used across the dashboard backend
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily price row for one listed stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

/// Company name lookup for a stock code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub code: String,
    pub name: String,
}

/// Which end of the daily percentage-change ranking to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Gainers,
    Decliners,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gainers => write!(f, "Gainers"),
            Self::Decliners => write!(f, "Decliners"),
        }
    }
}

/// A stock ranked by its latest one-session move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverRow {
    pub code: String,
    /// Percentage change versus the previous session, two decimals.
    pub percentage: f64,
    pub close: f64,
    pub company: Option<String>,
}

/// Average close of one stock over a date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageCloseRow {
    pub code: String,
    pub avg_close: f64,
}

/// Close-to-close move of one stock across a date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalChangeRow {
    pub code: String,
    pub first_close: f64,
    pub last_close: f64,
    /// Percentage change from first to last close, two decimals.
    pub percentage: f64,
}

/// Round half away from zero to two decimals, as SQL `ROUND(x, 2)` does.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(-2.5049), -2.5);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn stock_row_volume_defaults() {
        let json = r#"{ "code": "KO", "date": "2025-02-03", "open": 60.1, "high": 61.0, "low": 59.8, "close": 60.5 }"#;
        let row: StockRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.volume, 0);
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Gainers.to_string(), "Gainers");
        assert_eq!(Direction::Decliners.to_string(), "Decliners");
    }
}
