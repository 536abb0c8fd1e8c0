use serde::{Deserialize, Serialize};

use crate::types::StockRow;

/// One time bucket of price action fed to the chart engine.
///
/// `time` is an opaque ordering key. It is carried through to the output
/// for identity only and never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcRecord {
    pub time: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default)]
    pub volume: Option<u64>,
}

impl OhlcRecord {
    pub fn new(time: impl Into<String>, open: f64, close: f64, high: f64, low: f64) -> Self {
        Self {
            time: time.into(),
            open,
            close,
            high,
            low,
            volume: None,
        }
    }

    /// A record is drawable when all four prices are positive finite numbers.
    ///
    /// The `low <= open/close <= high` ordering is not checked.
    pub fn is_valid(&self) -> bool {
        [self.open, self.close, self.high, self.low]
            .iter()
            .all(|p| *p > 0.0 && p.is_finite())
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

impl From<&StockRow> for OhlcRecord {
    fn from(row: &StockRow) -> Self {
        Self {
            time: row.date.to_string(),
            open: row.open,
            close: row.close,
            high: row.high,
            low: row.low,
            volume: Some(row.volume),
        }
    }
}

/// Keep only drawable records, preserving input order.
pub fn filter_valid(records: &[OhlcRecord]) -> Vec<&OhlcRecord> {
    records.iter().filter(|r| r.is_valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn zero_price_is_invalid() {
        let mut r = OhlcRecord::new("t", 100.0, 101.0, 102.0, 99.0);
        assert!(r.is_valid());
        r.open = 0.0;
        assert!(!r.is_valid());
    }

    #[test]
    fn nan_and_negative_are_invalid() {
        assert!(!OhlcRecord::new("t", f64::NAN, 1.0, 1.0, 1.0).is_valid());
        assert!(!OhlcRecord::new("t", 1.0, 1.0, 1.0, -1.0).is_valid());
        assert!(!OhlcRecord::new("t", 1.0, 1.0, f64::INFINITY, 1.0).is_valid());
    }

    #[test]
    fn unordered_prices_still_valid() {
        // high below low is accepted; only positivity matters.
        let r = OhlcRecord::new("t", 10.0, 12.0, 5.0, 20.0);
        assert!(r.is_valid());
    }

    #[test]
    fn filter_preserves_order() {
        let records = vec![
            OhlcRecord::new("a", 1.0, 2.0, 3.0, 0.5),
            OhlcRecord::new("b", 0.0, 2.0, 3.0, 0.5),
            OhlcRecord::new("c", 2.0, 1.0, 3.0, 0.5),
        ];
        let valid = filter_valid(&records);
        let times: Vec<&str> = valid.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["a", "c"]);
    }

    #[test]
    fn from_stock_row_keeps_volume_and_date() {
        let row = StockRow {
            code: "AAPL".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            open: 170.0,
            high: 175.0,
            low: 168.0,
            close: 172.5,
            volume: 52_000_000,
        };
        let rec = OhlcRecord::from(&row);
        assert_eq!(rec.time, "2025-03-04");
        assert_eq!(rec.volume, Some(52_000_000));
        assert!(rec.is_bullish());
    }
}
