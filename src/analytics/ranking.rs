// =============================================================================
// Interval Rankings
// =============================================================================
//
// Per-code aggregates over an inclusive date window, highest first: average
// close, and the percentage move from the first to the last close.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{round2, AverageCloseRow, IntervalChangeRow, StockRow};

/// Default window start when none is supplied.
pub fn default_interval_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub const DEFAULT_TOP_K: usize = 10;

/// Calendar day (UTC) of an epoch-millisecond timestamp.
pub fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Inclusive `[start, end]` date window plus result size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub k: usize,
}

impl IntervalWindow {
    /// Resolve optional epoch-millisecond bounds. Missing bounds fall back to
    /// 2025-01-01 and `today`; a missing `k` to 10.
    ///
    /// Fails with a message when a timestamp is out of range, `k` is zero or
    /// above `max_k`, or the window is inverted.
    pub fn from_millis(
        start: Option<i64>,
        end: Option<i64>,
        k: Option<usize>,
        today: NaiveDate,
        max_k: usize,
    ) -> Result<Self, String> {
        let start = match start {
            Some(ms) => date_from_millis(ms).ok_or_else(|| format!("start out of range: {ms}"))?,
            None => default_interval_start(),
        };
        let end = match end {
            Some(ms) => date_from_millis(ms).ok_or_else(|| format!("end out of range: {ms}"))?,
            None => today,
        };
        let k = k.unwrap_or(DEFAULT_TOP_K);

        if k == 0 || k > max_k {
            return Err(format!("k must be between 1 and {max_k}, got {k}"));
        }
        if start > end {
            return Err(format!("start {start} is after end {end}"));
        }
        Ok(Self { start, end, k })
    }
}

/// Top `k` codes by average close within `[start, end]`.
pub fn interval_close_top_k(
    rows: &[StockRow],
    start: NaiveDate,
    end: NaiveDate,
    k: usize,
) -> Vec<AverageCloseRow> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.date >= start && r.date <= end) {
        let entry = sums.entry(row.code.as_str()).or_insert((0.0, 0));
        entry.0 += row.close;
        entry.1 += 1;
    }

    let mut averages: Vec<AverageCloseRow> = sums
        .into_iter()
        .map(|(code, (sum, n))| AverageCloseRow {
            code: code.to_string(),
            avg_close: round2(sum / n as f64),
        })
        .collect();

    averages.sort_by(|a, b| {
        b.avg_close
            .total_cmp(&a.avg_close)
            .then_with(|| a.code.cmp(&b.code))
    });
    averages.truncate(k);
    averages
}

/// Top `k` codes by percentage change between their first and last close
/// within `[start, end]`. Codes whose first close is zero are left out.
pub fn interval_change_top_k(
    rows: &[StockRow],
    start: NaiveDate,
    end: NaiveDate,
    k: usize,
) -> Vec<IntervalChangeRow> {
    // code -> ((first date, first close), (last date, last close))
    let mut bounds: BTreeMap<&str, ((NaiveDate, f64), (NaiveDate, f64))> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.date >= start && r.date <= end) {
        let point = (row.date, row.close);
        bounds
            .entry(row.code.as_str())
            .and_modify(|(first, last)| {
                if point.0 < first.0 {
                    *first = point;
                }
                if point.0 > last.0 {
                    *last = point;
                }
            })
            .or_insert((point, point));
    }

    let mut changes: Vec<IntervalChangeRow> = bounds
        .into_iter()
        .filter(|(_, ((_, first), _))| *first != 0.0)
        .map(|(code, ((_, first), (_, last)))| IntervalChangeRow {
            code: code.to_string(),
            first_close: first,
            last_close: last,
            percentage: round2((last - first) / first * 100.0),
        })
        .collect();

    changes.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.code.cmp(&b.code))
    });
    changes.truncate(k);
    changes
}
