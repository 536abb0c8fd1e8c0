// =============================================================================
// Daily Movers — Gainers / Decliners
// =============================================================================
//
// Percentage change of each stock's close against its own previous trading
// row:
//   pct = (close - prev_close) / prev_close * 100
//
// Only rows dated on the latest session across the whole table are ranked.
// A stock with no earlier row, or a previous close of zero, has no defined
// change and is left out.

use std::collections::{BTreeMap, HashMap};

use crate::types::{round2, Direction, MoverRow, StockRow};

/// Latest-session percentage change per code.
///
/// Returns `(code, pct, close)` for every code that traded on the latest
/// date and has a usable previous close. `pct` is unrounded.
pub fn latest_changes(rows: &[StockRow]) -> Vec<(String, f64, f64)> {
    let Some(latest) = rows.iter().map(|r| r.date).max() else {
        return Vec::new();
    };

    let mut by_code: BTreeMap<&str, Vec<&StockRow>> = BTreeMap::new();
    for row in rows {
        by_code.entry(row.code.as_str()).or_default().push(row);
    }

    let mut changes = Vec::new();
    for (code, mut series) in by_code {
        series.sort_by_key(|r| r.date);
        let Some(pos) = series.iter().position(|r| r.date == latest) else {
            continue;
        };
        if pos == 0 {
            continue;
        }
        let prev = series[pos - 1].close;
        let close = series[pos].close;
        if prev == 0.0 {
            continue;
        }
        let pct = (close - prev) / prev * 100.0;
        if pct.is_finite() {
            changes.push((code.to_string(), pct, close));
        }
    }
    changes
}

/// Top `limit` movers in `direction`, with company names joined in.
pub fn movers(
    rows: &[StockRow],
    names: &HashMap<String, String>,
    direction: Direction,
    limit: usize,
) -> Vec<MoverRow> {
    let mut changes = latest_changes(rows);

    changes.sort_by(|a, b| {
        let ord = match direction {
            Direction::Gainers => b.1.total_cmp(&a.1),
            Direction::Decliners => a.1.total_cmp(&b.1),
        };
        ord.then_with(|| a.0.cmp(&b.0))
    });

    changes
        .into_iter()
        .take(limit)
        .map(|(code, pct, close)| MoverRow {
            company: names.get(&code).cloned(),
            percentage: round2(pct),
            close,
            code,
        })
        .collect()
}
