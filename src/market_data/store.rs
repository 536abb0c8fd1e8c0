use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, info};

use crate::types::{Company, StockRow};

// ---------------------------------------------------------------------------
// Seed file layout
// ---------------------------------------------------------------------------

/// JSON seed file: `{ "companies": [...], "prices": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub prices: Vec<StockRow>,
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// StockStore -- thread-safe Stock / Company tables
// ---------------------------------------------------------------------------

/// In-memory stand-in for the `Stock` and `Company` tables.
///
/// Rows are kept per code in a date-ordered map, so one `(code, date)` pair
/// holds at most one row and histories come back oldest-first.
pub struct StockStore {
    prices: RwLock<HashMap<String, BTreeMap<NaiveDate, StockRow>>>,
    companies: RwLock<HashMap<String, Company>>,
}

impl Default for StockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StockStore {
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
            companies: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store from a JSON seed file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed data from {}", path.display()))?;

        let seed: SeedFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse seed data from {}", path.display()))?;

        let store = Self::new();
        for company in seed.companies {
            store.insert_company(company);
        }
        store.insert_rows(seed.prices);

        info!(
            path = %path.display(),
            rows = store.row_count(),
            companies = store.company_count(),
            "seed data loaded"
        );
        Ok(store)
    }

    pub fn insert_company(&self, company: Company) {
        let code = normalize_code(&company.code);
        self.companies.write().insert(
            code.clone(),
            Company {
                code,
                name: company.name,
            },
        );
    }

    /// Insert rows, replacing any existing row with the same code and date.
    pub fn insert_rows(&self, rows: impl IntoIterator<Item = StockRow>) {
        let mut map = self.prices.write();
        let mut inserted = 0usize;
        for mut row in rows {
            row.code = normalize_code(&row.code);
            map.entry(row.code.clone())
                .or_default()
                .insert(row.date, row);
            inserted += 1;
        }
        debug!(inserted, "stock rows inserted");
    }

    /// Most recent trading date across all codes.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        let map = self.prices.read();
        map.values()
            .filter_map(|series| series.keys().next_back().copied())
            .max()
    }

    /// Most recent trading date for one code.
    pub fn latest_date_for(&self, code: &str) -> Option<NaiveDate> {
        let map = self.prices.read();
        map.get(&normalize_code(code))
            .and_then(|series| series.keys().next_back().copied())
    }

    /// Every row dated `date`, ordered by code.
    pub fn rows_on(&self, date: NaiveDate) -> Vec<StockRow> {
        let map = self.prices.read();
        let mut rows: Vec<StockRow> = map
            .values()
            .filter_map(|series| series.get(&date).cloned())
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        rows
    }

    /// Rows for `code` with `start <= date <= end`, oldest first.
    pub fn history(&self, code: &str, start: NaiveDate, end: NaiveDate) -> Vec<StockRow> {
        if start > end {
            return Vec::new();
        }
        let map = self.prices.read();
        match map.get(&normalize_code(code)) {
            Some(series) => series.range(start..=end).map(|(_, r)| r.clone()).collect(),
            None => Vec::new(),
        }
    }

    /// Snapshot of every row, ordered by code then date.
    pub fn all_rows(&self) -> Vec<StockRow> {
        let map = self.prices.read();
        let mut codes: Vec<&String> = map.keys().collect();
        codes.sort();
        codes
            .into_iter()
            .flat_map(|code| map[code].values().cloned())
            .collect()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        let code = normalize_code(code);
        self.prices.read().contains_key(&code) || self.companies.read().contains_key(&code)
    }

    pub fn company_name(&self, code: &str) -> Option<String> {
        self.companies
            .read()
            .get(&normalize_code(code))
            .map(|c| c.name.clone())
    }

    /// Code → name map, as used for left-joining names onto results.
    pub fn company_names(&self) -> HashMap<String, String> {
        self.companies
            .read()
            .values()
            .map(|c| (c.code.clone(), c.name.clone()))
            .collect()
    }

    /// All companies ordered by code.
    pub fn companies(&self) -> Vec<Company> {
        let mut list: Vec<Company> = self.companies.read().values().cloned().collect();
        list.sort_by(|a, b| a.code.cmp(&b.code));
        list
    }

    pub fn company_count(&self) -> usize {
        self.companies.read().len()
    }

    pub fn row_count(&self) -> usize {
        self.prices.read().values().map(BTreeMap::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn row(code: &str, d: u32, close: f64) -> StockRow {
        StockRow {
            code: code.into(),
            date: day(d),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn same_code_and_date_replaces() {
        let store = StockStore::new();
        store.insert_rows(vec![row("AAPL", 2, 100.0), row("aapl", 2, 101.0)]);
        assert_eq!(store.row_count(), 1);
        let hist = store.history("AAPL", day(1), day(31));
        assert_eq!(hist[0].close, 101.0);
        assert_eq!(hist[0].code, "AAPL");
    }

    #[test]
    fn history_is_inclusive_and_ordered() {
        let store = StockStore::new();
        store.insert_rows(vec![row("MSFT", 5, 3.0), row("MSFT", 3, 1.0), row("MSFT", 4, 2.0)]);
        let hist = store.history("msft", day(3), day(4));
        let closes: Vec<f64> = hist.iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![1.0, 2.0]);
        assert!(store.history("MSFT", day(5), day(3)).is_empty());
        assert!(store.history("NOPE", day(1), day(31)).is_empty());
    }

    #[test]
    fn latest_date_and_rows_on() {
        let store = StockStore::new();
        assert_eq!(store.latest_date(), None);
        store.insert_rows(vec![
            row("B", 1, 10.0),
            row("B", 7, 11.0),
            row("A", 7, 20.0),
            row("C", 6, 30.0),
        ]);
        assert_eq!(store.latest_date(), Some(day(7)));
        assert_eq!(store.latest_date_for("C"), Some(day(6)));
        let codes: Vec<String> = store.rows_on(day(7)).into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }

    #[test]
    fn companies_are_normalized() {
        let store = StockStore::new();
        store.insert_company(Company {
            code: " ko ".into(),
            name: "Coca-Cola".into(),
        });
        assert_eq!(store.company_name("KO").as_deref(), Some("Coca-Cola"));
        assert!(store.contains_code("ko"));
        assert_eq!(store.companies()[0].code, "KO");
    }

    #[test]
    fn all_rows_ordered_by_code_then_date() {
        let store = StockStore::new();
        store.insert_rows(vec![row("Z", 2, 1.0), row("A", 3, 2.0), row("A", 1, 3.0)]);
        let keys: Vec<(String, NaiveDate)> =
            store.all_rows().into_iter().map(|r| (r.code, r.date)).collect();
        assert_eq!(
            keys,
            vec![
                ("A".to_string(), day(1)),
                ("A".to_string(), day(3)),
                ("Z".to_string(), day(2)),
            ]
        );
    }

    #[test]
    fn load_json_seed() {
        let path = std::env::temp_dir().join(format!("stockboard-seed-{}.json", std::process::id()));
        let json = r#"{
            "companies": [{ "code": "V", "name": "Visa Inc." }],
            "prices": [
                { "code": "V", "date": "2025-01-02", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 10 }
            ]
        }"#;
        std::fs::write(&path, json).unwrap();
        let store = StockStore::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.company_name("v").as_deref(), Some("Visa Inc."));
    }

    #[test]
    fn load_json_missing_file_errors() {
        let err = StockStore::load_json("/nonexistent/stockboard.json").err().unwrap();
        assert!(err.to_string().contains("failed to read seed data"));
    }
}
