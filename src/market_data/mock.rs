// =============================================================================
// Mock Price Generator
// =============================================================================
//
// Produces plausible daily OHLC series so the dashboard has something to
// show without a market-data feed. Each day drifts from a smoothed base:
//
//   open  = base + (r - 0.5) * 4
//   close = open + (r - 0.5) * 6
//   high  = max(open, close) + r * 3
//   low   = min(open, close) - r * 3
//   base  = close * 0.8 + base * 0.2
//
// where every `r` is a fresh uniform draw in [0, 1). Seeded, so a given
// seed always yields the same tables.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::store::StockStore;
use crate::types::{round2, Company, StockRow};

const BASE_VOLUME: f64 = 50_000_000.0;
const VOLUME_SPREAD: f64 = 30_000_000.0;

/// A stock to generate data for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub code: String,
    pub name: String,
    pub base_price: f64,
}

impl Listing {
    pub fn new(code: &str, name: &str, base_price: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            base_price,
        }
    }
}

/// Generate `days` consecutive daily rows for `code`, the last one dated
/// `end`. The series is cut short at the earliest representable date.
pub fn generate_series<R: Rng>(
    rng: &mut R,
    code: &str,
    base_price: f64,
    end: NaiveDate,
    days: usize,
) -> Vec<StockRow> {
    let representable = end.signed_duration_since(NaiveDate::MIN).num_days() as usize + 1;
    let days = days.min(representable);
    let mut base = base_price;
    let mut rows = Vec::with_capacity(days);

    for i in 0..days {
        let offset = (days - 1 - i) as i64;
        let Some(date) = Duration::try_days(offset).and_then(|d| end.checked_sub_signed(d)) else {
            continue;
        };

        let open = base + (rng.gen::<f64>() - 0.5) * 4.0;
        let close = open + (rng.gen::<f64>() - 0.5) * 6.0;
        let high = open.max(close) + rng.gen::<f64>() * 3.0;
        let low = open.min(close) - rng.gen::<f64>() * 3.0;
        let volume = (BASE_VOLUME + rng.gen::<f64>() * VOLUME_SPREAD).floor() as u64;

        rows.push(StockRow {
            code: code.to_string(),
            date,
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close: round2(close),
            volume,
        });

        base = close * 0.8 + base * 0.2;
    }

    rows
}

/// Fill `store` with `days` of generated history for every listing.
pub fn seed_store(store: &StockStore, listings: &[Listing], end: NaiveDate, days: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for listing in listings {
        store.insert_company(Company {
            code: listing.code.clone(),
            name: listing.name.clone(),
        });
        let rows = generate_series(&mut rng, &listing.code, listing.base_price, end, days);
        store.insert_rows(rows);
    }
    info!(
        listings = listings.len(),
        days,
        seed,
        end = %end,
        "mock market data generated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn series_has_consecutive_dates_ending_at_end() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = generate_series(&mut rng, "AAPL", 170.0, end(), 30);
        assert_eq!(rows.len(), 30);
        assert_eq!(rows.last().unwrap().date, end());
        assert_eq!(rows[0].date, end() - Duration::days(29));
        for pair in rows.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn generated_rows_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(11);
        for row in generate_series(&mut rng, "MSFT", 400.0, end(), 60) {
            assert!(row.low <= row.open.min(row.close));
            assert!(row.high >= row.open.max(row.close));
            assert!(row.low > 0.0);
            assert!(row.volume >= 50_000_000 && row.volume < 80_000_000);
            assert_eq!(round2(row.close), row.close);
        }
    }

    #[test]
    fn same_seed_same_data() {
        let a = generate_series(&mut StdRng::seed_from_u64(3), "X", 50.0, end(), 10);
        let b = generate_series(&mut StdRng::seed_from_u64(3), "X", 50.0, end(), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_days_is_empty() {
        let rows = generate_series(&mut StdRng::seed_from_u64(1), "X", 50.0, end(), 0);
        assert!(rows.is_empty());
    }

    #[test]
    fn series_stops_at_earliest_date() {
        let end = NaiveDate::MIN + Duration::days(2);
        let rows = generate_series(&mut StdRng::seed_from_u64(5), "X", 50.0, end, 10);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::MIN);
        assert_eq!(rows.last().unwrap().date, end);
    }

    #[test]
    fn seed_store_fills_companies_and_rows() {
        let store = StockStore::new();
        let listings = vec![
            Listing::new("AAPL", "Apple Inc.", 170.0),
            Listing::new("KO", "The Coca-Cola Company", 60.0),
        ];
        seed_store(&store, &listings, end(), 5, 42);
        assert_eq!(store.row_count(), 10);
        assert_eq!(store.company_count(), 2);
        assert_eq!(store.latest_date(), Some(end()));
    }
}
