// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler through `Arc<AppState>`. The config is
// fixed after startup; the store manages its own interior locking.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::market_data::{seed_store, StockStore};
use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    pub config: RuntimeConfig,
    pub store: Arc<StockStore>,
    /// Used for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, store: Arc<StockStore>) -> Self {
        Self {
            config,
            store,
            start_time: Instant::now(),
        }
    }

    /// Build state from `config`: load the seed file when one is configured,
    /// otherwise generate mock history ending at `today`.
    pub fn bootstrap(config: RuntimeConfig, today: NaiveDate) -> Result<Self> {
        let store = match &config.data_file {
            Some(path) => StockStore::load_json(path)?,
            None => {
                let store = StockStore::new();
                seed_store(
                    &store,
                    &config.listings,
                    today,
                    config.mock_days,
                    config.mock_seed,
                );
                store
            }
        };

        info!(
            rows = store.row_count(),
            companies = store.company_count(),
            latest = ?store.latest_date(),
            "stock tables ready"
        );

        Ok(Self::new(config, Arc::new(store)))
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
