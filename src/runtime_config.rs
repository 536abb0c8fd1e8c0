// =============================================================================
// Runtime Configuration — server, seed data and chart defaults
// =============================================================================
//
// Loaded once at startup from a JSON file. All fields carry
// `#[serde(default)]` so that a partial (or empty) file still loads, and a
// handful of environment variables override the file afterwards.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chart::RenderConfig;
use crate::market_data::Listing;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_mock_days() -> usize {
    30
}

fn default_mock_seed() -> u64 {
    42
}

fn default_chart_days() -> i64 {
    30
}

fn default_max_top_k() -> usize {
    100
}

fn default_listings() -> Vec<Listing> {
    vec![
        Listing::new("AAPL", "Apple Inc.", 170.0),
        Listing::new("MSFT", "Microsoft Corporation", 410.0),
        Listing::new("NVDA", "NVIDIA Corporation", 120.0),
        Listing::new("AMZN", "Amazon.com, Inc.", 180.0),
        Listing::new("GOOGL", "Alphabet Inc.", 165.0),
        Listing::new("META", "Meta Platforms, Inc.", 500.0),
        Listing::new("TSLA", "Tesla, Inc.", 240.0),
        Listing::new("JPM", "JPMorgan Chase & Co.", 200.0),
        Listing::new("V", "Visa Inc.", 280.0),
        Listing::new("KO", "The Coca-Cola Company", 62.0),
    ]
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the dashboard backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Optional JSON seed file with `companies` and `prices`. When absent the
    /// tables are filled by the mock generator.
    #[serde(default)]
    pub data_file: Option<String>,

    // --- Mock data ----------------------------------------------------------

    /// Days of generated history per listing.
    #[serde(default = "default_mock_days")]
    pub mock_days: usize,

    #[serde(default = "default_mock_seed")]
    pub mock_seed: u64,

    /// Stocks to generate when no seed file is configured.
    #[serde(default = "default_listings")]
    pub listings: Vec<Listing>,

    // --- API ----------------------------------------------------------------

    /// Days shown by the history and chart endpoints when no `start` is given.
    #[serde(default = "default_chart_days")]
    pub chart_days: i64,

    /// Upper bound accepted for `k` on ranking queries.
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Chart defaults; request parameters override individual fields.
    #[serde(default)]
    pub chart: RenderConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_file: None,
            mock_days: default_mock_days(),
            mock_seed: default_mock_seed(),
            listings: default_listings(),
            chart_days: default_chart_days(),
            max_top_k: default_max_top_k(),
            chart: RenderConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            listings = config.listings.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `STOCKBOARD_*` overrides using `lookup` to read variables.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("STOCKBOARD_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(file) = lookup("STOCKBOARD_DATA_FILE") {
            self.data_file = Some(file).filter(|f| !f.trim().is_empty());
        }
        if let Some(raw) = lookup("STOCKBOARD_SEED") {
            match raw.trim().parse() {
                Ok(seed) => self.mock_seed = seed,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid STOCKBOARD_SEED"),
            }
        }
        if let Some(syms) = lookup("STOCKBOARD_SYMBOLS") {
            let wanted: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !wanted.is_empty() {
                self.listings.retain(|l| wanted.contains(&l.code));
                for code in wanted {
                    if !self.listings.iter().any(|l| l.code == code) {
                        self.listings.push(Listing::new(&code, &code, 100.0));
                    }
                }
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert!(cfg.data_file.is_none());
        assert_eq!(cfg.mock_days, 30);
        assert_eq!(cfg.listings.len(), 10);
        assert_eq!(cfg.listings[0].code, "AAPL");
        assert_eq!(cfg.max_top_k, 100);
        assert_eq!(cfg.chart, RenderConfig::default());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.chart_days, 30);
        assert_eq!(cfg.chart.width, 800.0);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "mock_days": 90, "chart": { "width": 900, "candle_width_ratio": 0.7 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.mock_days, 90);
        assert_eq!(cfg.chart.width, 900.0);
        assert!((cfg.chart.candle_width_ratio - 0.7).abs() < f64::EPSILON);
        assert_eq!(cfg.chart.height, 350.0);
        assert_eq!(cfg.listings.len(), 10);
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOCKBOARD_BIND_ADDR", "127.0.0.1:8080"),
            ("STOCKBOARD_SEED", "7"),
            ("STOCKBOARD_SYMBOLS", "ko, aapl, zzz"),
        ]);
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env_with(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.mock_seed, 7);
        let codes: Vec<&str> = cfg.listings.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["AAPL", "KO", "ZZZ"]);
    }

    #[test]
    fn invalid_seed_is_ignored() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env_with(|k| (k == "STOCKBOARD_SEED").then(|| "abc".to_string()));
        assert_eq!(cfg.mock_seed, 42);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(RuntimeConfig::load("/nonexistent/stockboard.json").is_err());
    }
}
