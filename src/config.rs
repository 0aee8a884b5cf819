// src/config.rs

//! A centralized place for the tutor's fixed parameters and the tunable
//! session configuration.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

// --- Price path ---
// Every simulated price is forced into this band.
pub const PRICE_FLOOR: f64 = 100.0;
pub const PRICE_CEILING: f64 = 300.0;
// Initial prices are drawn uniformly from this range when a stock is picked.
pub const INITIAL_PRICE_MIN: f64 = 100.0;
pub const INITIAL_PRICE_MAX: f64 = 300.0;
pub const DEFAULT_DRIFT: f64 = 0.0005;
pub const DEFAULT_VOLATILITY: f64 = 0.02;
pub const DEFAULT_HORIZON: f64 = 1.0; // one day
pub const DEFAULT_STEP: f64 = 1.0 / 252.0;
// Longest path a single simulation may allocate.
pub const MAX_PATH_SAMPLES: usize = 1_000_000;
// The chart pads the path's price range by this much on each side.
pub const CHART_PAD_LOW: f64 = 0.95;
pub const CHART_PAD_HIGH: f64 = 1.05;

// --- Synthetic order book ---
pub const BOOK_LEVELS_PER_SIDE: usize = 5;
pub const BID_BAND_LOW: f64 = 0.98; // bids live in [0.98 p, p]
pub const ASK_BAND_HIGH: f64 = 1.02; // asks live in [p, 1.02 p]
pub const LEVEL_VOLUME_MIN: u64 = 10;
pub const LEVEL_VOLUME_MAX: u64 = 100;

// --- Account ---
pub const STARTING_BALANCE_CENTS: u64 = 100_000_00; // 100 000.00 SEK
pub const ACCOUNT_PREFIX: &str = "ISK";
pub const ACCOUNT_NUMBER_MIN: u32 = 1000;
pub const ACCOUNT_NUMBER_MAX: u32 = 9999;
pub const CURRENCY: &str = "SEK";

// --- Order entry ---
// Smallest limit price the order form accepts, in cents.
pub const MIN_LIMIT_PRICE_CENTS: u64 = 1;
pub const MIN_ORDER_VOLUME: u64 = 1;

/// The tunables one trading session runs with. Anything left out of a config
/// file falls back to the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_balance_cents: u64,
    pub drift: f64,
    pub volatility: f64,
    pub horizon: f64,
    pub step: f64,
    pub levels_per_side: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balance_cents: STARTING_BALANCE_CENTS,
            drift: DEFAULT_DRIFT,
            volatility: DEFAULT_VOLATILITY,
            horizon: DEFAULT_HORIZON,
            step: DEFAULT_STEP,
            levels_per_side: BOOK_LEVELS_PER_SIDE,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a JSON config file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_constants() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.starting_balance_cents, 10_000_000);
        assert_eq!(cfg.levels_per_side, 5);
        assert!((cfg.step - 1.0 / 252.0).abs() < 1e-15);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = SessionConfig::from_json_str(r#"{ "volatility": 0.3, "levels_per_side": 8 }"#)
            .unwrap();
        assert_eq!(cfg.volatility, 0.3);
        assert_eq!(cfg.levels_per_side, 8);
        assert_eq!(cfg.drift, DEFAULT_DRIFT);
        assert_eq!(cfg.starting_balance_cents, STARTING_BALANCE_CENTS);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SessionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SessionConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
