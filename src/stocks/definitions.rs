// src/stocks/definitions.rs
//! The instruments a learner can trade.
//
//! The list is fixed. Extend `default_stock_universe()` to offer more tickers.

pub type Symbol = String;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Immutable facts about a listed company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// NASDAQ ticker (e.g. "AAPL").
    pub ticker: Symbol,
    /// Unique Stock Id, also the menu order.
    pub id: u64,
    /// Human-readable company name.
    pub company_name: String,
}

/// Convenience factory so call-sites stay concise.
impl Stock {
    #[inline]
    pub fn new<T1: Into<String>, T2: Into<String>>(ticker: T1, id: u64, company_name: T2) -> Self {
        Self {
            ticker: ticker.into(),
            id,
            company_name: company_name.into(),
        }
    }
}

/// Built once and shared by every session.
static UNIVERSE: Lazy<Vec<Stock>> = Lazy::new(default_stock_universe);

/// The stocks offered in the instrument picker, in menu order.
#[inline]
pub fn default_stock_universe() -> Vec<Stock> {
    vec![
        Stock::new("AAPL", 1, "Apple Inc."),
        Stock::new("MSFT", 2, "Microsoft Corporation"),
        Stock::new("GOOG", 3, "Alphabet Inc."),
        Stock::new("TSLA", 4, "Tesla, Inc."),
        Stock::new("AMZN", 5, "Amazon.com, Inc."),
        Stock::new("META", 6, "Meta Platforms, Inc."),
    ]
}

pub fn universe() -> &'static [Stock] {
    &UNIVERSE
}

/// Returns the stock with the given ticker, if it is tradable.
pub fn get_stock_by_ticker(ticker: &str) -> Option<&'static Stock> {
    UNIVERSE.iter().find(|s| s.ticker == ticker)
}

/// Returns every ticker in menu order.
pub fn get_all_tickers() -> Vec<&'static str> {
    UNIVERSE.iter().map(|s| s.ticker.as_str()).collect()
}

// -----------------------------------------------------------------------------
//  Unit tests: universe invariants
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn universe_has_the_six_tickers_in_order() {
        assert_eq!(get_all_tickers(), vec!["AAPL", "MSFT", "GOOG", "TSLA", "AMZN", "META"]);
    }

    #[test]
    fn ids_and_tickers_are_unique() {
        let ids: HashSet<u64> = universe().iter().map(|s| s.id).collect();
        let tickers: HashSet<&str> = universe().iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(ids.len(), universe().len());
        assert_eq!(tickers.len(), universe().len());
    }

    #[test]
    fn lookup_handles_unknown_tickers() {
        assert_eq!(get_stock_by_ticker("TSLA").unwrap().id, 4);
        assert!(get_stock_by_ticker("ZZZZ").is_none());
        assert!(get_stock_by_ticker("aapl").is_none());
    }
}
