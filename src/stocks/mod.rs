// src/stocks/mod.rs
// -----------------
pub mod definitions;

// Re-export the most useful items so callers don’t have to dive
// another level down the path.
pub use definitions::{Stock, Symbol, default_stock_universe, get_all_tickers, get_stock_by_ticker, universe};
