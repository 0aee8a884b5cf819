// src/error.rs

use thiserror::Error;

/// Rejections from the price path simulator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation parameters: {0}")]
    InvalidParameters(String),
}

/// Why a buy order did not execute. Every variant leaves the book, the
/// balance and the portfolio untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradeError {
    /// The limit price is below every resting ask.
    #[error("there are no sell orders at {limit_cents} cents or lower")]
    NoMatchingAsks { limit_cents: u64 },
    /// The balance could not cover even the first matching level.
    #[error("insufficient funds: balance {balance_cents} cents, needed {needed_cents} cents")]
    InsufficientFunds { balance_cents: u64, needed_cents: u64 },
    /// Matching asks existed but nothing was bought.
    #[error("could not buy any shares, check your balance and order volume")]
    NoAffordableMatch,
    #[error("invalid order: {0}")]
    InvalidParameters(String),
}

/// Errors surfaced to the presentation layer by a trading session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown instrument `{0}`")]
    UnknownInstrument(String),
    #[error("no instrument selected")]
    NoInstrumentSelected,
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Trade(#[from] TradeError),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
