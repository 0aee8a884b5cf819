// src/types/order.rs

use crate::config::CURRENCY;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// One price level of the synthetic book. Prices are in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub side: Side,
    pub price: u64,
    pub volume: u64,
}

impl BookLevel {
    pub fn bid(price: u64, volume: u64) -> Self {
        Self { side: Side::Buy, price, volume }
    }

    pub fn ask(price: u64, volume: u64) -> Self {
        Self { side: Side::Sell, price, volume }
    }
}

/// A limit buy submitted by the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequest {
    pub instrument: String,
    /// Highest price per share the learner accepts, in cents.
    pub limit_price: u64,
    pub volume: u64,
}

impl BuyRequest {
    pub fn new<S: Into<String>>(instrument: S, limit_price: u64, volume: u64) -> Self {
        Self {
            instrument: instrument.into(),
            limit_price,
            volume,
        }
    }
}

/// Volume taken from a single ask level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub price: u64,
    pub volume: u64,
}

impl Fill {
    pub fn cost(&self) -> u64 {
        self.price.saturating_mul(self.volume)
    }
}

/// The outcome of a buy that filled at least one share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyReport {
    pub instrument: String,
    pub filled: u64,
    pub cost: u64,
    pub fills: Vec<Fill>,
    /// Matching stopped early because the next level was unaffordable.
    pub stopped_by_funds: bool,
}

impl BuyReport {
    pub fn is_complete(&self, requested: u64) -> bool {
        self.filled == requested
    }
}

impl fmt::Display for BuyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bought {} shares of {} for a total of {:.2} {}",
            self.filled,
            self.instrument,
            from_cents(self.cost),
            CURRENCY
        )
    }
}

/// Converts a currency amount to whole cents. Negative and NaN inputs map to 0.
#[inline]
pub fn to_cents(amount: f64) -> u64 {
    (amount * 100.0).round().max(0.0) as u64
}

#[inline]
pub fn from_cents(cents: u64) -> f64 {
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_conversion_rounds_to_nearest() {
        assert_eq!(to_cents(100.5), 10_050);
        assert_eq!(to_cents(150.07), 15_007);
        assert_eq!(to_cents(0.004), 0);
        assert_eq!(to_cents(-3.0), 0);
        assert_eq!(to_cents(f64::NAN), 0);
        assert_eq!(from_cents(99_500), 995.0);
    }

    #[test]
    fn fill_cost_saturates_instead_of_wrapping() {
        assert_eq!(Fill { price: 100_50, volume: 10 }.cost(), 1_005_00);
        assert_eq!(Fill { price: u64::MAX, volume: 2 }.cost(), u64::MAX);
    }

    #[test]
    fn report_reads_like_a_receipt() {
        let report = BuyReport {
            instrument: "AAPL".to_string(),
            filled: 40,
            cost: 400_500,
            fills: vec![Fill { price: 10_000, volume: 30 }, Fill { price: 10_050, volume: 10 }],
            stopped_by_funds: false,
        };
        assert_eq!(report.to_string(), "Bought 40 shares of AAPL for a total of 4005.00 SEK");
        assert!(report.is_complete(40));
        assert_eq!(report.fills.iter().map(Fill::cost).sum::<u64>(), report.cost);
    }
}
