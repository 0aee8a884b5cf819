// src/portfolio.rs

//! The learner's side of the ledger: cash account, share holdings and the
//! last seen price of every instrument.

use crate::config::{ACCOUNT_NUMBER_MAX, ACCOUNT_NUMBER_MIN, ACCOUNT_PREFIX};
use crate::types::order::from_cents;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cash account. The balance is in cents and only ever goes down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub balance: u64,
}

impl Account {
    pub fn new<S: Into<String>>(id: S, balance: u64) -> Self {
        Self {
            id: id.into(),
            balance,
        }
    }

    /// Opens an account with a random `ISK-NNNN` identifier.
    pub fn open<R: Rng + ?Sized>(balance: u64, rng: &mut R) -> Self {
        let number = rng.gen_range(ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX);
        Self::new(format!("{ACCOUNT_PREFIX}-{number}"), balance)
    }

    pub fn balance_sek(&self) -> f64 {
        from_cents(self.balance)
    }

    // Callers check affordability first; the matcher plans against the balance.
    pub(crate) fn withdraw(&mut self, cents: u64) {
        debug_assert!(cents <= self.balance, "withdrawal exceeds balance");
        self.balance = self.balance.saturating_sub(cents);
    }
}

/// Shares held per instrument. There is no sell path, so counts only grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    holdings: BTreeMap<String, u64>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, instrument: &str, shares: u64) {
        *self.holdings.entry(instrument.to_string()).or_insert(0) += shares;
    }

    pub fn holding(&self, instrument: &str) -> u64 {
        self.holdings.get(instrument).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.holdings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Values every holding at its latest price. Instruments that were never
    /// priced count as zero.
    pub fn valuation(&self, prices: &LatestPriceTable) -> Valuation {
        let rows: Vec<HoldingValue> = self
            .iter()
            .map(|(instrument, shares)| {
                let latest_price = prices.get(instrument).unwrap_or(0.0);
                HoldingValue {
                    instrument: instrument.to_string(),
                    shares,
                    latest_price,
                    value: shares as f64 * latest_price,
                }
            })
            .collect();
        let total = rows.iter().map(|r| r.value).sum();
        Valuation { rows, total }
    }
}

/// Most recently observed price per instrument, in SEK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatestPriceTable {
    prices: BTreeMap<String, f64>,
}

impl LatestPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, instrument: &str, price: f64) {
        self.prices.insert(instrument.to_string(), price);
    }

    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.prices.get(instrument).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValue {
    pub instrument: String,
    pub shares: u64,
    pub latest_price: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub rows: Vec<HoldingValue>,
    pub total: f64,
}
