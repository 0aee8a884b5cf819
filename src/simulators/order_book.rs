// src/simulators/order_book.rs

use crate::config::{ASK_BAND_HIGH, BID_BAND_LOW, LEVEL_VOLUME_MAX, LEVEL_VOLUME_MIN};
use crate::error::TradeError;
use crate::portfolio::{Account, Portfolio};
use crate::types::order::{BookLevel, BuyReport, BuyRequest, Fill};
use log::{debug, info};
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// A synthetic two-sided book. Bids are kept best (highest) first and asks
/// best (lowest) first. Prices are in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

/// What a buy would do to the book, worked out without touching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyPlan {
    /// Ask index and the volume taken from it, in matching order.
    pub fills: Vec<(usize, Fill)>,
    pub filled: u64,
    pub cost: u64,
    pub stopped_by_funds: bool,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from raw levels. Each side is sorted best first; levels
    /// sharing a price keep the order they were given in.
    pub fn from_levels(mut bids: Vec<BookLevel>, mut asks: Vec<BookLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by_key(|l| l.price);
        Self { bids, asks }
    }

    /// Draws `levels_per_side` bids in [0.98 p, p] and asks in [p, 1.02 p],
    /// rounded to cents, each with a volume in [10, 100]. Prices are distinct
    /// within a side; a band too narrow to hold that many cent ticks is
    /// rejected.
    pub fn generate<R: Rng + ?Sized>(
        current_price: f64,
        levels_per_side: usize,
        rng: &mut R,
    ) -> Result<Self, TradeError> {
        if !(current_price.is_finite() && current_price > 0.0) {
            return Err(TradeError::InvalidParameters(format!(
                "current price must be a positive number, got {current_price}"
            )));
        }
        let anchor = current_price * 100.0;
        // No level trades at zero cents, and bids stay strictly under the
        // cheapest possible ask.
        let ask_lo = ceil_ticks(anchor).max(1);
        let ask_hi = floor_ticks(anchor * ASK_BAND_HIGH);
        let bid_hi = ask_lo - 1;
        let bid_lo = ceil_ticks(anchor * BID_BAND_LOW).max(1);

        let bid_ticks = tick_span(bid_lo, bid_hi);
        let ask_ticks = tick_span(ask_lo, ask_hi);
        if bid_ticks.min(ask_ticks) < levels_per_side as u64 {
            return Err(TradeError::InvalidParameters(format!(
                "price {current_price} leaves {bid_ticks} bid and {ask_ticks} ask ticks, \
                 fewer than {levels_per_side} levels"
            )));
        }

        let mut bid_prices = draw_ticks(bid_lo, bid_ticks, levels_per_side, rng);
        let mut ask_prices = draw_ticks(ask_lo, ask_ticks, levels_per_side, rng);
        bid_prices.sort_unstable_by(|a, b| b.cmp(a));
        ask_prices.sort_unstable();

        let bids = bid_prices
            .into_iter()
            .map(|price| BookLevel::bid(price, rng.gen_range(LEVEL_VOLUME_MIN..=LEVEL_VOLUME_MAX)))
            .collect();
        let asks = ask_prices
            .into_iter()
            .map(|price| BookLevel::ask(price, rng.gen_range(LEVEL_VOLUME_MIN..=LEVEL_VOLUME_MAX)))
            .collect();

        let book = Self { bids, asks };
        debug!(
            "generated book around {:.2}: best bid {:?}, best ask {:?}",
            current_price,
            book.best_bid().map(|l| l.price),
            book.best_ask().map(|l| l.price)
        );
        Ok(book)
    }

    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.iter().max_by_key(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.iter().min_by_key(|l| l.price)
    }

    /// Best ask minus best bid, in cents. `None` when a side is empty or the
    /// book is crossed.
    pub fn spread(&self) -> Option<u64> {
        let bid = self.best_bid()?.price;
        let ask = self.best_ask()?.price;
        ask.checked_sub(bid)
    }

    pub fn ask_volume(&self) -> u64 {
        self.asks.iter().map(|l| l.volume).sum()
    }

    /// Works out how a limit buy would sweep the asks with `balance` cents to
    /// spend. Cheapest levels go first; equal prices go in book order.
    pub fn plan_buy(&self, limit_price: u64, volume: u64, balance: u64) -> Result<BuyPlan, TradeError> {
        if limit_price == 0 {
            return Err(TradeError::InvalidParameters(
                "limit price must be at least one cent".to_string(),
            ));
        }

        let mut matching: Vec<usize> = self
            .asks
            .iter()
            .enumerate()
            .filter(|(_, level)| level.price <= limit_price)
            .map(|(i, _)| i)
            .collect();
        if matching.is_empty() {
            return Err(TradeError::NoMatchingAsks { limit_cents: limit_price });
        }
        // Stable, so ties resolve FIFO.
        matching.sort_by_key(|&i| self.asks[i].price);

        let mut fills = Vec::new();
        let mut remaining = volume;
        let mut spent: u64 = 0;
        let mut blocked_at = None;
        for i in matching {
            if remaining == 0 {
                break;
            }
            let level = &self.asks[i];
            let trade_volume = level.volume.min(remaining);
            let trade_cost = trade_volume.saturating_mul(level.price);
            let needed = spent.saturating_add(trade_cost);
            if needed > balance {
                blocked_at = Some(needed);
                break;
            }
            if trade_volume > 0 {
                fills.push((i, Fill { price: level.price, volume: trade_volume }));
            }
            spent = needed;
            remaining -= trade_volume;
        }

        let filled = volume - remaining;
        if filled == 0 {
            return Err(match blocked_at {
                Some(needed_cents) => TradeError::InsufficientFunds {
                    balance_cents: balance,
                    needed_cents,
                },
                None => TradeError::NoAffordableMatch,
            });
        }
        Ok(BuyPlan {
            fills,
            filled,
            cost: spent,
            stopped_by_funds: blocked_at.is_some(),
        })
    }

    /// Executes a limit buy against the asks. Book, balance and portfolio
    /// change together, and only when at least one share was bought.
    pub fn execute_buy(
        &mut self,
        account: &mut Account,
        portfolio: &mut Portfolio,
        request: &BuyRequest,
    ) -> Result<BuyReport, TradeError> {
        let plan = self
            .plan_buy(request.limit_price, request.volume, account.balance)
            .inspect_err(|e| info!("buy of {} {} rejected: {}", request.volume, request.instrument, e))?;

        for (i, fill) in &plan.fills {
            self.asks[*i].volume -= fill.volume;
        }
        self.asks.retain(|level| level.volume > 0);
        account.withdraw(plan.cost);
        portfolio.add(&request.instrument, plan.filled);

        let report = BuyReport {
            instrument: request.instrument.clone(),
            filled: plan.filled,
            cost: plan.cost,
            fills: plan.fills.into_iter().map(|(_, fill)| fill).collect(),
            stopped_by_funds: plan.stopped_by_funds,
        };
        info!(
            "filled {}/{} {} for {} cents over {} level(s){}",
            report.filled,
            request.volume,
            report.instrument,
            report.cost,
            report.fills.len(),
            if report.stopped_by_funds { ", stopped by funds" } else { "" }
        );
        Ok(report)
    }
}

/// Free-function form of [`OrderBook::generate`].
pub fn generate_book<R: Rng + ?Sized>(
    current_price: f64,
    levels_per_side: usize,
    rng: &mut R,
) -> Result<OrderBook, TradeError> {
    OrderBook::generate(current_price, levels_per_side, rng)
}

// Cent ticks within a hair of an integer are that integer; 150.07 * 100 is
// not quite 15007.
const TICK_TOLERANCE: f64 = 1e-6;

fn ceil_ticks(x: f64) -> u64 {
    let nearest = x.round();
    if (x - nearest).abs() < TICK_TOLERANCE { nearest as u64 } else { x.ceil() as u64 }
}

fn floor_ticks(x: f64) -> u64 {
    let nearest = x.round();
    if (x - nearest).abs() < TICK_TOLERANCE { nearest as u64 } else { x.floor() as u64 }
}

/// Number of cent ticks in `lo..=hi`, zero when the range is empty.
fn tick_span(lo: u64, hi: u64) -> u64 {
    hi.checked_sub(lo).map_or(0, |d| d.saturating_add(1))
}

/// `count` distinct ticks from the `span` ticks starting at `lo`. Callers make
/// sure `count <= span`.
fn draw_ticks<R: Rng + ?Sized>(lo: u64, span: u64, count: usize, rng: &mut R) -> Vec<u64> {
    let span = usize::try_from(span).unwrap_or(usize::MAX);
    index::sample(rng, span, count).into_iter().map(|offset| lo + offset as u64).collect()
}
