// src/session.rs

use crate::config::{INITIAL_PRICE_MAX, INITIAL_PRICE_MIN, MIN_LIMIT_PRICE_CENTS, MIN_ORDER_VOLUME, SessionConfig};
use crate::error::{SessionError, SimulationError, TradeError};
use crate::portfolio::{Account, LatestPriceTable, Portfolio, Valuation};
use crate::simulators::gbm::GBMSimulator;
use crate::simulators::order_book::OrderBook;
use crate::stocks::get_stock_by_ticker;
use crate::types::order::{BuyReport, BuyRequest, to_cents};
use crate::types::path::PricePath;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Everything a front end has to keep between two interactions. The session
/// owns the state; the simulator and the matcher only borrow it per call.
pub struct TradingSession<R = StdRng> {
    config: SessionConfig,
    account: Account,
    portfolio: Portfolio,
    latest_prices: LatestPriceTable,
    selected: Option<String>,
    path: Option<PricePath>,
    book: Option<OrderBook>,
    rng: R,
}

/// The persisted form of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: SessionConfig,
    pub account: Account,
    pub portfolio: Portfolio,
    pub latest_prices: LatestPriceTable,
    pub selected: Option<String>,
    pub path: Option<PricePath>,
    pub book: Option<OrderBook>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl TradingSession<StdRng> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// A reproducible session, for tests and replays.
    pub fn seeded(config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self::restore(snapshot, StdRng::from_entropy())
    }
}

impl<R: Rng> TradingSession<R> {
    pub fn with_rng(config: SessionConfig, mut rng: R) -> Self {
        let account = Account::open(config.starting_balance_cents, &mut rng);
        info!("opened account {} with {:.2}", account.id, account.balance_sek());
        Self {
            config,
            account,
            portfolio: Portfolio::new(),
            latest_prices: LatestPriceTable::new(),
            selected: None,
            path: None,
            book: None,
            rng,
        }
    }

    pub fn restore(snapshot: SessionSnapshot, rng: R) -> Self {
        Self {
            config: snapshot.config,
            account: snapshot.account,
            portfolio: snapshot.portfolio,
            latest_prices: snapshot.latest_prices,
            selected: snapshot.selected,
            path: snapshot.path,
            book: snapshot.book,
            rng,
        }
    }

    /// Makes `ticker` the traded instrument and returns its latest price.
    ///
    /// Picking a different instrument throws away the cached path and book.
    /// Either is only built when missing, so re-selecting the current
    /// instrument leaves both untouched. On error the previous selection,
    /// path and book are kept as they were.
    pub fn select_instrument(&mut self, ticker: &str) -> Result<f64, SessionError> {
        let stock = get_stock_by_ticker(ticker)
            .ok_or_else(|| SessionError::UnknownInstrument(ticker.to_string()))?;
        let switching = self.selected.as_deref() != Some(ticker);

        let fresh_path = if switching || self.path.is_none() {
            Some(self.simulate_path(ticker)?)
        } else {
            None
        };
        let latest = fresh_path
            .as_ref()
            .or(self.path.as_ref())
            .and_then(PricePath::last_price)
            .ok_or_else(|| SimulationError::InvalidParameters("empty price path".to_string()))?;
        let fresh_book = if switching || self.book.is_none() {
            Some(OrderBook::generate(latest, self.config.levels_per_side, &mut self.rng)?)
        } else {
            None
        };

        if switching {
            info!("switching instrument {:?} -> {}", self.selected, stock.ticker);
            self.selected = Some(stock.ticker.clone());
        }
        if let Some(path) = fresh_path {
            self.path = Some(path);
        }
        if let Some(book) = fresh_book {
            self.book = Some(book);
        }
        self.latest_prices.record(ticker, latest);
        Ok(latest)
    }

    fn simulate_path(&mut self, ticker: &str) -> Result<PricePath, SimulationError> {
        let initial_price = round_to_cents(self.rng.gen_range(INITIAL_PRICE_MIN..=INITIAL_PRICE_MAX));
        let path = GBMSimulator::new(initial_price, self.config.drift, self.config.volatility)
            .simulate(self.config.horizon, self.config.step, &mut self.rng)?;
        debug!("simulated {} samples for {} from {:.2}", path.len(), ticker, initial_price);
        Ok(path)
    }

    /// Places a limit buy for the selected instrument. `limit_price` is in SEK.
    pub fn submit_buy(&mut self, limit_price: f64, volume: u64) -> Result<BuyReport, SessionError> {
        let instrument = self.selected.clone().ok_or(SessionError::NoInstrumentSelected)?;
        let limit_cents = to_cents(limit_price);
        if !limit_price.is_finite() || limit_cents < MIN_LIMIT_PRICE_CENTS {
            return Err(TradeError::InvalidParameters(format!(
                "price per share must be at least 0.01, got {limit_price}"
            ))
            .into());
        }
        if volume < MIN_ORDER_VOLUME {
            return Err(TradeError::InvalidParameters(format!(
                "volume must be at least {MIN_ORDER_VOLUME} share"
            ))
            .into());
        }

        let book = self.book.as_mut().ok_or(SessionError::NoInstrumentSelected)?;
        let request = BuyRequest::new(instrument, limit_cents, volume);
        Ok(book.execute_buy(&mut self.account, &mut self.portfolio, &request)?)
    }

    pub fn valuation(&self) -> Valuation {
        self.portfolio.valuation(&self.latest_prices)
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.path.as_ref().and_then(PricePath::last_price)
    }

    pub fn selected_instrument(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn price_path(&self) -> Option<&PricePath> {
        self.path.as_ref()
    }

    pub fn order_book(&self) -> Option<&OrderBook> {
        self.book.as_ref()
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn latest_prices(&self) -> &LatestPriceTable {
        &self.latest_prices
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.config.clone(),
            account: self.account.clone(),
            portfolio: self.portfolio.clone(),
            latest_prices: self.latest_prices.clone(),
            selected: self.selected.clone(),
            path: self.path.clone(),
            book: self.book.clone(),
        }
    }
}

fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
