// src/lib.rs

// === 1. Declare all the top-level modules ===
pub mod config;
pub mod error;
pub mod portfolio;
pub mod session;
pub mod simulators;
pub mod stocks;
pub mod types;

// === 2. Re-export the public-facing components to create a clean API ===

// --- From our `session` state ---
pub use session::{SessionSnapshot, TradingSession};

// --- From `simulators` ---
pub use simulators::gbm::{GBMSimulator, simulate};
pub use simulators::order_book::{BuyPlan, OrderBook, generate_book};

// --- From `types` ---
pub use types::order::{BookLevel, BuyReport, BuyRequest, Fill, Side, from_cents, to_cents};
pub use types::path::{PricePath, PricePoint};

// --- Ledger, config and errors ---
pub use config::SessionConfig;
pub use error::{SessionError, SimulationError, TradeError};
pub use portfolio::{Account, HoldingValue, LatestPriceTable, Portfolio, Valuation};
pub use stocks::{Stock, universe};
