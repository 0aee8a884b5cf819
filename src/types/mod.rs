// src/types/mod.rs

pub mod order;
pub mod path;

pub use order::{BookLevel, BuyReport, BuyRequest, Fill, Side, from_cents, to_cents};
pub use path::{PricePath, PricePoint};
