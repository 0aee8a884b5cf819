// src/types/path.rs

use crate::config::{CHART_PAD_HIGH, CHART_PAD_LOW};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: f64,
    pub price: f64,
}

/// A simulated session: prices on a uniform time grid. Immutable once built;
/// picking another stock replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePath {
    points: Vec<PricePoint>,
}

impl PricePath {
    pub(crate) fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The "current" price the book is built around.
    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn min_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::min)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.points.iter().map(|p| p.price).reduce(f64::max)
    }

    /// Y-axis bounds for plotting, padded a few percent around the path.
    pub fn display_range(&self) -> Option<(f64, f64)> {
        Some((self.min_price()? * CHART_PAD_LOW, self.max_price()? * CHART_PAD_HIGH))
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}
