//! Aggregated depth view of a book.

use serde::{Deserialize, Serialize};

use crate::ids::Symbol;
use crate::price::Price;

/// Per-level aggregates: total resting quantity and order count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTotals {
    pub price: Price,
    pub quantity: u64,
    pub orders: usize,
}

/// A point-in-time view of both sides, each ordered best-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    /// Bid levels, highest price first.
    pub bids: Vec<LevelTotals>,
    /// Ask levels, lowest price first.
    pub asks: Vec<LevelTotals>,
}

impl BookSnapshot {
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }
}
