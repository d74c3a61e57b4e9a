//! Trade records produced by the matching engine.
//!
//! A [`Trade`] is the immutable record of one fill between a passive
//! (resting) order and the aggressive (incoming) order. The execution price
//! is always the passive order's price — price improvement accrues to the
//! aggressor.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::OrderId;
use crate::price::Price;

/// A single fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// The resting order that was hit.
    pub passive_id: OrderId,
    /// The incoming order that crossed the book.
    pub aggressive_id: OrderId,
    /// Execution price (the passive order's limit).
    pub price: Price,
    /// Executed quantity.
    pub quantity: u64,
    /// Timestamp of the command that produced this fill.
    pub timestamp: u64,
}

impl Trade {
    /// Notional value of the fill: `price × quantity`.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * Decimal::from(self.quantity)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} x {})",
            self.quantity, self.price, self.passive_id, self.aggressive_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade {
            passive_id: OrderId::new(1),
            aggressive_id: OrderId::new(2),
            price: Price::from_ticks(10_000),
            quantity: 5,
            timestamp: 7,
        }
    }

    #[test]
    fn trade_notional() {
        let t = make_trade();
        assert_eq!(t.notional(), Decimal::new(50_000, 2));
    }

    #[test]
    fn trade_display() {
        let s = format!("{}", make_trade());
        assert!(s.contains("100.00"));
        assert!(s.contains("order:1"));
        assert!(s.contains("order:2"));
    }

    #[test]
    fn trade_serde_roundtrip() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, back);
    }
}
