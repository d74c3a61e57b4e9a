//! Order model for the LimitBook matching engine.
//!
//! A resting [`Order`] is immutable except for its remaining `quantity`,
//! which shrinks under partial fills. Its position in the level queue is
//! fixed by its [`QueueKey`] at insertion time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{OrderId, UserId};
use crate::price::Price;

/// Which side of the book an order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// How long an order may work before it is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-till-cancelled: the unmatched residual rests on the book.
    Gtc,
    /// Immediate-or-cancel: match what is available, discard the residual.
    Ioc,
    /// Fill-or-kill: all-or-nothing; rejected silently unless fully
    /// fillable.
    Fok,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gtc => write!(f, "GTC"),
            Self::Ioc => write!(f, "IOC"),
            Self::Fok => write!(f, "FOK"),
        }
    }
}

/// Position of a resting order within its level queue: `(timestamp, id)`
/// lexicographic ascending. Immutable once the order rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct QueueKey {
    pub timestamp: u64,
    pub id: OrderId,
}

/// A resting limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub price: Price,
    /// Remaining size; strictly positive while resting.
    pub quantity: u64,
    /// Monotonic insertion timestamp assigned by the engine.
    pub timestamp: u64,
    pub user_id: UserId,
}

impl Order {
    /// The order's queue position within its price level.
    #[must_use]
    pub const fn key(&self) -> QueueKey {
        QueueKey {
            timestamp: self.timestamp,
            id: self.id,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {} (t={}, {})",
            self.id, self.quantity, self.price, self.timestamp, self.user_id
        )
    }
}
