//! Configuration for a single book instance.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{LimitBookError, Result};
use crate::ids::Symbol;

/// Per-book configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// The instrument this book serves.
    pub symbol: Symbol,
    /// Minimum accepted order quantity. A quantity of zero is always
    /// rejected.
    pub min_order_qty: u64,
    /// Maximum accepted order quantity, if bounded.
    pub max_order_qty: Option<u64>,
}

impl BookConfig {
    /// Config with default validation bounds.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            min_order_qty: constants::DEFAULT_MIN_ORDER_QTY,
            max_order_qty: None,
        }
    }

    /// Check an incoming quantity against the configured bounds.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` when `quantity` is zero, below the minimum, or
    /// above the maximum.
    pub fn validate_quantity(&self, quantity: u64) -> Result<()> {
        if quantity == 0 || quantity < self.min_order_qty {
            return Err(LimitBookError::InvalidQuantity { quantity });
        }
        if let Some(max) = self.max_order_qty {
            if quantity > max {
                return Err(LimitBookError::InvalidQuantity { quantity });
            }
        }
        Ok(())
    }
}
