//! Order id → location lookup.
//!
//! Maps each resting order's id to its side, level price, and the **actual
//! queue key recorded at insertion**. Cancel and modify resolve through
//! this index instead of scanning levels; removal always uses the stored
//! key, never one reconstructed from the id.

use std::collections::HashMap;

use limitbook_types::{LimitBookError, OrderId, Price, QueueKey, Result, Side};

/// Where a resting order lives: side, level price, and queue key. A
/// logical locator, not an owning handle — the order itself is owned by
/// its [`crate::PriceLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub side: Side,
    pub price: Price,
    pub key: QueueKey,
}

/// Fast lookup from order id to its locator.
#[derive(Debug, Default)]
pub struct OrderIndex {
    entries: HashMap<OrderId, Locator>,
}

impl OrderIndex {
    /// Register a freshly rested order.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if `id` is already registered. The existing entry is
    /// left untouched.
    pub fn insert(&mut self, id: OrderId, locator: Locator) -> Result<()> {
        match self.entries.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => {
                Err(LimitBookError::DuplicateId(id))
            }
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(locator);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<Locator> {
        self.entries.get(&id).copied()
    }

    pub fn remove(&mut self, id: OrderId) -> Option<Locator> {
        self.entries.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OrderId, Locator)> + '_ {
        self.entries.iter().map(|(id, locator)| (*id, *locator))
    }
}
