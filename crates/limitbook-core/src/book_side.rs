//! The two sides of the book.
//!
//! Both sides key their levels so that map order is best-to-worst:
//! - **Bids** ([`BidBook`]): `BTreeMap<Reverse<Price>, PriceLevel>` --
//!   highest price first
//! - **Asks** ([`AskBook`]): `BTreeMap<Price, PriceLevel>` -- lowest price
//!   first
//!
//! The [`BookSide`] trait gives the matching loop one shape for both
//! directions; the only side-specific pieces are the resting-side tag and
//! the limit predicate [`BookSide::crosses`].

use std::cmp::Reverse;
use std::collections::BTreeMap;

use limitbook_types::{Price, Side};

use crate::price_level::PriceLevel;

/// Price-ordered map from level price to [`PriceLevel`].
pub trait BookSide {
    /// Side of the orders resting here.
    const SIDE: Side;

    /// The best resting price, or `None` when the side is empty.
    fn best_price(&self) -> Option<Price>;

    fn level(&self, price: Price) -> Option<&PriceLevel>;

    fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel>;

    /// The level at `price`, created empty if absent.
    fn level_or_insert(&mut self, price: Price) -> &mut PriceLevel;

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel>;

    /// Iterate levels from best to worst.
    fn levels(&self) -> impl Iterator<Item = &PriceLevel>;

    /// Whether a resting level at `level_price` satisfies an aggressor
    /// limit of `limit` against this side.
    fn crosses(limit: Price, level_price: Price) -> bool;

    /// Number of distinct price levels.
    fn depth(&self) -> usize;

    /// Number of resting orders across all levels.
    fn order_count(&self) -> usize {
        self.levels().map(PriceLevel::len).sum()
    }

    fn is_empty(&self) -> bool {
        self.depth() == 0
    }
}

/// Buy side: highest price first.
#[derive(Debug, Default)]
pub struct BidBook {
    levels: BTreeMap<Reverse<Price>, PriceLevel>,
}

impl BookSide for BidBook {
    const SIDE: Side = Side::Buy;

    fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().map(|r| r.0)
    }

    fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&Reverse(price))
    }

    fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&Reverse(price))
    }

    fn level_or_insert(&mut self, price: Price) -> &mut PriceLevel {
        self.levels
            .entry(Reverse(price))
            .or_insert_with(|| PriceLevel::new(price))
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        self.levels.remove(&Reverse(price))
    }

    fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    /// A sell aggressor with limit `limit` may hit bids at or above it.
    fn crosses(limit: Price, level_price: Price) -> bool {
        level_price >= limit
    }

    fn depth(&self) -> usize {
        self.levels.len()
    }
}

/// Sell side: lowest price first.
#[derive(Debug, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide for AskBook {
    const SIDE: Side = Side::Sell;

    fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    fn level_or_insert(&mut self, price: Price) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    /// A buy aggressor with limit `limit` may lift asks at or below it.
    fn crosses(limit: Price, level_price: Price) -> bool {
        level_price <= limit
    }

    fn depth(&self) -> usize {
        self.levels.len()
    }
}
