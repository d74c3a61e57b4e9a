//! The matching engine: command orchestration over the two book sides.
//!
//! Commands are applied one at a time to completion. Each `add_order` runs
//! the price-time priority matching loop against the opposite side and
//! returns the trades it produced, best price first and FIFO within a
//! level. Resting orders owned by the incoming order's user are skipped
//! without being consumed.
//!
//! ## Crossed book under self-match prevention
//!
//! When the only liquidity inside the limit belongs to the incoming
//! order's own user, the residual still rests (GTC), so the book may cross
//! **between one user's own orders**. It never crosses between distinct
//! users; [`MatchingEngine::verify_book_integrity`] checks exactly that.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use limitbook_types::{
    BookConfig, BookSnapshot, LevelTotals, LimitBookError, Order, OrderId, Price, QueueKey,
    Result, Side, Symbol, TimeInForce, Trade, UserId,
};

use crate::book_side::{AskBook, BidBook, BookSide};
use crate::clock::{Clock, SystemClock};
use crate::order_index::{Locator, OrderIndex};
use crate::price_level::PriceLevel;

/// A single-symbol limit order book with price-time priority matching.
///
/// All state is owned by the engine value; callers running on multiple
/// threads must serialize commands externally.
#[derive(Debug)]
pub struct MatchingEngine<C = SystemClock> {
    config: BookConfig,
    bids: BidBook,
    asks: AskBook,
    index: OrderIndex,
    clock: C,
    last_timestamp: u64,
}

impl MatchingEngine<SystemClock> {
    /// Engine on the wall clock.
    #[must_use]
    pub fn new(config: BookConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> MatchingEngine<C> {
    /// Engine on an injected timestamp supplier.
    #[must_use]
    pub fn with_clock(config: BookConfig, clock: C) -> Self {
        Self {
            config,
            bids: BidBook::default(),
            asks: AskBook::default(),
            index: OrderIndex::default(),
            clock,
            last_timestamp: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.config.symbol
    }

    // =================================================================
    // Commands
    // =================================================================

    /// Add a limit order, matching it against the opposite side.
    ///
    /// Returns the trades produced, in consumption order. An unfillable
    /// FOK order returns `Ok` with no trades and leaves the book
    /// untouched.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` for a quantity outside the configured bounds,
    /// `DuplicateId` if `id` is currently resting.
    pub fn add_order(
        &mut self,
        id: OrderId,
        price: Price,
        quantity: u64,
        side: Side,
        user_id: UserId,
        tif: TimeInForce,
    ) -> Result<Vec<Trade>> {
        self.config.validate_quantity(quantity)?;
        if self.index.contains(id) {
            return Err(LimitBookError::DuplicateId(id));
        }

        let timestamp = self.next_timestamp();
        debug!("{id} {side} {quantity} @ {price} {tif} ({user_id})");

        let trades = match side {
            Side::Buy => Self::execute(
                &mut self.asks,
                &mut self.bids,
                &mut self.index,
                id,
                price,
                quantity,
                user_id,
                tif,
                timestamp,
            ),
            Side::Sell => Self::execute(
                &mut self.bids,
                &mut self.asks,
                &mut self.index,
                id,
                price,
                quantity,
                user_id,
                tif,
                timestamp,
            ),
        };
        Ok(trades)
    }

    /// Cancel a resting order. Returns the removed order.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` if `id` is not resting.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<Order> {
        let Some(locator) = self.index.remove(id) else {
            return Err(LimitBookError::OrderNotFound(id));
        };

        let removed = match locator.side {
            Side::Buy => Self::remove_resting(&mut self.bids, &locator),
            Side::Sell => Self::remove_resting(&mut self.asks, &locator),
        };
        match removed {
            Some(order) => {
                debug!("{id} cancelled ({} @ {} remaining)", order.quantity, order.price);
                Ok(order)
            }
            None => Err(LimitBookError::IntegrityViolation {
                reason: format!("index entry for {id} had no resting order"),
            }),
        }
    }

    /// Cancel-and-replace with loss of time priority.
    ///
    /// The replacement keeps the order's side and user, takes a fresh
    /// timestamp, rests at the tail of its new level, and may match
    /// immediately if the new price crosses.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` if `id` is not resting, `InvalidQuantity` for a bad
    /// new quantity. A rejected modify leaves the book unchanged.
    pub fn modify_order(
        &mut self,
        id: OrderId,
        new_price: Price,
        new_quantity: u64,
    ) -> Result<Vec<Trade>> {
        let Some(locator) = self.index.get(id) else {
            return Err(LimitBookError::OrderNotFound(id));
        };
        let resting = match locator.side {
            Side::Buy => self.bids.level(locator.price),
            Side::Sell => self.asks.level(locator.price),
        }
        .and_then(|level| level.get(&locator.key).copied());
        let Some(resting) = resting else {
            return Err(LimitBookError::IntegrityViolation {
                reason: format!("index entry for {id} had no resting order"),
            });
        };

        // Validate the replacement before cancelling, so a rejected modify
        // leaves the original order resting.
        self.config.validate_quantity(new_quantity)?;

        self.cancel_order(id)?;
        self.add_order(
            id,
            new_price,
            new_quantity,
            locator.side,
            resting.user_id,
            TimeInForce::Gtc,
        )
    }

    // =================================================================
    // Matching
    // =================================================================

    #[allow(clippy::too_many_arguments)]
    fn execute<Opp: BookSide, Own: BookSide>(
        opposite: &mut Opp,
        own: &mut Own,
        index: &mut OrderIndex,
        id: OrderId,
        limit: Price,
        quantity: u64,
        user_id: UserId,
        tif: TimeInForce,
        timestamp: u64,
    ) -> Vec<Trade> {
        if tif == TimeInForce::Fok && !Self::fok_fillable(opposite, limit, quantity, user_id) {
            debug!("{id} FOK unfillable for {quantity} @ {limit}; rejected");
            return Vec::new();
        }

        let mut trades = Vec::new();
        let mut remaining = quantity;

        // Level prices never appear inside the limit mid-sweep, so a
        // snapshot of the crossing prices is safe to walk while levels
        // are drained and removed.
        let crossing: Vec<Price> = opposite
            .levels()
            .map(PriceLevel::price)
            .take_while(|price| Opp::crosses(limit, *price))
            .collect();

        for level_price in crossing {
            if remaining == 0 {
                break;
            }
            remaining = Self::sweep_level(
                opposite,
                index,
                level_price,
                id,
                user_id,
                remaining,
                timestamp,
                &mut trades,
            );
        }

        if remaining > 0 {
            match tif {
                TimeInForce::Gtc => {
                    let order = Order {
                        id,
                        price: limit,
                        quantity: remaining,
                        timestamp,
                        user_id,
                    };
                    own.level_or_insert(limit).push_back(order);
                    // Id collision was ruled out on entry, so registration
                    // cannot fail.
                    let _ = index.insert(
                        id,
                        Locator {
                            side: Own::SIDE,
                            price: limit,
                            key: order.key(),
                        },
                    );
                    debug!("{id} rests {remaining} @ {limit}");
                }
                TimeInForce::Ioc => {
                    debug!("{id} IOC residual {remaining} discarded");
                }
                TimeInForce::Fok => {
                    debug_assert!(false, "FOK residual after feasibility pass");
                }
            }
        }

        trades
    }

    /// Consume one opposite-side level head-to-tail, skipping same-user
    /// orders. Returns the still-unmatched quantity.
    #[allow(clippy::too_many_arguments)]
    fn sweep_level<Opp: BookSide>(
        opposite: &mut Opp,
        index: &mut OrderIndex,
        level_price: Price,
        taker_id: OrderId,
        taker_user: UserId,
        mut remaining: u64,
        timestamp: u64,
        trades: &mut Vec<Trade>,
    ) -> u64 {
        let Some(level) = opposite.level_mut(level_price) else {
            return remaining;
        };

        let mut cursor: Option<QueueKey> = None;
        while remaining > 0 {
            let Some(resting) = level.next_after(cursor) else {
                break;
            };
            let key = resting.key();

            if resting.user_id == taker_user {
                // Self-match prevention: leave the order untouched and
                // keep scanning this level.
                cursor = Some(key);
                continue;
            }

            let fill = remaining.min(resting.quantity);
            trades.push(Trade {
                passive_id: resting.id,
                aggressive_id: taker_id,
                price: level_price,
                quantity: fill,
                timestamp,
            });
            trace!("fill {fill} @ {level_price}: {} x {taker_id}", resting.id);

            if fill == resting.quantity {
                level.remove(&key);
                index.remove(resting.id);
            } else {
                // Partial fill: quantity shrinks in place, queue key (and
                // index entry) unchanged.
                level.set_quantity(&key, resting.quantity - fill);
            }
            remaining -= fill;
        }

        if level.is_empty() {
            opposite.remove_level(level_price);
        }
        remaining
    }

    /// FOK dry run: walk the opposite side best-to-worst and check that
    /// other users' liquidity inside the limit covers the full quantity.
    fn fok_fillable<Opp: BookSide>(
        opposite: &Opp,
        limit: Price,
        quantity: u64,
        user_id: UserId,
    ) -> bool {
        let mut available: u64 = 0;
        for level in opposite.levels() {
            if !Opp::crosses(limit, level.price()) {
                break;
            }
            for order in level.iter() {
                if order.user_id == user_id {
                    continue;
                }
                available = available.saturating_add(order.quantity);
                if available >= quantity {
                    return true;
                }
            }
        }
        false
    }

    fn remove_resting<B: BookSide>(side: &mut B, locator: &Locator) -> Option<Order> {
        let level = side.level_mut(locator.price)?;
        let removed = level.remove(&locator.key);
        if level.is_empty() {
            side.remove_level(locator.price);
        }
        removed
    }

    fn next_timestamp(&mut self) -> u64 {
        let now = self.clock.now_millis();
        self.last_timestamp = self.last_timestamp.max(now);
        self.last_timestamp
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Best (highest) bid price, or `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best (lowest) ask price, or `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Spread = best ask − best bid. `None` if either side is empty.
    /// Negative when the book is crossed between one user's own orders.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        }
    }

    /// Mid price = (best bid + best ask) / 2. `None` if either side is
    /// empty.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.as_decimal() + ask.as_decimal()) / Decimal::TWO),
            _ => None,
        }
    }

    /// Total number of resting orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct bid price levels.
    #[must_use]
    pub fn bid_depth(&self) -> usize {
        self.bids.depth()
    }

    /// Number of distinct ask price levels.
    #[must_use]
    pub fn ask_depth(&self) -> usize {
        self.asks.depth()
    }

    /// Returns `true` if the book has no resting orders on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check whether an order id is currently resting.
    #[must_use]
    pub fn contains_order(&self, id: OrderId) -> bool {
        self.index.contains(id)
    }

    /// The resting order with this id, if any.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<Order> {
        let locator = self.index.get(id)?;
        let level = match locator.side {
            Side::Buy => self.bids.level(locator.price),
            Side::Sell => self.asks.level(locator.price),
        }?;
        level.get(&locator.key).copied()
    }

    /// Per-level depth aggregates for both sides, each best-first.
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        fn totals(level: &PriceLevel) -> LevelTotals {
            LevelTotals {
                price: level.price(),
                quantity: level.total_quantity(),
                orders: level.len(),
            }
        }
        BookSnapshot {
            symbol: self.config.symbol.clone(),
            bids: self.bids.levels().map(totals).collect(),
            asks: self.asks.levels().map(totals).collect(),
        }
    }

    // =================================================================
    // Integrity
    // =================================================================

    /// Walk the whole book and check every structural invariant:
    /// index ↔ book bijection, no empty levels, level price uniformity,
    /// positive resting quantities, unique queue keys, and no cross
    /// between distinct users.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` naming the first violated invariant.
    pub fn verify_book_integrity(&self) -> Result<()> {
        let mut resting = 0usize;
        Self::verify_side(&self.bids, &self.index, &mut resting)?;
        Self::verify_side(&self.asks, &self.index, &mut resting)?;

        if resting != self.index.len() {
            return Err(LimitBookError::IntegrityViolation {
                reason: format!(
                    "index has {} entries but {} orders are resting",
                    self.index.len(),
                    resting
                ),
            });
        }

        if let (Some(best_bid), Some(best_ask)) = (self.best_bid(), self.best_ask()) {
            if best_bid >= best_ask {
                // A cross may only persist between one user's own orders.
                let mut users: HashSet<UserId> = HashSet::new();
                for level in self.bids.levels() {
                    if level.price() < best_ask {
                        break;
                    }
                    users.extend(level.iter().map(|o| o.user_id));
                }
                for level in self.asks.levels() {
                    if level.price() > best_bid {
                        break;
                    }
                    users.extend(level.iter().map(|o| o.user_id));
                }
                if users.len() > 1 {
                    return Err(LimitBookError::IntegrityViolation {
                        reason: format!(
                            "book crossed between distinct users: bid {best_bid} >= ask {best_ask}"
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    fn verify_side<B: BookSide>(
        side: &B,
        index: &OrderIndex,
        resting: &mut usize,
    ) -> Result<()> {
        let violation = |reason: String| LimitBookError::IntegrityViolation { reason };

        for level in side.levels() {
            if level.is_empty() {
                return Err(violation(format!("empty level at {}", level.price())));
            }
            for order in level.iter() {
                if order.price != level.price() {
                    return Err(violation(format!(
                        "{} priced {} inside level {}",
                        order.id,
                        order.price,
                        level.price()
                    )));
                }
                if order.quantity == 0 {
                    return Err(violation(format!("{} rests with zero quantity", order.id)));
                }
                let expected = Locator {
                    side: B::SIDE,
                    price: level.price(),
                    key: order.key(),
                };
                match index.get(order.id) {
                    Some(locator) if locator == expected => {}
                    Some(_) => {
                        return Err(violation(format!("{} indexed at a stale location", order.id)))
                    }
                    None => return Err(violation(format!("{} resting but unindexed", order.id))),
                }
                *resting += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use limitbook_types::Symbol;

    use crate::clock::ManualClock;

    use super::*;

    fn engine() -> MatchingEngine<ManualClock> {
        MatchingEngine::with_clock(
            BookConfig::new(Symbol::new("ACME")),
            ManualClock::new(1_000),
        )
    }

    fn px(ticks: i64) -> Price {
        Price::from_ticks(ticks)
    }

    #[test]
    fn insert_and_query_best_bid_ask() {
        let mut book = engine();
        book.add_order(OrderId::new(1), px(10_000), 1, Side::Buy, UserId::new(1), TimeInForce::Gtc)
            .unwrap();
        book.add_order(OrderId::new(2), px(9_900), 1, Side::Buy, UserId::new(2), TimeInForce::Gtc)
            .unwrap();
        book.add_order(OrderId::new(3), px(10_100), 1, Side::Sell, UserId::new(3), TimeInForce::Gtc)
            .unwrap();
        book.add_order(OrderId::new(4), px(10_200), 1, Side::Sell, UserId::new(4), TimeInForce::Gtc)
            .unwrap();

        assert_eq!(book.best_bid(), Some(px(10_000)));
        assert_eq!(book.best_ask(), Some(px(10_100)));
        assert_eq!(book.spread(), Some(Decimal::new(100, 2)));
        assert_eq!(book.mid_price(), Some(Decimal::new(10_050, 2)));
        assert_eq!(book.order_count(), 4);
        assert_eq!(book.bid_depth(), 2);
        assert_eq!(book.ask_depth(), 2);
        book.verify_book_integrity().unwrap();
    }

    #[test]
    fn empty_book_queries() {
        let book = engine();
        assert!(book.is_empty());
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.spread(), None);
        assert_eq!(book.mid_price(), None);
        book.verify_book_integrity().unwrap();
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut book = engine();
        let result =
            book.add_order(OrderId::new(1), px(10_000), 0, Side::Buy, UserId::new(1), TimeInForce::Gtc);
        assert!(matches!(result, Err(LimitBookError::InvalidQuantity { .. })));
        assert!(book.is_empty());
    }

    #[test]
    fn duplicate_resting_id_rejected() {
        let mut book = engine();
        book.add_order(OrderId::new(1), px(10_000), 10, Side::Buy, UserId::new(1), TimeInForce::Gtc)
            .unwrap();
        let result =
            book.add_order(OrderId::new(1), px(9_900), 5, Side::Buy, UserId::new(1), TimeInForce::Gtc);
        assert!(matches!(result, Err(LimitBookError::DuplicateId(_))));
        // The original order is untouched.
        assert_eq!(book.order(OrderId::new(1)).unwrap().quantity, 10);
        assert_eq!(book.order(OrderId::new(1)).unwrap().price, px(10_000));
        book.verify_book_integrity().unwrap();
    }

    #[test]
    fn cancel_removes_order_and_empty_level() {
        let mut book = engine();
        book.add_order(OrderId::new(1), px(10_000), 10, Side::Buy, UserId::new(1), TimeInForce::Gtc)
            .unwrap();
        assert_eq!(book.bid_depth(), 1);

        let cancelled = book.cancel_order(OrderId::new(1)).unwrap();
        assert_eq!(cancelled.id, OrderId::new(1));
        assert_eq!(cancelled.quantity, 10);
        assert!(book.is_empty());
        assert_eq!(book.bid_depth(), 0);
        book.verify_book_integrity().unwrap();
    }

    #[test]
    fn cancel_unknown_order() {
        let mut book = engine();
        let result = book.cancel_order(OrderId::new(404));
        assert!(matches!(result, Err(LimitBookError::OrderNotFound(_))));
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut book = MatchingEngine::with_clock(
            BookConfig::new(Symbol::new("ACME")),
            ManualClock::new(1_000),
        );
        book.add_order(OrderId::new(1), px(10_000), 1, Side::Buy, UserId::new(1), TimeInForce::Gtc)
            .unwrap();
        // Clock regression must not produce a smaller timestamp.
        book.clock.set(500);
        book.add_order(OrderId::new(2), px(10_000), 1, Side::Buy, UserId::new(2), TimeInForce::Gtc)
            .unwrap();

        let first = book.order(OrderId::new(1)).unwrap().timestamp;
        let second = book.order(OrderId::new(2)).unwrap().timestamp;
        assert!(second >= first);
        book.verify_book_integrity().unwrap();
    }

    #[test]
    fn snapshot_aggregates_levels_best_first() {
        let mut book = engine();
        book.add_order(OrderId::new(1), px(10_000), 10, Side::Buy, UserId::new(1), TimeInForce::Gtc)
            .unwrap();
        book.add_order(OrderId::new(2), px(10_000), 5, Side::Buy, UserId::new(2), TimeInForce::Gtc)
            .unwrap();
        book.add_order(OrderId::new(3), px(9_900), 7, Side::Buy, UserId::new(3), TimeInForce::Gtc)
            .unwrap();
        book.add_order(OrderId::new(4), px(10_100), 3, Side::Sell, UserId::new(4), TimeInForce::Gtc)
            .unwrap();

        let snap = book.snapshot();
        assert_eq!(snap.symbol, Symbol::new("ACME"));
        assert_eq!(snap.bids.len(), 2);
        assert_eq!(snap.bids[0].price, px(10_000));
        assert_eq!(snap.bids[0].quantity, 15);
        assert_eq!(snap.bids[0].orders, 2);
        assert_eq!(snap.bids[1].price, px(9_900));
        assert_eq!(snap.asks.len(), 1);
        assert_eq!(snap.asks[0].quantity, 3);
    }
}
