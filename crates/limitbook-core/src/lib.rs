//! # limitbook-core
//!
//! **Price-time priority matching engine for a single-symbol limit order
//! book.**
//!
//! The engine processes one command at a time to completion:
//!
//! - **Two-sided book**: bid and ask levels in price order, FIFO within a
//!   level
//! - **Price-time priority**: best price first; among equal prices, the
//!   earliest order
//! - **Time in force**: GTC rests the residual, IOC discards it, FOK is
//!   all-or-nothing with a dry-run feasibility pass
//! - **Self-match prevention**: resting orders of the incoming order's own
//!   user are skipped, never consumed
//! - **O(log) cancel/modify**: an id index records each resting order's
//!   side, level price, and queue key

pub mod book_side;
pub mod clock;
pub mod engine;
pub mod order_index;
pub mod price_level;

pub use book_side::{AskBook, BidBook, BookSide};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::MatchingEngine;
pub use order_index::{Locator, OrderIndex};
pub use price_level::PriceLevel;
