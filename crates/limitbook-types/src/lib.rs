//! # limitbook-types
//!
//! Shared types, errors, and configuration for the **LimitBook** matching
//! engine.
//!
//! This crate is the leaf dependency of the workspace — the engine crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`UserId`], [`Symbol`]
//! - **Money**: [`Price`] (fixed-point tick count)
//! - **Order model**: [`Order`], [`Side`], [`TimeInForce`], [`QueueKey`]
//! - **Trade model**: [`Trade`]
//! - **Depth model**: [`BookSnapshot`], [`LevelTotals`]
//! - **Configuration**: [`BookConfig`]
//! - **Errors**: [`LimitBookError`] with `LB_ERR_` prefix codes
//! - **Constants**: tick scale and validation defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod price;
pub mod snapshot;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use limitbook_types::{Order, Side, Trade, Price, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use price::*;
pub use snapshot::*;
pub use trade::*;

// Constants are accessed via `limitbook_types::constants::FOO`
// (not re-exported to avoid name collisions).
