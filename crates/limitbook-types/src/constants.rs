//! System-wide constants for the LimitBook matching engine.

/// Number of price ticks per quote unit (prices are kept in hundredths).
pub const TICKS_PER_UNIT: i64 = 100;

/// Decimal places implied by [`TICKS_PER_UNIT`].
pub const TICK_DECIMALS: u32 = 2;

/// Default minimum order quantity accepted by a book.
pub const DEFAULT_MIN_ORDER_QTY: u64 = 1;
