//! Fixed-point price type.
//!
//! A [`Price`] is an integer count of ticks (hundredths of the quote unit),
//! so it has exact equality and a total order and can serve as a `BTreeMap`
//! key. Binary floating point never enters the book: the `f64` constructor
//! is the only boundary, it validates its input, and it rounds half-up at
//! tick precision.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{TICKS_PER_UNIT, TICK_DECIMALS};
use crate::error::{LimitBookError, Result};

/// A money amount in ticks (hundredths).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Self = Self(0);

    /// Build a price from a real number, rounding half-up at tick
    /// precision: `floor(value * 100 + 0.5)`.
    ///
    /// # Errors
    ///
    /// `InvalidPrice` if `value` is NaN, infinite, or negative.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(LimitBookError::InvalidPrice { value });
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let ticks = (value * TICKS_PER_UNIT as f64 + 0.5).floor() as i64;
        Ok(Self(ticks))
    }

    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    #[must_use]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Decimal rendering at tick precision, for display and reporting only.
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, TICK_DECIMALS)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_exact_cents() {
        assert_eq!(Price::from_f64(100.0).unwrap(), Price::from_ticks(10_000));
        assert_eq!(Price::from_f64(0.01).unwrap(), Price::from_ticks(1));
        assert_eq!(Price::from_f64(0.0).unwrap(), Price::ZERO);
    }

    #[test]
    fn from_f64_rounds_half_up() {
        // 100.125 * 100 = 10012.5 exactly in binary; half-up gives 10013.
        assert_eq!(Price::from_f64(100.125).unwrap(), Price::from_ticks(10_013));
        assert_eq!(Price::from_f64(100.004).unwrap(), Price::from_ticks(10_000));
        assert_eq!(Price::from_f64(100.006).unwrap(), Price::from_ticks(10_001));
    }

    #[test]
    fn from_f64_rejects_non_finite() {
        assert!(Price::from_f64(f64::NAN).is_err());
        assert!(Price::from_f64(f64::INFINITY).is_err());
        assert!(Price::from_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn from_f64_rejects_negative() {
        let err = Price::from_f64(-1.0).unwrap_err();
        assert!(matches!(err, LimitBookError::InvalidPrice { .. }));
    }

    #[test]
    fn ordering_is_exact() {
        let a = Price::from_f64(100.10).unwrap();
        let b = Price::from_f64(100.11).unwrap();
        assert!(a < b);
        assert_eq!(a, Price::from_ticks(10_010));
    }

    #[test]
    fn display_at_tick_precision() {
        assert_eq!(format!("{}", Price::from_ticks(10_000)), "100.00");
        assert_eq!(format!("{}", Price::from_ticks(10_013)), "100.13");
    }

    #[test]
    fn serde_roundtrip() {
        let price = Price::from_ticks(10_050);
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, back);
    }
}
