//! Identifiers used throughout LimitBook.
//!
//! Order and user ids are chosen by the caller — the engine never mints
//! them. An [`OrderId`] must be unique over the lifetime of the book while
//! it rests; reuse after cancellation or full consumption is permitted.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Externally chosen order identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// Identifier of the account that owns an order. Drives self-match
/// prevention: two orders with the same `UserId` never trade against each
/// other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl UserId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// The instrument a book serves (e.g., "ACME").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_ordering() {
        assert!(OrderId::new(1) < OrderId::new(2));
        assert_eq!(OrderId::new(7), OrderId::from(7));
    }

    #[test]
    fn order_id_display() {
        assert_eq!(format!("{}", OrderId::new(42)), "order:42");
    }

    #[test]
    fn user_id_display() {
        assert_eq!(format!("{}", UserId::new(1001)), "user:1001");
    }

    #[test]
    fn symbol_display() {
        let sym = Symbol::new("ACME");
        assert_eq!(sym.as_str(), "ACME");
        assert_eq!(format!("{sym}"), "ACME");
    }

    #[test]
    fn serde_roundtrips() {
        let oid = OrderId::new(9);
        let json = serde_json::to_string(&oid).unwrap();
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);

        let sym = Symbol::new("ACME");
        let json = serde_json::to_string(&sym).unwrap();
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(sym, back);
    }
}
