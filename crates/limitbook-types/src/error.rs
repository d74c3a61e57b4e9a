//! Error types for the LimitBook matching engine.
//!
//! All errors use the `LB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Book lookup errors
//! - 3xx: Integrity errors

use thiserror::Error;

use crate::ids::OrderId;

/// Central error enum for all LimitBook operations.
///
/// A rejected command leaves the book unchanged. Note that an unfillable
/// FOK order is **not** an error: it is a silent rejection that returns an
/// empty trade list, indistinguishable from "no matchable liquidity".
#[derive(Debug, Error)]
pub enum LimitBookError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The price was NaN, infinite, or negative.
    #[error("LB_ERR_100: invalid price: {value}")]
    InvalidPrice { value: f64 },

    /// The quantity was zero or outside the configured bounds.
    #[error("LB_ERR_101: invalid quantity: {quantity}")]
    InvalidQuantity { quantity: u64 },

    // =================================================================
    // Book Lookup Errors (2xx)
    // =================================================================
    /// Cancel or modify referenced an id that is not resting.
    #[error("LB_ERR_200: order not found: {0}")]
    OrderNotFound(OrderId),

    /// Add of an id that is already resting on the book.
    #[error("LB_ERR_201: order already resting: {0}")]
    DuplicateId(OrderId),

    // =================================================================
    // Integrity Errors (3xx)
    // =================================================================
    /// A book invariant failed — the index and levels have diverged.
    #[error("LB_ERR_300: book integrity violation: {reason}")]
    IntegrityViolation { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LimitBookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = LimitBookError::OrderNotFound(OrderId::new(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("LB_ERR_200"), "Got: {msg}");
        assert!(msg.contains("order:7"));
    }

    #[test]
    fn all_errors_have_lb_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(LimitBookError::InvalidPrice { value: f64::NAN }),
            Box::new(LimitBookError::InvalidQuantity { quantity: 0 }),
            Box::new(LimitBookError::DuplicateId(OrderId::new(1))),
            Box::new(LimitBookError::IntegrityViolation {
                reason: "test".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("LB_ERR_"),
                "Error missing LB_ERR_ prefix: {msg}"
            );
        }
    }
}
