//! Pricing error types

use thiserror::Error;

/// Errors raised while validating or ranking price candidates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("Invalid unit: '{0}' (expected one of kg, g, l, ml, piece, pack)")]
    InvalidUnit(String),

    #[error("Invalid price: {0} (must be a finite number greater than 0)")]
    InvalidPrice(f64),

    #[error("Invalid amount: {0} (must be a finite number greater than 0)")]
    InvalidAmount(f64),

    #[error("At least 2 products with a price and amount are required, got {valid}")]
    InsufficientCandidates { valid: usize },

    #[error("At most {max} products can be compared at once")]
    TooManyCandidates { max: usize },

    #[error("Winner '{0}' is not one of the compared products")]
    UnknownWinner(String),
}
