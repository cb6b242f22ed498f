//! Error types for the Till engine.

use crate::{money::Pesos, tier::PriceTier};
use thiserror::Error;

/// All possible errors from the Till engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("not enough stock for {tier}: requested {requested}, available {available}")]
    InsufficientStock {
        tier: PriceTier,
        requested: u32,
        available: u32,
    },

    #[error("insufficient payment: total is {required}, received {paid}")]
    InsufficientPayment { required: Pesos, paid: Pesos },

    #[error("unknown price tier: {0}")]
    UnknownTier(u32),

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
