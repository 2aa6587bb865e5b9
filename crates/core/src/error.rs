//! # Error Module
//!
//! Domain errors cho ledger entity sử dụng thiserror.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Chỉ gồm lỗi validation của balance mutation, không liên quan đến storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Negative balance not allowed: {0}")]
    NegativeBalance(Decimal),

    #[error("Balance overflow: applying {amount} to {balance} is out of range")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn insufficient_funds(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }
}
