//! Business layer errors
//!
//! Every failure path of the service returns one of these variants so a
//! front end can tell validation problems from storage trouble.

use minibank_core::{AccountId, CoreError, CustomerId};
use minibank_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Validation errors ===
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Deposit of {amount} would exceed the maximum balance (current {balance})")]
    BalanceLimit { balance: Decimal, amount: Decimal },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Lookup errors ===
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Unknown name and wrong PIN are reported the same way.
    #[error("Authentication failed")]
    AuthFailed,

    // === Storage errors ===
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// The in-memory change was valid but the durable write failed. The
    /// caller's view of the account is no longer authoritative.
    #[error(
        "Account {account_id} may be out of sync with storage: balance {attempted_balance} was not persisted ({source})"
    )]
    PersistenceInconsistency {
        account_id: AccountId,
        attempted_balance: Decimal,
        #[source]
        source: PersistenceError,
    },
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl From<CoreError> for BusinessError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            CoreError::InsufficientFunds {
                requested,
                available,
            } => Self::InsufficientFunds {
                requested,
                available,
            },
            CoreError::NegativeBalance(balance) => Self::InvalidAmount(balance),
            CoreError::BalanceOverflow { balance, amount } => {
                Self::BalanceLimit { balance, amount }
            }
        }
    }
}

impl BusinessError {
    pub fn inconsistency(
        account_id: AccountId,
        attempted_balance: Decimal,
        source: PersistenceError,
    ) -> Self {
        Self::PersistenceInconsistency {
            account_id,
            attempted_balance,
            source,
        }
    }

    /// Expected, recoverable rejections that never touched storage
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InsufficientFunds { .. }
                | Self::BalanceLimit { .. }
                | Self::InvalidInput(_)
        )
    }

    /// Stored state may differ from what the caller last saw
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Self::PersistenceInconsistency { .. })
    }

    /// Storage failed, whether or not the account may have diverged
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::PersistenceInconsistency { .. }
        )
    }
}
