//! # Minibank Business
//!
//! Business logic layer - validated balance mutation + persistence as one
//! logical step, with an explicit outcome when the two diverge.

pub mod error;
pub mod locks;
pub mod services;

pub use error::{BusinessError, BusinessResult};
pub use locks::{AccountGuard, AccountLocks};
pub use services::{AccountService, BalanceChange, Operation};
