//! # Minibank Core
//!
//! Domain types cho Minibank: [`Account`] (ledger entity) và [`Customer`].
//!
//! Các type ở đây không biết gì về storage. Mọi thay đổi balance chỉ xảy ra
//! trong memory; việc persist là trách nhiệm của tầng business.

pub mod account;
pub mod customer;
pub mod error;

pub use account::{Account, AccountId};
pub use customer::{Customer, CustomerId};
pub use error::{CoreError, CoreResult};

/// Account type mặc định khi front end không chỉ định
pub const DEFAULT_ACCOUNT_TYPE: &str = "checking";
