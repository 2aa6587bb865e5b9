//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod repos;
pub mod schema;
pub mod store;

pub use repos::{bootstrap, create_pool, AccountRepo, CustomerRepo};
pub use schema::{AccountRow, CustomerRow};
pub use store::SqliteStore;
