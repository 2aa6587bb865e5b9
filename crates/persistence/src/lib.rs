//! # Minibank Persistence
//!
//! Persistence layer cho Minibank - SQLite store cho customers và accounts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    Database                      │
//! │  ┌─────────────┐   ┌──────────┐   ┌───────────┐  │
//! │  │   SQLite    │   │  Repos   │   │  Store    │  │
//! │  │   (state)   │   │ (queries)│   │ (gateway) │  │
//! │  └─────────────┘   └──────────┘   └───────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minibank_persistence::{AccountStore, Database, StoreConfig};
//!
//! let db = Database::init(&StoreConfig::from_path("data/minibank.db")).await?;
//! let store = db.store();
//! let account = store.read_account(1).await?;
//! ```

pub mod config;
pub mod error;
pub mod sqlite;
pub mod store;

pub use config::{StoreConfig, DEFAULT_DB_PATH};
pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{AccountRow, CustomerRow};
pub use sqlite::{bootstrap, create_pool, AccountRepo, CustomerRepo, SqliteStore};
pub use store::AccountStore;

use sqlx::SqlitePool;

/// Database facade - pool + schema bootstrap
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Mở pool, không đụng tới schema
    pub async fn connect(config: &StoreConfig) -> PersistenceResult<Self> {
        let pool = create_pool(config).await?;
        Ok(Self { pool })
    }

    /// Mở pool và tạo schema nếu chưa có
    pub async fn init(config: &StoreConfig) -> PersistenceResult<Self> {
        let db = Self::connect(config).await?;
        bootstrap(&db.pool).await?;
        Ok(db)
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store dùng chung pool này
    pub fn store(&self) -> SqliteStore {
        SqliteStore::new(self.pool.clone())
    }

    /// Số customers và accounts hiện có
    pub async fn counts(&self) -> PersistenceResult<(i64, i64)> {
        let customers = CustomerRepo::count(&self.pool).await?;
        let accounts = AccountRepo::count(&self.pool).await?;
        Ok((customers, accounts))
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
