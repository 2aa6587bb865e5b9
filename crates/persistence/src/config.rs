//! Store configuration
//!
//! Các tham số kết nối SQLite: file path, pool size, timeouts.

use crate::error::{PersistenceError, PersistenceResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default database file
pub const DEFAULT_DB_PATH: &str = "data/minibank.db";

/// Cấu hình cho SQLite store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Đường dẫn file database
    pub path: PathBuf,
    /// Số connection tối đa trong pool
    pub max_connections: u32,
    /// Thời gian tối đa chờ lấy connection từ pool
    pub acquire_timeout: Duration,
    /// SQLite busy timeout khi file đang bị lock
    pub busy_timeout: Duration,
    /// Tạo file nếu chưa có
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_millis(5_000),
            create_if_missing: true,
        }
    }
}

impl StoreConfig {
    /// Config mặc định trỏ tới `path`
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Chỉ mở file đã tồn tại (không tự tạo)
    pub fn must_exist(mut self) -> Self {
        self.create_if_missing = false;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub(crate) fn validate(&self) -> PersistenceResult<()> {
        if self.max_connections == 0 {
            return Err(PersistenceError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.path.as_os_str().is_empty() {
            return Err(PersistenceError::Configuration(
                "database path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(self.busy_timeout)
    }

    pub(crate) fn pool_options(&self) -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}
