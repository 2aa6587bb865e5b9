//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx và IO errors.
//! Cause gốc luôn giữ lại để chẩn đoán, nhưng không thuộc logical contract.

use rust_decimal::Decimal;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    // === Value errors ===
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Refusing to store negative balance: {0}")]
    NegativeBalance(Decimal),

    #[error("Corrupt {entity} record {id}: {reason}")]
    CorruptRecord {
        entity: String,
        id: String,
        reason: String,
    },

    // === Configuration errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation(db_err.message().to_string());
            }
        }
        Self::Database(err)
    }
}

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn corrupt(entity: &str, id: impl ToString, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            entity: entity.to_string(),
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Kiểm tra có phải lỗi database không
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ForeignKeyViolation(_))
    }
}
