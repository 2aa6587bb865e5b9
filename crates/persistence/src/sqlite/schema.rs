//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables `customers` và `accounts`.
//! Balance lưu dạng TEXT để giữ nguyên độ chính xác của Decimal.

use crate::error::{PersistenceError, PersistenceResult};
use minibank_core::{Account, Customer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// DDL idempotent (create-if-absent), chạy bởi [`crate::bootstrap`]
pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        pin INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL,
        account_type TEXT NOT NULL,
        balance TEXT NOT NULL DEFAULT '0',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (customer_id) REFERENCES customers(id)
    );

    CREATE INDEX IF NOT EXISTS idx_customers_name ON customers(name);
    CREATE INDEX IF NOT EXISTS idx_accounts_customer ON accounts(customer_id);
"#;

/// Row type cho bảng `customers`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub pin: i64,
}

/// Row type cho bảng `accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub customer_id: i64,
    pub account_type: String,
    pub balance: String, // Decimal stored as TEXT
}

/// Parse balance TEXT thành Decimal
pub fn parse_balance(raw: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| PersistenceError::InvalidDecimal(format!("{raw}: {e}")))
}

// === Conversion implementations ===

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer::new(row.id, row.name, row.pin)
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Self> {
        let balance = parse_balance(&row.balance)?;
        Account::new(row.id, row.customer_id, row.account_type, balance)
            .map_err(|e| PersistenceError::corrupt("Account", row.id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(balance: &str) -> AccountRow {
        AccountRow {
            id: 1,
            customer_id: 2,
            account_type: "checking".to_string(),
            balance: balance.to_string(),
        }
    }

    #[test]
    fn test_account_row_conversion() {
        let account = Account::try_from(row("100.00")).unwrap();
        assert_eq!(account.id(), 1);
        assert_eq!(account.owner_id(), 2);
        assert_eq!(account.balance(), dec!(100.00));
        assert_eq!(account.account_type(), "checking");
    }

    #[test]
    fn test_unparsable_balance() {
        let err = Account::try_from(row("abc")).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidDecimal(_)));
    }

    #[test]
    fn test_negative_stored_balance_is_corrupt() {
        let err = Account::try_from(row("-1")).unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptRecord { .. }));
    }
}
