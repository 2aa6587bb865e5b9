//! Repository implementations cho SQLite
//!
//! CRUD operations cho `customers` và `accounts`. Mọi hàm nhận một
//! `Executor` để dùng được với pool hoặc bên trong một transaction.

use crate::config::StoreConfig;
use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::{AccountRow, CustomerRow, SCHEMA};
use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

// ============================================================================
// Customer Repository
// ============================================================================

/// Repository cho customers table
pub struct CustomerRepo;

impl CustomerRepo {
    /// Thêm customer mới, trả về id vừa cấp
    pub async fn insert<'e, E>(executor: E, name: &str, pin: i64) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("INSERT INTO customers (name, pin) VALUES (?, ?)")
            .bind(name)
            .bind(pin)
            .execute(executor)
            .await?;
        let id = result.last_insert_rowid();
        debug!(customer_id = id, "inserted customer");
        Ok(id)
    }

    /// Lấy customer theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<CustomerRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CustomerRow>("SELECT id, name, pin FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Customer", id))
    }

    /// Đếm customers
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository cho accounts table
pub struct AccountRepo;

impl AccountRepo {
    /// Thêm account mới. Balance âm bị từ chối trước khi ghi.
    pub async fn insert<'e, E>(
        executor: E,
        customer_id: i64,
        account_type: &str,
        balance: Decimal,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if balance < Decimal::ZERO {
            return Err(PersistenceError::NegativeBalance(balance));
        }
        let result = sqlx::query(
            "INSERT INTO accounts (customer_id, account_type, balance) VALUES (?, ?, ?)",
        )
        .bind(customer_id)
        .bind(account_type)
        .bind(balance.to_string())
        .execute(executor)
        .await?;
        let id = result.last_insert_rowid();
        debug!(account_id = id, customer_id, "inserted account");
        Ok(id)
    }

    /// Lấy account theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: i64) -> PersistenceResult<AccountRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>(
            "SELECT id, customer_id, account_type, balance FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    /// Lấy account đầu tiên (theo thứ tự tạo) của customer khớp name + pin
    pub async fn get_first_by_credential<'e, E>(
        executor: E,
        name: &str,
        pin: i64,
    ) -> PersistenceResult<Option<AccountRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT a.id, a.customer_id, a.account_type, a.balance
            FROM accounts a
            JOIN customers c ON a.customer_id = c.id
            WHERE c.name = ? AND c.pin = ?
            ORDER BY a.id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(pin)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Ghi đè balance bằng một câu UPDATE duy nhất
    pub async fn update_balance<'e, E>(
        executor: E,
        id: i64,
        balance: Decimal,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if balance < Decimal::ZERO {
            return Err(PersistenceError::NegativeBalance(balance));
        }
        let result = sqlx::query("UPDATE accounts SET balance = ? WHERE id = ?")
            .bind(balance.to_string())
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", id));
        }
        debug!(account_id = id, %balance, "updated balance");
        Ok(())
    }

    /// Lấy tất cả accounts theo thứ tự id
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<AccountRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, customer_id, account_type, balance FROM accounts ORDER BY id ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Đếm accounts
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Khởi tạo database connection pool
pub async fn create_pool(config: &StoreConfig) -> PersistenceResult<SqlitePool> {
    config.validate()?;
    if config.create_if_missing {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let pool = config
        .pool_options()
        .connect_with(config.connect_options())
        .await?;
    debug!(path = %config.path.display(), "opened sqlite pool");
    Ok(pool)
}

/// Tạo schema nếu chưa có. Gọi nhiều lần không sao.
pub async fn bootstrap(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    debug!("schema bootstrapped");
    Ok(())
}
