//! SQLite implementation của [`AccountStore`]
//!
//! Mỗi lời gọi lấy một connection từ pool và trả lại khi xong.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::repos::{AccountRepo, CustomerRepo};
use crate::store::AccountStore;
use async_trait::async_trait;
use minibank_core::{Account, AccountId, Customer, CustomerId};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

/// Account store trên SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn create_customer(&self, name: &str, pin: i64) -> PersistenceResult<CustomerId> {
        CustomerRepo::insert(&self.pool, name, pin).await
    }

    async fn create_account(
        &self,
        owner_id: CustomerId,
        account_type: &str,
        initial_balance: Decimal,
    ) -> PersistenceResult<AccountId> {
        AccountRepo::insert(&self.pool, owner_id, account_type, initial_balance).await
    }

    async fn open_account(
        &self,
        name: &str,
        pin: i64,
        account_type: &str,
        initial_balance: Decimal,
    ) -> PersistenceResult<(CustomerId, AccountId)> {
        let mut tx = self.pool.begin().await?;
        let customer_id = CustomerRepo::insert(&mut *tx, name, pin).await?;
        // Lỗi ở đây drop `tx` => rollback, không để lại customer mồ côi
        let account_id =
            AccountRepo::insert(&mut *tx, customer_id, account_type, initial_balance).await?;
        tx.commit().await?;
        debug!(customer_id, account_id, "opened account");
        Ok((customer_id, account_id))
    }

    async fn read_customer(&self, id: CustomerId) -> PersistenceResult<Customer> {
        let row = CustomerRepo::get_by_id(&self.pool, id).await?;
        Ok(row.into())
    }

    async fn read_account(&self, id: AccountId) -> PersistenceResult<Account> {
        let row = AccountRepo::get_by_id(&self.pool, id).await?;
        Account::try_from(row)
    }

    async fn read_account_by_credential(
        &self,
        name: &str,
        pin: i64,
    ) -> PersistenceResult<Account> {
        AccountRepo::get_first_by_credential(&self.pool, name, pin)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", format!("credential:{name}")))
            .and_then(Account::try_from)
    }

    async fn write_balance(
        &self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> PersistenceResult<()> {
        AccountRepo::update_balance(&self.pool, account_id, new_balance).await
    }

    async fn list_accounts(&self) -> PersistenceResult<Vec<Account>> {
        AccountRepo::get_all(&self.pool)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}
