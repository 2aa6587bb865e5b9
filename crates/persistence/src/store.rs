//! # Account Store
//!
//! Persistence gateway: trait mà tầng business dùng để đọc/ghi customers
//! và accounts. Storage là nguồn sự thật duy nhất cho state sau restart.

use crate::error::PersistenceResult;
use async_trait::async_trait;
use minibank_core::{Account, AccountId, Customer, CustomerId};
use rust_decimal::Decimal;

/// Durable store cho customers và accounts.
///
/// Mọi lỗi ở tầng storage trả về [`crate::PersistenceError`], không panic.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Tạo customer mới, trả về id vừa cấp
    async fn create_customer(&self, name: &str, pin: i64) -> PersistenceResult<CustomerId>;

    /// Tạo account cho customer đã tồn tại. `initial_balance` phải >= 0.
    async fn create_account(
        &self,
        owner_id: CustomerId,
        account_type: &str,
        initial_balance: Decimal,
    ) -> PersistenceResult<AccountId>;

    /// Tạo customer kèm account đầu tiên.
    ///
    /// Implementation mặc định gọi lần lượt hai hàm trên nên không atomic;
    /// backend có transaction nên override.
    async fn open_account(
        &self,
        name: &str,
        pin: i64,
        account_type: &str,
        initial_balance: Decimal,
    ) -> PersistenceResult<(CustomerId, AccountId)> {
        let customer_id = self.create_customer(name, pin).await?;
        let account_id = self
            .create_account(customer_id, account_type, initial_balance)
            .await?;
        Ok((customer_id, account_id))
    }

    async fn read_customer(&self, id: CustomerId) -> PersistenceResult<Customer>;

    async fn read_account(&self, id: AccountId) -> PersistenceResult<Account>;

    /// Account đầu tiên (theo thứ tự tạo) của customer khớp name + pin.
    /// Customer có nhiều accounts vẫn chỉ trả về một, không phải lỗi.
    async fn read_account_by_credential(&self, name: &str, pin: i64)
        -> PersistenceResult<Account>;

    /// Thay balance đã persist. Reader không bao giờ thấy write dở dang.
    async fn write_balance(&self, account_id: AccountId, new_balance: Decimal)
        -> PersistenceResult<()>;

    /// Snapshot tất cả accounts, thứ tự ổn định trong một lần gọi
    async fn list_accounts(&self) -> PersistenceResult<Vec<Account>>;
}
