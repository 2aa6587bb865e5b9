//! Account service
//!
//! Orchestrates ledger entity mutation and the durable balance write as one
//! logical step:
//!
//! ```text
//! Requested -> Validating -> Rejected
//!                         -> Applying -> Persisted
//!                                     -> Inconsistent
//! ```

use crate::error::{BusinessError, BusinessResult};
use crate::locks::AccountLocks;
use minibank_core::{Account, AccountId, Customer, CustomerId, DEFAULT_ACCOUNT_TYPE};
use minibank_persistence::{AccountStore, PersistenceError};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Balance-changing operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Withdraw,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt of a persisted deposit or withdrawal
#[derive(Debug, Clone)]
pub struct BalanceChange {
    pub operation: Operation,
    pub amount: Decimal,
    pub previous_balance: Decimal,
    /// Account as it now stands in storage
    pub account: Account,
}

impl BalanceChange {
    pub fn new_balance(&self) -> Decimal {
        self.account.balance()
    }
}

/// Account Service - deposit, withdraw, authenticate, listing
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    locks: AccountLocks,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            locks: AccountLocks::new(),
        }
    }

    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    /// Create a customer together with its first account.
    ///
    /// An empty account type falls back to "checking".
    pub async fn open_account(
        &self,
        name: &str,
        pin: i64,
        account_type: &str,
        initial_balance: Decimal,
    ) -> BusinessResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BusinessError::InvalidInput("name cannot be empty".to_string()));
        }
        if pin < 0 {
            return Err(BusinessError::InvalidInput("PIN must be non-negative".to_string()));
        }
        if initial_balance < Decimal::ZERO {
            return Err(BusinessError::InvalidAmount(initial_balance));
        }
        let account_type = match account_type.trim() {
            "" => DEFAULT_ACCOUNT_TYPE,
            other => other,
        };

        let (customer_id, account_id) = self
            .store
            .open_account(name, pin, account_type, initial_balance)
            .await?;
        info!(customer_id, account_id, account_type, "account opened");

        self.get_account(account_id).await
    }

    /// Current persisted state of an account
    pub async fn get_account(&self, account_id: AccountId) -> BusinessResult<Account> {
        self.store
            .read_account(account_id)
            .await
            .map_err(|e| not_found_as(e, BusinessError::NotFound(account_id)))
    }

    pub async fn customer(&self, customer_id: CustomerId) -> BusinessResult<Customer> {
        self.store
            .read_customer(customer_id)
            .await
            .map_err(|e| not_found_as(e, BusinessError::CustomerNotFound(customer_id)))
    }

    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> BusinessResult<BalanceChange> {
        self.apply(account_id, Operation::Deposit, amount).await
    }

    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
    ) -> BusinessResult<BalanceChange> {
        self.apply(account_id, Operation::Withdraw, amount).await
    }

    /// Look up the account for a name + PIN pair.
    ///
    /// Misses are always [`BusinessError::AuthFailed`]; which half of the
    /// credential was wrong is not revealed.
    pub async fn authenticate(&self, name: &str, pin: i64) -> BusinessResult<Account> {
        match self.store.read_account_by_credential(name, pin).await {
            Ok(account) => {
                debug!(account_id = account.id(), "authenticated");
                Ok(account)
            }
            Err(e) if e.is_not_found() => {
                warn!("authentication failed");
                Err(BusinessError::AuthFailed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All accounts, for administrative listing
    pub async fn list_all(&self) -> BusinessResult<Vec<Account>> {
        Ok(self.store.list_accounts().await?)
    }

    async fn apply(
        &self,
        account_id: AccountId,
        operation: Operation,
        amount: Decimal,
    ) -> BusinessResult<BalanceChange> {
        let _guard = self.locks.lock(account_id).await;

        let mut account = self.get_account(account_id).await?;
        let previous_balance = account.balance();
        debug!(account_id, %operation, %amount, %previous_balance, "validating");

        let applied = match operation {
            Operation::Deposit => account.deposit(amount),
            Operation::Withdraw => account.withdraw(amount),
        };
        if let Err(err) = applied {
            warn!(account_id, %operation, %amount, %err, "rejected");
            return Err(err.into());
        }

        let new_balance = account.balance();
        if let Err(source) = self.store.write_balance(account_id, new_balance).await {
            error!(
                account_id,
                %operation,
                %new_balance,
                error = %source,
                "balance validated but not persisted"
            );
            return Err(BusinessError::inconsistency(account_id, new_balance, source));
        }

        info!(account_id, %operation, %amount, %new_balance, "persisted");
        Ok(BalanceChange {
            operation,
            amount,
            previous_balance,
            account,
        })
    }
}

fn not_found_as(err: PersistenceError, not_found: BusinessError) -> BusinessError {
    if err.is_not_found() {
        not_found
    } else {
        BusinessError::Persistence(err)
    }
}
