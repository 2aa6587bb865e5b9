//! Integration tests for the account service
//!
//! These run the service against a real SQLite file and, for the storage
//! failure cases, against a store that drops or misreports balance writes.

use async_trait::async_trait;
use minibank_business::{AccountService, BusinessError, Operation};
use minibank_core::{Account, AccountId, Customer, CustomerId};
use minibank_persistence::{
    AccountStore, Database, PersistenceError, PersistenceResult, SqliteStore, StoreConfig,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

async fn sqlite_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::from_path(dir.path().join("minibank.db"));
    let db = Database::init(&config).await.unwrap();
    (dir, db.store())
}

async fn service() -> (TempDir, SqliteStore, AccountService) {
    let (dir, store) = sqlite_store().await;
    let service = AccountService::new(Arc::new(store.clone()));
    (dir, store, service)
}

/// Scenario A setup: Alice / 1234 / checking / 100.00
async fn open_alice(service: &AccountService) -> Account {
    service
        .open_account("Alice", 1234, "checking", dec!(100.00))
        .await
        .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_authenticate_returns_opened_account() {
    let (_dir, _store, service) = service().await;
    let opened = open_alice(&service).await;

    let account = service.authenticate("Alice", 1234).await.unwrap();
    assert_eq!(account.id(), opened.id());
    assert_eq!(account.account_type(), "checking");
    assert_eq!(account.balance(), dec!(100.00));
}

#[tokio::test]
async fn test_deposit_persists_new_balance() {
    let (_dir, store, service) = service().await;
    let account = open_alice(&service).await;

    let change = service.deposit(account.id(), dec!(50.00)).await.unwrap();
    assert_eq!(change.operation, Operation::Deposit);
    assert_eq!(change.previous_balance, dec!(100.00));
    assert_eq!(change.new_balance(), dec!(150.00));

    let persisted = store.read_account(account.id()).await.unwrap();
    assert_eq!(persisted.balance(), dec!(150.00));
    assert_eq!(persisted, change.account);
}

#[tokio::test]
async fn test_withdraw_more_than_balance_is_rejected() {
    let (_dir, store, service) = service().await;
    let account = open_alice(&service).await;
    service.deposit(account.id(), dec!(50.00)).await.unwrap();

    let err = service.withdraw(account.id(), dec!(200.00)).await.unwrap_err();
    assert!(matches!(
        err,
        BusinessError::InsufficientFunds { requested, available }
            if requested == dec!(200.00) && available == dec!(150.00)
    ));

    let persisted = store.read_account(account.id()).await.unwrap();
    assert_eq!(persisted.balance(), dec!(150.00));
}

#[tokio::test]
async fn test_negative_withdrawal_is_invalid() {
    let (_dir, store, service) = service().await;
    let account = open_alice(&service).await;

    let err = service.withdraw(account.id(), dec!(-5.00)).await.unwrap_err();
    assert!(matches!(err, BusinessError::InvalidAmount(a) if a == dec!(-5.00)));
    assert!(err.is_validation());

    let err = service.deposit(account.id(), Decimal::ZERO).await.unwrap_err();
    assert!(matches!(err, BusinessError::InvalidAmount(_)));

    let persisted = store.read_account(account.id()).await.unwrap();
    assert_eq!(persisted.balance(), dec!(100.00));
}

#[tokio::test]
async fn test_wrong_pin_and_unknown_name_look_the_same() {
    let (_dir, _store, service) = service().await;
    open_alice(&service).await;

    let wrong_pin = service.authenticate("Alice", 9999).await.unwrap_err();
    let unknown = service.authenticate("Mallory", 1234).await.unwrap_err();
    assert!(matches!(wrong_pin, BusinessError::AuthFailed));
    assert!(matches!(unknown, BusinessError::AuthFailed));
    assert_eq!(wrong_pin.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_lost_write_reports_inconsistency() {
    let (_dir, inner) = sqlite_store().await;
    let store = Arc::new(FaultyStore::new(inner));
    let service = AccountService::new(store.clone());
    let account = open_alice(&service).await;
    service.deposit(account.id(), dec!(50.00)).await.unwrap();

    store.set_mode(WriteFault::Drop);
    let err = service.deposit(account.id(), dec!(10.00)).await.unwrap_err();
    match &err {
        BusinessError::PersistenceInconsistency {
            account_id,
            attempted_balance,
            ..
        } => {
            assert_eq!(*account_id, account.id());
            assert_eq!(*attempted_balance, dec!(160.00));
        }
        other => panic!("expected PersistenceInconsistency, got {other:?}"),
    }
    assert!(err.is_inconsistency());

    // Storage never committed the write
    let reread = service.get_account(account.id()).await.unwrap();
    assert_eq!(reread.balance(), dec!(150.00));
}

#[tokio::test]
async fn test_unacknowledged_write_rereads_committed_value() {
    let (_dir, inner) = sqlite_store().await;
    let store = Arc::new(FaultyStore::new(inner));
    let service = AccountService::new(store.clone());
    let account = open_alice(&service).await;

    store.set_mode(WriteFault::CommitThenFail);
    let err = service.deposit(account.id(), dec!(10.00)).await.unwrap_err();
    assert!(err.is_inconsistency());

    // Storage did commit; the re-read is what counts
    store.set_mode(WriteFault::None);
    let reread = service.get_account(account.id()).await.unwrap();
    assert_eq!(reread.balance(), dec!(110.00));
}

#[tokio::test]
async fn test_validation_failure_never_writes() {
    let (_dir, inner) = sqlite_store().await;
    let store = Arc::new(FaultyStore::new(inner));
    let service = AccountService::new(store.clone());
    let account = open_alice(&service).await;

    store.set_mode(WriteFault::Drop);
    let err = service.withdraw(account.id(), dec!(500)).await.unwrap_err();
    assert!(matches!(err, BusinessError::InsufficientFunds { .. }));
    assert_eq!(store.write_attempts(), 0);
}

#[tokio::test]
async fn test_deposit_past_maximum_balance_is_rejected() {
    let (_dir, inner) = sqlite_store().await;
    let store = Arc::new(FaultyStore::new(inner));
    let service = AccountService::new(store.clone());
    let account = service
        .open_account("Alice", 1234, "checking", Decimal::MAX)
        .await
        .unwrap();

    let err = service.deposit(account.id(), Decimal::ONE).await.unwrap_err();
    assert!(matches!(
        err,
        BusinessError::BalanceLimit { balance, amount }
            if balance == Decimal::MAX && amount == Decimal::ONE
    ));
    assert!(err.is_validation());
    assert_eq!(store.write_attempts(), 0);

    let reread = service.get_account(account.id()).await.unwrap();
    assert_eq!(reread.balance(), Decimal::MAX);
}

// ============================================================================
// Other service behaviour
// ============================================================================

#[tokio::test]
async fn test_unknown_account() {
    let (_dir, _store, service) = service().await;
    let err = service.deposit(42, dec!(1)).await.unwrap_err();
    assert!(matches!(err, BusinessError::NotFound(42)));

    let err = service.get_account(42).await.unwrap_err();
    assert!(matches!(err, BusinessError::NotFound(42)));

    let err = service.customer(42).await.unwrap_err();
    assert!(matches!(err, BusinessError::CustomerNotFound(42)));
}

#[tokio::test]
async fn test_open_account_validation() {
    let (_dir, store, service) = service().await;

    let err = service
        .open_account("   ", 1234, "checking", dec!(1))
        .await
        .unwrap_err();
    assert!(matches!(err, BusinessError::InvalidInput(_)));

    let err = service
        .open_account("Bob", 1234, "checking", dec!(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, BusinessError::InvalidAmount(_)));

    let account = service.open_account("Bob", 4321, "", dec!(0)).await.unwrap();
    assert_eq!(account.account_type(), "checking");
    assert_eq!(account.balance(), Decimal::ZERO);
    assert_eq!(store.list_accounts().await.unwrap().len(), 1);

    let owner = service.customer(account.owner_id()).await.unwrap();
    assert_eq!(owner.name, "Bob");
}

#[tokio::test]
async fn test_withdraw_to_zero_and_list() {
    let (_dir, _store, service) = service().await;
    let alice = open_alice(&service).await;
    let bob = service
        .open_account("Bob", 1, "savings", dec!(5))
        .await
        .unwrap();

    let change = service.withdraw(alice.id(), dec!(100.00)).await.unwrap();
    assert_eq!(change.new_balance(), Decimal::ZERO);

    let all = service.list_all().await.unwrap();
    let ids: Vec<AccountId> = all.iter().map(Account::id).collect();
    assert_eq!(ids, vec![alice.id(), bob.id()]);
    assert!(all.iter().all(|a| a.balance() >= Decimal::ZERO));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() {
    let (_dir, store, service) = service().await;
    let service = Arc::new(service);
    let account = open_alice(&service).await;

    let mut handles = Vec::new();
    for _ in 0..25 {
        let service = Arc::clone(&service);
        let id = account.id();
        handles.push(tokio::spawn(
            async move { service.withdraw(id, dec!(10.00)).await },
        ));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(BusinessError::InsufficientFunds { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(succeeded, 10);
    assert_eq!(rejected, 15);
    let persisted = store.read_account(account.id()).await.unwrap();
    assert_eq!(persisted.balance(), Decimal::ZERO);
}

// ============================================================================
// Fault-injecting store
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum WriteFault {
    None = 0,
    /// Write is not applied and an error is returned
    Drop = 1,
    /// Write is applied but an error is returned anyway
    CommitThenFail = 2,
}

struct FaultyStore {
    inner: SqliteStore,
    mode: AtomicU8,
    write_attempts: AtomicU8,
}

impl FaultyStore {
    fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            mode: AtomicU8::new(WriteFault::None as u8),
            write_attempts: AtomicU8::new(0),
        }
    }

    fn set_mode(&self, mode: WriteFault) {
        self.mode.store(mode as u8, Ordering::SeqCst);
    }

    fn mode(&self) -> WriteFault {
        match self.mode.load(Ordering::SeqCst) {
            1 => WriteFault::Drop,
            2 => WriteFault::CommitThenFail,
            _ => WriteFault::None,
        }
    }

    fn write_attempts(&self) -> u8 {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn injected() -> PersistenceError {
        PersistenceError::Io(std::io::Error::other("injected write failure"))
    }
}

#[async_trait]
impl AccountStore for FaultyStore {
    async fn create_customer(&self, name: &str, pin: i64) -> PersistenceResult<CustomerId> {
        self.inner.create_customer(name, pin).await
    }

    async fn create_account(
        &self,
        owner_id: CustomerId,
        account_type: &str,
        initial_balance: Decimal,
    ) -> PersistenceResult<AccountId> {
        self.inner
            .create_account(owner_id, account_type, initial_balance)
            .await
    }

    async fn read_customer(&self, id: CustomerId) -> PersistenceResult<Customer> {
        self.inner.read_customer(id).await
    }

    async fn read_account(&self, id: AccountId) -> PersistenceResult<Account> {
        self.inner.read_account(id).await
    }

    async fn read_account_by_credential(
        &self,
        name: &str,
        pin: i64,
    ) -> PersistenceResult<Account> {
        self.inner.read_account_by_credential(name, pin).await
    }

    async fn write_balance(
        &self,
        account_id: AccountId,
        new_balance: Decimal,
    ) -> PersistenceResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        match self.mode() {
            WriteFault::None => self.inner.write_balance(account_id, new_balance).await,
            WriteFault::Drop => Err(Self::injected()),
            WriteFault::CommitThenFail => {
                self.inner.write_balance(account_id, new_balance).await?;
                Err(Self::injected())
            }
        }
    }

    async fn list_accounts(&self) -> PersistenceResult<Vec<Account>> {
        self.inner.list_accounts().await
    }
}
