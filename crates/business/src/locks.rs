//! Per-account mutation locks
//!
//! Load, validate and write of a balance must not interleave with another
//! mutation of the same account. Different accounts never contend.
//! A slot is dropped from the registry once no caller holds or awaits it.

use minibank_core::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Registry handing out one async mutex per account id
#[derive(Debug, Default)]
pub struct AccountLocks {
    slots: Mutex<HashMap<AccountId, Slot>>,
}

/// Exclusive hold on one account. Releases on drop.
pub struct AccountGuard<'a> {
    locks: &'a AccountLocks,
    account_id: AccountId,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other mutation of `account_id` is in flight.
    pub async fn lock(&self, account_id: AccountId) -> AccountGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(account_id).or_default())
        };
        let guard = Arc::clone(&slot).lock_owned().await;
        AccountGuard {
            locks: self,
            account_id,
            slot,
            guard: Some(guard),
        }
    }
}

impl Drop for AccountGuard<'_> {
    fn drop(&mut self) {
        // Release first so the strong count below only sees the registry,
        // this guard and any waiters.
        self.guard.take();
        let mut slots = self
            .locks
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(&self.account_id);
        }
    }
}
