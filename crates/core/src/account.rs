//! # Account Module
//!
//! Định nghĩa Account - ledger entity cho một tài khoản.
//! Account giữ balance trong memory và bảo đảm `balance >= 0` sau mọi mutation.
//! Bản canonical nằm trong storage; instance trong memory chỉ là view tạm thời.

use crate::customer::CustomerId;
use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// ID của account, do storage cấp khi tạo
pub type AccountId = i64;

/// Tài khoản của một customer.
///
/// Fields là private: balance chỉ thay đổi qua [`Account::deposit`] và
/// [`Account::withdraw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    owner_id: CustomerId,
    account_type: String,
    balance: Decimal,
}

impl Account {
    /// Tạo Account từ dữ liệu đã có id. Balance âm bị từ chối.
    pub fn new(
        id: AccountId,
        owner_id: CustomerId,
        account_type: impl Into<String>,
        balance: Decimal,
    ) -> CoreResult<Self> {
        if balance < Decimal::ZERO {
            return Err(CoreError::NegativeBalance(balance));
        }
        Ok(Self {
            id,
            owner_id,
            account_type: account_type.into(),
            balance,
        })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner_id(&self) -> CustomerId {
        self.owner_id
    }

    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Nạp tiền. `amount` phải dương.
    pub fn deposit(&mut self, amount: Decimal) -> CoreResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(CoreError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(self.balance)
    }

    /// Rút tiền. `amount` phải dương và không vượt quá balance.
    ///
    /// Check và apply dùng cùng một snapshot vì `&mut self` là exclusive.
    pub fn withdraw(&mut self, amount: Decimal) -> CoreResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(CoreError::insufficient_funds(amount, self.balance));
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(CoreError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(self.balance)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account{{id={}, owner={}, type='{}', balance={:.2}}}",
            self.id, self.owner_id, self.account_type, self.balance
        )
    }
}
