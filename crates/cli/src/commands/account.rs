//! Account commands: open, login, deposit, withdraw, balance, list

use anyhow::{Context, Result};
use minibank_business::{AccountService, BalanceChange};
use minibank_core::Account;
use minibank_persistence::StoreConfig;
use rust_decimal::Decimal;

use super::report;
use crate::db;
use crate::Credential;

/// Create customer and an initial account
pub async fn open(
    config: &StoreConfig,
    credential: &Credential,
    account_type: &str,
    initial: Decimal,
) -> Result<()> {
    let (db, service) = db::service(config).await?;

    let account = service
        .open_account(&credential.name, credential.pin, account_type, initial)
        .await
        .map_err(report)?;

    println!("✅ Account created successfully!");
    println!("   Account ID: {}", account.id());
    println!("   Type:       {}", account.account_type());
    println!("   Balance:    {:.2}", account.balance());

    db.close().await;
    Ok(())
}

/// Login by customer name + PIN
pub async fn login(config: &StoreConfig, credential: &Credential) -> Result<()> {
    let (db, service) = db::service(config).await?;

    let account = authenticate(&service, credential).await?;
    println!("Welcome, {}! (Account #{})", credential.name, account.id());
    println!("   Type:    {}", account.account_type());
    println!("   Balance: {:.2}", account.balance());

    db.close().await;
    Ok(())
}

pub async fn deposit(config: &StoreConfig, credential: &Credential, amount: Decimal) -> Result<()> {
    let (db, service) = db::service(config).await?;

    let account = authenticate(&service, credential).await?;
    let change = service
        .deposit(account.id(), amount)
        .await
        .map_err(report)?;

    println!("✅ Deposit successful!");
    print_change(&change);

    db.close().await;
    Ok(())
}

pub async fn withdraw(
    config: &StoreConfig,
    credential: &Credential,
    amount: Decimal,
) -> Result<()> {
    let (db, service) = db::service(config).await?;

    let account = authenticate(&service, credential).await?;
    let change = service
        .withdraw(account.id(), amount)
        .await
        .map_err(report)?;

    println!("✅ Withdrawal successful!");
    print_change(&change);

    db.close().await;
    Ok(())
}

/// Show one account
pub async fn balance(config: &StoreConfig, account_id: i64) -> Result<()> {
    let (db, service) = db::service(config).await?;

    let account = service.get_account(account_id).await.map_err(report)?;
    println!("{}", account);

    db.close().await;
    Ok(())
}

/// Admin listing
pub async fn list(config: &StoreConfig, json: bool) -> Result<()> {
    let (db, service) = db::service(config).await?;

    let accounts = service.list_all().await.map_err(report)?;
    if json {
        let out = serde_json::to_string_pretty(&accounts).context("Failed to encode accounts")?;
        println!("{}", out);
    } else {
        print_accounts(&accounts);
    }

    db.close().await;
    Ok(())
}

async fn authenticate(service: &AccountService, credential: &Credential) -> Result<Account> {
    service
        .authenticate(&credential.name, credential.pin)
        .await
        .map_err(report)
}

pub(crate) fn print_change(change: &BalanceChange) {
    println!("   Account:     #{}", change.account.id());
    println!("   Amount:      {:.2}", change.amount);
    println!("   Previous:    {:.2}", change.previous_balance);
    println!("   New balance: {:.2}", change.new_balance());
}

pub(crate) fn print_accounts(accounts: &[Account]) {
    println!("-- All Accounts --");
    if accounts.is_empty() {
        println!("No accounts found.");
    }
    for account in accounts {
        println!("{}", account);
    }
}
