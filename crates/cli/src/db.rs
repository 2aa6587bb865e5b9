//! Database initialization, status and connection

use anyhow::{Context, Result};
use minibank_business::AccountService;
use minibank_persistence::{Database, StoreConfig};
use std::sync::Arc;
use tracing::info;

/// Initialize the database with schema
pub async fn init_database(config: &StoreConfig, force: bool) -> Result<()> {
    if force && config.path.exists() {
        std::fs::remove_file(&config.path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    println!("📦 Creating schema...");
    let db = Database::init(config)
        .await
        .context("Failed to initialize database")?;
    info!(path = %config.path.display(), "schema ready");
    db.close().await;
    Ok(())
}

/// Show database status
pub async fn show_status(config: &StoreConfig) -> Result<()> {
    if !config.path.exists() {
        println!("❌ Database not found at {:?}", config.path);
        println!("   Run 'minibank init' to create the database");
        return Ok(());
    }

    let db = connect(config).await?;
    let (customers, accounts) = db.counts().await.context("Failed to count records")?;

    println!("📊 Database Status");
    println!("   Path:      {:?}", config.path);
    println!();
    println!("   Customers: {}", customers);
    println!("   Accounts:  {}", accounts);

    db.close().await;
    Ok(())
}

/// Connect to an existing database
pub async fn connect(config: &StoreConfig) -> Result<Database> {
    Database::connect(&config.clone().must_exist())
        .await
        .context("Failed to connect to database. Run 'minibank init' first.")
}

/// Build an account service over an existing database
pub async fn service(config: &StoreConfig) -> Result<(Database, AccountService)> {
    let db = connect(config).await?;
    let service = AccountService::new(Arc::new(db.store()));
    Ok((db, service))
}
