//! Minibank CLI - ATM style account operations from command line
//!
//! Usage:
//! ```bash
//! minibank init
//! minibank open --name Alice --pin 1234 --type checking --initial 100
//! minibank login --name Alice --pin 1234
//! minibank deposit --name Alice --pin 1234 50
//! minibank withdraw --name Alice --pin 1234 20
//! minibank balance 1
//! minibank list --json
//! minibank atm
//! ```

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use minibank_persistence::{StoreConfig, DEFAULT_DB_PATH};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{account, atm};

/// Minibank - a minimal account ledger on SQLite
#[derive(Parser)]
#[command(name = "minibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Maximum pooled SQLite connections
    #[arg(long, default_value_t = 4, global = true)]
    pub max_connections: u32,

    /// How long to wait on a locked database file, in milliseconds
    #[arg(long, default_value_t = 5_000, global = true)]
    pub busy_timeout_ms: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig::from_path(&self.db)
            .with_max_connections(self.max_connections)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }

    fn log_filter(&self) -> EnvFilter {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database schema (safe to run repeatedly)
    Init {
        /// Delete the existing database file first
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Create a customer and its first account
    Open {
        #[command(flatten)]
        credential: Credential,
        /// Account type
        #[arg(long = "type", short = 't', default_value = "checking")]
        account_type: String,
        /// Initial deposit (>= 0)
        #[arg(long, default_value = "0")]
        initial: Decimal,
    },

    /// Authenticate and show the account
    Login {
        #[command(flatten)]
        credential: Credential,
    },

    /// Deposit funds into the authenticated account
    Deposit {
        #[command(flatten)]
        credential: Credential,
        /// Amount to deposit
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },

    /// Withdraw funds from the authenticated account
    Withdraw {
        #[command(flatten)]
        credential: Credential,
        /// Amount to withdraw
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },

    /// Show one account by id
    Balance {
        /// Account ID
        account_id: i64,
    },

    /// List all accounts (admin)
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Interactive ATM session
    Atm,
}

/// Customer name + PIN
#[derive(clap::Args, Clone)]
pub struct Credential {
    /// Customer name
    #[arg(long, short)]
    pub name: String,
    /// Numeric PIN
    #[arg(long, short)]
    pub pin: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = cli.store_config();

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&config, force).await?;
            println!("✅ Database initialized at {:?}", config.path);
        }

        Commands::Status => {
            db::show_status(&config).await?;
        }

        Commands::Open {
            credential,
            account_type,
            initial,
        } => {
            account::open(&config, &credential, &account_type, initial).await?;
        }

        Commands::Login { credential } => {
            account::login(&config, &credential).await?;
        }

        Commands::Deposit { credential, amount } => {
            account::deposit(&config, &credential, amount).await?;
        }

        Commands::Withdraw { credential, amount } => {
            account::withdraw(&config, &credential, amount).await?;
        }

        Commands::Balance { account_id } => {
            account::balance(&config, account_id).await?;
        }

        Commands::List { json } => {
            account::list(&config, json).await?;
        }

        Commands::Atm => {
            atm::run(&config).await?;
        }
    }

    Ok(())
}
