//! Interactive ATM session
//!
//! Main menu: create, login, list, exit. After login: balance, deposit,
//! withdraw, logout. Reads stdin line by line and re-prompts on bad numbers.

use anyhow::{Context, Result};
use minibank_business::AccountService;
use minibank_core::{Account, DEFAULT_ACCOUNT_TYPE};
use minibank_persistence::{Database, StoreConfig};
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::account::{print_accounts, print_change};
use super::describe;

/// Line-oriented prompt over stdin. `None` means end of input.
struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush().context("Failed to flush stdout")?;
        let line = self.lines.next_line().await.context("Failed to read stdin")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    async fn number<T: FromStr>(&mut self, prompt: &str, what: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.line(prompt).await? else {
                return Ok(None);
            };
            match line.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => println!("Please enter a valid {}.", what),
            }
        }
    }
}

/// Run the ATM loop until the user exits or stdin closes
pub async fn run(config: &StoreConfig) -> Result<()> {
    let db = Database::init(config)
        .await
        .context("Failed to open database")?;
    let service = AccountService::new(Arc::new(db.store()));
    let mut console = Console::new();

    println!("=== Minimal Bank ATM ===");
    loop {
        println!();
        println!("1) Create customer & account");
        println!("2) Login to account");
        println!("3) List all accounts (admin)");
        println!("4) Exit");

        let Some(choice) = console.number::<u32>("Choose an option: ", "integer").await? else {
            break;
        };
        let keep_going = match choice {
            1 => create_account(&service, &mut console).await?,
            2 => login(&service, &mut console).await?,
            3 => {
                match service.list_all().await {
                    Ok(accounts) => print_accounts(&accounts),
                    Err(e) => println!("{}", describe(&e)),
                }
                true
            }
            4 => break,
            _ => {
                println!("Invalid option. Try again.");
                true
            }
        };
        if !keep_going {
            break;
        }
    }

    println!("Goodbye.");
    db.close().await;
    Ok(())
}

/// Returns `false` when stdin closed mid-dialog
async fn create_account(service: &AccountService, console: &mut Console) -> Result<bool> {
    println!("-- Create Account --");
    let Some(name) = console.line("Enter customer name: ").await? else {
        return Ok(false);
    };
    if name.is_empty() {
        println!("Name cannot be empty.");
        return Ok(true);
    }
    let Some(pin) = console
        .number::<i64>("Set a numeric PIN (4 digits recommended): ", "integer")
        .await?
    else {
        return Ok(false);
    };
    let Some(account_type) = console.line("Account type (checking/savings): ").await? else {
        return Ok(false);
    };
    let account_type = if account_type.is_empty() {
        DEFAULT_ACCOUNT_TYPE.to_string()
    } else {
        account_type
    };
    let Some(initial) = console
        .number::<Decimal>("Initial deposit (>=0): ", "number")
        .await?
    else {
        return Ok(false);
    };

    match service
        .open_account(&name, pin, &account_type, initial)
        .await
    {
        Ok(account) => println!(
            "Account created successfully. Account ID: {}",
            account.id()
        ),
        Err(e) => println!("{}", describe(&e)),
    }
    Ok(true)
}

async fn login(service: &AccountService, console: &mut Console) -> Result<bool> {
    println!("-- Login --");
    let Some(name) = console.line("Enter customer name: ").await? else {
        return Ok(false);
    };
    if name.is_empty() {
        println!("Name cannot be empty.");
        return Ok(true);
    }
    let Some(pin) = console.number::<i64>("Enter PIN: ", "integer").await? else {
        return Ok(false);
    };

    match service.authenticate(&name, pin).await {
        Ok(account) => {
            println!("Welcome, {}! (Account #{})", name, account.id());
            session(service, console, account).await
        }
        Err(e) => {
            println!("{}", describe(&e));
            Ok(true)
        }
    }
}

/// Logged-in menu. The local `account` is only a view; it is replaced after
/// every operation with whatever storage reports.
async fn session(
    service: &AccountService,
    console: &mut Console,
    mut account: Account,
) -> Result<bool> {
    loop {
        println!();
        println!("a) View balance");
        println!("b) Deposit");
        println!("c) Withdraw");
        println!("d) Logout");
        let Some(choice) = console.line("Choose: ").await? else {
            return Ok(false);
        };

        match choice.as_str() {
            "a" => match service.get_account(account.id()).await {
                Ok(fresh) => {
                    account = fresh;
                    println!("Balance: {:.2}", account.balance());
                }
                Err(e) => println!("{}", describe(&e)),
            },
            "b" | "c" => {
                let prompt = if choice == "b" {
                    "Amount to deposit: "
                } else {
                    "Amount to withdraw: "
                };
                let Some(amount) = console.number::<Decimal>(prompt, "number").await? else {
                    return Ok(false);
                };
                let result = if choice == "b" {
                    service.deposit(account.id(), amount).await
                } else {
                    service.withdraw(account.id(), amount).await
                };
                match result {
                    Ok(change) => {
                        println!("{} successful.", capitalize(change.operation.as_str()));
                        print_change(&change);
                        account = change.account;
                    }
                    Err(e) => {
                        println!("{}", describe(&e));
                        if e.is_inconsistency() {
                            if let Ok(fresh) = service.get_account(account.id()).await {
                                println!("Stored balance is now {:.2}", fresh.balance());
                                account = fresh;
                            }
                        }
                    }
                }
            }
            "d" => {
                println!("Logging out.");
                return Ok(true);
            }
            _ => println!("Unknown option."),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("deposit"), "Deposit");
        assert_eq!(capitalize(""), "");
    }
}
