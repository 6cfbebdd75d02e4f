use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use kundalini_core::AccountRepository;
use kundalini_types::{Account, AccountStatus, Environment, Tristate};

use crate::state::AppState;

pub async fn list_accounts(state: &AppState, json: bool) -> Result<()> {
    let accounts = state.repository.find_all().await;

    if json {
        let redacted: Vec<serde_json::Value> = accounts
            .iter()
            .map(|a| {
                serde_json::json!({
                    "id": a.id,
                    "username": a.username,
                    "environment": a.environment,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&redacted)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("{}", "No accounts found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Username", "Environment"]);

    for acc in &accounts {
        table.add_row(vec![
            Cell::new(acc.id.map_or_else(|| "-".to_string(), |id| id.to_string())),
            Cell::new(&acc.username),
            Cell::new(acc.environment),
        ]);
    }

    println!("{table}");
    println!("\n{} accounts total", accounts.len());
    Ok(())
}

pub async fn add_account(
    state: &AppState,
    username: &str,
    password: &str,
    environment: Environment,
) -> Result<()> {
    println!("{}", format!("Adding {} and verifying...", username).cyan());
    let status = state
        .monitor
        .save_account(None, username, password, environment)
        .await
        .context("Failed to add account")?;
    println!("{} Account added: {}", "✓".green(), status.username().green());
    print_statuses(std::slice::from_ref(&status));
    Ok(())
}

pub async fn update_account(
    state: &AppState,
    id: i64,
    username: Option<String>,
    password: Option<String>,
    environment: Option<Environment>,
) -> Result<()> {
    let current = state.repository.find_by_id(id).await.context("Account not found")?;
    let username = username.unwrap_or(current.username);
    let password = password.unwrap_or(current.password);
    let environment = environment.unwrap_or(current.environment);

    let status = state
        .monitor
        .save_account(Some(id), &username, &password, environment)
        .await
        .context("Failed to update account")?;
    println!("{} Account updated: {}", "✓".green(), username.green());
    print_statuses(std::slice::from_ref(&status));
    Ok(())
}

pub async fn remove_account(state: &AppState, identifier: &str) -> Result<()> {
    let acc = find_account(state, identifier).await.context("Account not found")?;
    state.monitor.delete_account(&acc).await.context("Failed to remove account")?;
    println!("{} Account removed: {}", "✓".green(), acc.username.green());
    Ok(())
}

/// Look up by numeric id first, then by username.
async fn find_account(state: &AppState, identifier: &str) -> Option<Account> {
    if let Ok(id) = identifier.parse::<i64>() {
        if let Some(acc) = state.repository.find_by_id(id).await {
            return Some(acc);
        }
    }
    state.repository.find_by_username(identifier).await
}

fn check_cell(value: Tristate) -> Cell {
    match value {
        Tristate::Yes => Cell::new("✓").fg(Color::Green),
        Tristate::No => Cell::new("✗").fg(Color::Red),
        Tristate::Unknown => Cell::new("…").fg(Color::Yellow),
    }
}

/// Print statuses as a table in registry order.
pub fn print_statuses(statuses: &[AccountStatus]) {
    if statuses.is_empty() {
        println!("{}", "No accounts to show.".yellow());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Environment", "Username", "Login", "Data", "History"]);

    for status in statuses {
        table.add_row(vec![
            Cell::new(status.environment()),
            Cell::new(status.username()),
            check_cell(status.login_ok),
            check_cell(status.data_found),
            check_cell(status.history_found),
        ]);
    }

    println!("{table}");
}
