use anyhow::{Context, Result};
use colored::Colorize;

use kundalini_core::modules::config as core_config;

use crate::account_commands::{self, print_statuses};
use crate::cli::{AccountCommands, ConfigCommands};
use crate::config_commands;
use crate::state::AppState;

pub async fn handle_account_command(state: &AppState, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::List { json } => account_commands::list_accounts(state, json).await,
        AccountCommands::Add { username, password, environment } => {
            account_commands::add_account(state, &username, &password, environment).await
        },
        AccountCommands::Update { id, username, password, environment } => {
            account_commands::update_account(state, id, username, password, environment).await
        },
        AccountCommands::Remove { identifier } => {
            account_commands::remove_account(state, &identifier).await
        },
    }
}

/// Works from the config file alone so a broken transport setup can still be fixed.
pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    let config = core_config::load_config().context("Failed to load configuration")?;
    match cmd {
        ConfigCommands::Show { json } => config_commands::show_config(&config, json),
        ConfigCommands::Get { key } => config_commands::get_config_value(&config, &key),
        ConfigCommands::Set { key, value } => config_commands::set_config_value(&key, &value),
    }
}

pub async fn handle_refresh(state: &AppState) -> Result<()> {
    println!("{}", "Verifying all accounts...".cyan());
    let summary = state.monitor.refresh_once().await;
    print_statuses(&state.monitor.registry().snapshot());
    println!(
        "\n{} checked, {} logged in, {} with history",
        summary.checked,
        summary.login_ok.to_string().green(),
        summary.history_found.to_string().green()
    );
    Ok(())
}

pub async fn handle_check(state: &AppState, username: &str) -> Result<()> {
    let status = state
        .monitor
        .check_account(username)
        .await
        .with_context(|| format!("No account named {}", username))?;
    print_statuses(std::slice::from_ref(&status));
    Ok(())
}

pub async fn handle_status(state: &AppState) -> Result<()> {
    let count = state.monitor.get_account_count().await;

    println!("{}", "Kundalini Monitor Status".cyan().bold());
    println!("  Accounts: {}", count);
    println!(
        "  Refresh interval: {} min",
        state.config.monitor.effective_interval_minutes()
    );
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
