//! Kundalini Server - Headless Monitor
//!
//! Verifies configured test accounts against their remote environments on a
//! fixed schedule and offers CLI commands for one-off checks and account
//! management.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod account_commands;
mod cli;
mod commands;
mod config_commands;
mod scheduler;
mod state;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(AppState::load()?).await,
        Commands::Refresh => commands::handle_refresh(&AppState::load()?).await,
        Commands::Account(cmd) => commands::handle_account_command(&AppState::load()?, cmd).await,
        Commands::Check { username } => {
            commands::handle_check(&AppState::load()?, &username).await
        },
        Commands::Status => commands::handle_status(&AppState::load()?).await,
        Commands::Config(cmd) => commands::handle_config_command(cmd),
    }
}

async fn serve(state: AppState) -> Result<()> {
    info!(
        "Kundalini monitor starting: {} accounts, refresh every {} min",
        state.monitor.get_account_count().await,
        state.config.monitor.effective_interval_minutes()
    );

    let task = scheduler::start_monitor(&state);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, waiting for the current pass to finish");
    task.stop().await;

    info!("Kundalini monitor stopped");
    Ok(())
}
