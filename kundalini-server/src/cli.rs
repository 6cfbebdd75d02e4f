use clap::{Parser, Subcommand};
use kundalini_types::Environment;

#[derive(Parser)]
#[command(
    name = "kundalini",
    about = "Kundalini - Test Account Status Monitor",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the monitor until Ctrl-C (default if no command specified)")]
    Serve,

    #[command(about = "Verify every account once and print the results")]
    Refresh,

    #[command(subcommand, about = "Manage monitored accounts")]
    Account(AccountCommands),

    #[command(about = "Verify a single account")]
    Check {
        #[arg(help = "Username of the account to verify")]
        username: String,
    },

    #[command(about = "Show monitor status")]
    Status,

    #[command(subcommand, about = "View or change configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum AccountCommands {
    #[command(about = "List all accounts")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Add an account and verify it")]
    Add {
        #[arg(short, long, help = "Login name")]
        username: String,

        #[arg(short, long, help = "Login password")]
        password: String,

        #[arg(short, long, default_value = "E1", help = "Environment (E1, E2, E3)")]
        environment: Environment,
    },

    #[command(about = "Update an account and verify it")]
    Update {
        #[arg(help = "Account ID")]
        id: i64,

        #[arg(short, long, help = "New login name")]
        username: Option<String>,

        #[arg(short, long, help = "New login password")]
        password: Option<String>,

        #[arg(short, long, help = "New environment (E1, E2, E3)")]
        environment: Option<Environment>,
    },

    #[command(about = "Remove an account")]
    Remove {
        #[arg(help = "Username or account ID to remove")]
        identifier: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Get a specific configuration value")]
    Get {
        #[arg(help = "Configuration key (e.g., 'monitor.refresh_interval_minutes', 'environments.E2')")]
        key: String,
    },

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key")]
        key: String,

        #[arg(help = "New value ('default' clears an environment override)")]
        value: String,
    },
}
