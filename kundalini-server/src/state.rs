//! Application State
//!
//! Wires configuration, storage, transport and the status monitor together.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use kundalini_core::modules::config as core_config;
use kundalini_core::utils::paths::{get_data_dir, ACCOUNTS_DB};
use kundalini_core::{
    AccountRepository, HttpVerificationClient, SqliteAccountRepository, StatusMonitor, Transport,
};
use kundalini_types::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<SqliteAccountRepository>,
    pub monitor: Arc<StatusMonitor>,
}

impl AppState {
    /// Build state from the data directory (`KUNDALINI_DATA_DIR` or `~/.kundalini`).
    pub fn load() -> Result<Self> {
        let data_dir = get_data_dir().context("Failed to get data directory")?;
        Self::from_dir(&data_dir)
    }

    pub fn from_dir(data_dir: &Path) -> Result<Self> {
        let config =
            core_config::load_config_from(data_dir).context("Failed to load configuration")?;
        let repository = Arc::new(
            SqliteAccountRepository::open(data_dir.join(ACCOUNTS_DB))
                .context("Failed to open account database")?,
        );

        let transport =
            Arc::new(Transport::new(&config.transport).context("Failed to build HTTP transport")?);
        let client = HttpVerificationClient::new(transport, config.environments.clone());
        let monitor = Arc::new(StatusMonitor::new(
            Arc::clone(&repository) as Arc<dyn AccountRepository>,
            Arc::new(client),
            &config.monitor,
        ));

        Ok(Self { config: Arc::new(config), repository, monitor })
    }
}
