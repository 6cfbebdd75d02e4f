use std::fs;
use std::path::{Path, PathBuf};

use kundalini_types::{AppConfig, ConfigError};

use crate::utils::paths::get_data_dir;

pub const CONFIG_FILE: &str = "kundalini.json";

/// Load the application config from the data directory.
///
/// A missing file yields the defaults.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_data_dir()?)
}

pub fn load_config_from(dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(AppConfig::new());
    }

    let content = fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::from_read_error(&config_path, &e))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Save the application config.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&get_data_dir()?, config)
}

pub fn save_config_to(dir: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let temp_path = dir.join(format!("{}.tmp", CONFIG_FILE));

    let content = serde_json::to_string_pretty(config).map_err(|e| ConfigError::from_json_error(&e))?;

    // Atomic write
    fs::write(&temp_path, content).map_err(|e| ConfigError::WriteError {
        message: format!("writing {}: {}", temp_path.display(), e),
    })?;
    fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
        message: format!("replacing {}: {}", config_path.display(), e),
    })
}

/// Update specific fields in the config.
pub fn update_config<F>(updater: F) -> Result<AppConfig, ConfigError>
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = load_config()?;
    updater(&mut config);
    save_config(&config)?;
    Ok(config)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}
