use std::fs;
use std::path::PathBuf;

use kundalini_types::ConfigError;

const DATA_DIR: &str = ".kundalini";

/// SQLite database holding the monitored accounts.
pub const ACCOUNTS_DB: &str = "accounts.db";

/// Get data directory path.
///
/// Priority:
/// 1. `KUNDALINI_DATA_DIR` environment variable (for container deployments)
/// 2. `~/.kundalini` (default for desktop usage)
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let data_dir = if let Ok(custom_dir) = std::env::var("KUNDALINI_DATA_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::DataDir {
            message: "Cannot get home directory".to_string(),
        })?;
        home.join(DATA_DIR)
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|e| ConfigError::DataDir {
            message: format!("Failed to create data directory {}: {}", data_dir.display(), e),
        })?;
    }

    Ok(data_dir)
}
