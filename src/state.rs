//! Config loading.
//!
//! `~/.mindflow/config.json` is optional; a missing file yields defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Config;

/// `~/.mindflow`
pub fn get_state_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".mindflow"))
}

/// Load configuration from `~/.mindflow/config.json`.
pub fn load_config() -> Result<Config, String> {
    let config_path = get_state_dir()?.join("config.json");
    load_config_from(&config_path)
}

/// Load configuration from an explicit path. A missing file is not an error.
pub fn load_config_from(config_path: &Path) -> Result<Config, String> {
    if !config_path.exists() {
        log::debug!(
            "No config at {}; using defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(config_path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    if let Some(db_path) = config.database_path.as_deref() {
        let parent = Path::new(db_path).parent();
        if parent.is_some_and(|p| !p.as_os_str().is_empty() && !p.exists()) {
            log::warn!(
                "Database directory for {} does not exist yet; it will be created",
                db_path
            );
        }
    }

    Ok(config)
}
