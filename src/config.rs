use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::connection::Connection;

const APP_NAME: &str = "supplyseed";
const SETTINGS_FILE: &str = "connection.yaml";

/// Return the application config directory path, creating it if missing.
pub fn get_app_config_path() -> Result<PathBuf> {
    let mut path = if cfg!(target_os = "macos") {
        dirs_next::home_dir().map(|h| h.join(".config"))
    } else {
        dirs_next::config_dir()
    }
    .ok_or_else(|| anyhow::anyhow!("failed to find os config dir."))?;

    path.push(APP_NAME);
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn default_settings_path() -> Result<PathBuf> {
    Ok(get_app_config_path()?.join(SETTINGS_FILE))
}

/// Load connection settings. A missing or malformed file is an error.
pub fn load_settings(path: &Path) -> Result<Connection> {
    let data = fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let conn: Connection = serde_yaml::from_slice(&data)
        .with_context(|| format!("failed to parse YAML at {}", path.display()))?;
    Ok(conn)
}
