mod config;

pub use config::{Config, NotificationsConfig, TimerSettings};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "POMODORO_CONFIG_DIR";

/// Returns `$POMODORO_CONFIG_DIR` if set, else `~/.config/pomodoro/`.
///
/// # Errors
/// Returns an error if neither the override nor the home directory
/// is available.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| ConfigError::DirUnavailable("home directory not found".into()))?;
    Ok(home.join(".config").join("pomodoro"))
}
