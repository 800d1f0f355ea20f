//! Path resolution utilities for carequeue
//!
//! All local state lives in one home directory: the `--home` override,
//! `$CAREQUEUE_HOME`, or `~/.carequeue`.

use std::path::{Path, PathBuf};

use crate::errors::{CareQueueError, Result};

/// Environment variable naming the carequeue home directory
pub const HOME_ENV: &str = "CAREQUEUE_HOME";

const HOME_DIR_NAME: &str = ".carequeue";

/// Resolve the carequeue home directory.
///
/// # Arguments
/// * `home_option` - Optional explicit override
///
/// # Errors
/// * `ConfigError` - If no override is set and the user's home directory is unknown
pub fn resolve_home(home_option: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = home_option {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(HOME_DIR_NAME))
        .ok_or_else(|| {
            CareQueueError::ConfigError(format!(
                "cannot determine home directory; set {} or pass --home",
                HOME_ENV
            ))
        })
}

/// Get the path to the config.json file.
pub fn get_config_path(home: &Path) -> PathBuf {
    home.join("config.json")
}

/// Get the path to the session.json file.
pub fn get_session_path(home: &Path) -> PathBuf {
    home.join("session.json")
}
