//! JSON file operations for local state
//!
//! Provides functions to read and write the config and session files.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{CareQueueError, Result};
use crate::schemas::{Config, Session};

use super::paths::{get_config_path, get_session_path};

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or the wrong shape
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CareQueueError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            CareQueueError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CareQueueError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| CareQueueError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read config.json, or defaults if it doesn't exist.
pub fn read_config(home: &Path) -> Result<Config> {
    let path = get_config_path(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(&path)
}

/// Read the stored session.
///
/// # Errors
/// * `NotLoggedIn` - If no session has been stored
pub fn read_session(home: &Path) -> Result<Session> {
    match read_json(&get_session_path(home)) {
        Err(CareQueueError::FileNotFound(_)) => Err(CareQueueError::NotLoggedIn(
            "run `carequeue login` first".to_string(),
        )),
        other => other,
    }
}

pub fn write_session(home: &Path, session: &Session) -> Result<()> {
    write_json(&get_session_path(home), session)
}

/// Remove the stored session. Returns whether one existed.
pub fn clear_session(home: &Path) -> Result<bool> {
    let path = get_session_path(home);
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CareQueueError::Io(e)),
    }
}
