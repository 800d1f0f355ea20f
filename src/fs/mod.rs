//! File system utilities for carequeue
//!
//! Provides home directory resolution and JSON file operations.

mod json;
mod paths;

pub use json::{
    clear_session, read_config, read_json, read_session, write_json, write_session,
};
pub use paths::{get_config_path, get_session_path, resolve_home, HOME_ENV};
