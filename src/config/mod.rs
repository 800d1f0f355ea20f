//! Configuration resolution

mod loader;

pub use loader::{apply_overrides, load_config, validate_config, API_URL_ENV};
