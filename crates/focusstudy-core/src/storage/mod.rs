pub mod database;
pub mod sync;

pub use database::Database;
pub use sync::{keys, PersistedState};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/focusstudy[-dev]/` based on FOCUSSTUDY_ENV.
///
/// Set FOCUSSTUDY_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSSTUDY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusstudy-dev")
    } else {
        base_dir.join("focusstudy")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
