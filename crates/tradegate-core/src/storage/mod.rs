mod config;
mod store;

pub use config::Config;
pub use store::StateStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/tradegate[-dev]/` based on TRADEGATE_ENV.
///
/// Set TRADEGATE_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TRADEGATE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tradegate-dev")
    } else {
        base_dir.join("tradegate")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
