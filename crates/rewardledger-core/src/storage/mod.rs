mod config;
pub mod state_file;

pub use config::{Config, DisplayConfig, LogConfig};
pub use state_file::{JsonFileStore, MemoryStore, StateStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/rewardledger[-dev]/` based on REWARDLEDGER_ENV.
///
/// Set REWARDLEDGER_ENV=dev to use development data directory.
/// REWARDLEDGER_DATA_DIR, when set, replaces the whole path.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("REWARDLEDGER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("REWARDLEDGER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("rewardledger-dev")
            } else {
                base_dir.join("rewardledger")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
