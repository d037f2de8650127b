//! Core error types for rewardledger-core.
//!
//! This module defines the error hierarchy using thiserror. Ledger
//! rejections are ordinary values the caller reports and moves on from;
//! storage failures abort the operation that triggered them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rewardledger-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger rule violations
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Persisted state errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog definition errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Recoverable rejections raised by ledger operations.
///
/// None of these mutate state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown task ID: {0}")]
    UnknownTask(String),

    #[error("Unknown reward ID: {0}")]
    UnknownReward(String),

    #[error("Insufficient points: {cost}P required, {balance}P available")]
    InsufficientPoints { cost: u64, balance: u64 },
}

impl LedgerError {
    /// Stable machine-readable kind, used for JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::UnknownTask(_) => "unknown_task",
            LedgerError::UnknownReward(_) => "unknown_reward",
            LedgerError::InsufficientPoints { .. } => "insufficient_points",
        }
    }
}

/// Persisted state errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the state file
    #[error("Failed to read state from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or replace the state file
    #[error("Failed to write state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State file exists but is not a valid ledger record
    #[error("Corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// State could not be serialized
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to determine or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Configured pack is not built in
    #[error("Unknown pack '{0}'")]
    UnknownPack(String),
}

/// Catalog definition errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate {kind} ID '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Streak task '{0}' is not defined in the task list")]
    MissingStreakTask(String),

    #[error("Invalid bonus table: {0}")]
    InvalidBonusTable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_points_message_reports_cost_and_balance() {
        let err = LedgerError::InsufficientPoints { cost: 20, balance: 7 };
        assert_eq!(
            err.to_string(),
            "Insufficient points: 20P required, 7P available"
        );
        assert_eq!(err.kind(), "insufficient_points");
    }

    #[test]
    fn ledger_error_is_transparent_through_core_error() {
        let err: CoreError = LedgerError::UnknownReward("R9".into()).into();
        assert_eq!(err.to_string(), "Unknown reward ID: R9");
    }
}
