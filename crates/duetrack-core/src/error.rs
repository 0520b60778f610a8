//! Error types for the tracker core.
//!
//! Storage errors never reach the user as hard failures: `PersistedStore`
//! logs them and degrades to defaults or a `false` save flag. They are still
//! typed so slots and tests can tell a quota failure from a corrupt blob.

use thiserror::Error;

/// Top-level tracker error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            TrackerError::Storage(e) => e.user_message(),
            TrackerError::Config(e) => e.user_message(),
            TrackerError::Io(_) => "A file operation failed. Please try again.",
            TrackerError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Local persistence failures (the single state slot).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read storage slot: {0}")]
    Read(String),

    #[error("Failed to write storage slot: {0}")]
    Write(String),

    #[error("Storage quota exceeded: {needed} bytes needed, {capacity} available")]
    QuotaExceeded { needed: usize, capacity: usize },

    #[error("Stored state is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Read(_) => "Saved data could not be read. Using defaults.",
            StorageError::Write(_) => "Changes could not be saved on this device.",
            StorageError::QuotaExceeded { .. } => {
                "Local storage is full. Changes will last for this session only."
            }
            StorageError::Corrupt(_) => "Saved data is damaged. Using defaults.",
            StorageError::Sqlite(_) => "Local database error. Changes may not be saved.",
        }
    }

    /// True when the failure happened while writing.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            StorageError::Write(_) | StorageError::QuotaExceeded { .. }
        )
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration IO error: {0}")]
    Io(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Io(_) => "Configuration could not be read or written.",
        }
    }
}
