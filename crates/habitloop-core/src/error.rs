//! Core error types for habitloop-core.
//!
//! Remote and cache failures carry their own error enums next to the
//! modules that produce them; this module defines the shared hierarchy
//! and the validation/storage/config errors used across the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;
use crate::sync::RemoteError;

/// Top-level error type for habitloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote datastore request failed (network or backend rejection)
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Snapshot persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Offline cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Snapshot storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Data directory could not be determined or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),

    /// Snapshot could not be written
    #[error("Failed to write snapshot {name} at {path}: {message}")]
    WriteFailed {
        name: String,
        path: PathBuf,
        message: String,
    },

    /// Snapshot could not be serialized
    #[error("Failed to serialize snapshot {name}: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
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

    /// Unknown dot-path key passed to get/set
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed into the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors for habit and completion fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name empty or over the length limit
    #[error("Invalid habit name: {0}")]
    InvalidName(String),

    /// Color is not a #RRGGBB string
    #[error("Invalid color format: {0}")]
    InvalidColor(String),

    /// Reminder time is not HH:MM (24h)
    #[error("Invalid reminder time: {0}")]
    InvalidReminderTime(String),

    /// Field over its length limit
    #[error("'{field}' must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },

    /// Weekly/monthly day number outside its range
    #[error("Day {day} out of range for {frequency} frequency")]
    DayOutOfRange { frequency: &'static str, day: u8 },

    /// Custom interval outside 1-365
    #[error("Custom interval must be between 1 and 365 days, got {0}")]
    IntervalOutOfRange(u32),

    /// Mood outside 1-5
    #[error("Mood must be between 1 and 5, got {0}")]
    MoodOutOfRange(u8),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
