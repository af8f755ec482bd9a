//! Core error types for mindbreak-core.
//!
//! Selection and schedule evaluation are total and never return errors;
//! this hierarchy covers the storage and configuration layers plus
//! preference/activity validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mindbreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the SQLite-backed store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Stored payload could not be decoded
    #[error("Corrupt record for {kind} '{id}': {message}")]
    CorruptRecord {
        kind: &'static str,
        id: String,
        message: String,
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Preference and activity validation errors.
///
/// Raised by the configuration surface when settings are edited, never
/// mid-selection: a selection always falls back rather than failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Smart selection requires at least one preferred category
    #[error("No preferred activity types configured")]
    NoPreferredTypes,

    /// Max daily intentions outside the accepted range
    #[error("Invalid max daily intentions: {value} (expected {min}..={max})")]
    InvalidMaxDaily { value: u32, min: u32, max: u32 },

    /// Activity duration outside the accepted range
    #[error("Invalid activity duration: {seconds}s (expected {min}..={max})")]
    InvalidDuration { seconds: u32, min: u32, max: u32 },

    /// Activity id already present in the catalog
    #[error("Duplicate activity id: {0}")]
    DuplicateActivity(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
