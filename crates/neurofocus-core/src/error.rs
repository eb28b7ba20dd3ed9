//! Core error types for neurofocus-core.
//!
//! The controller itself never surfaces store failures to its callers (they
//! are logged and the in-memory session keeps running), but every boundary
//! that reads or writes persisted data reports them through this hierarchy.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for neurofocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value store errors
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

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// A stored value could not be encoded or decoded
    #[error("Failed to decode value for '{key}': {message}")]
    Codec { key: String, message: String },

    /// The store refused the write (used by the in-memory store to simulate outages)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Settings validation errors, raised at the editing boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Active window end is not after its start
    #[error("Invalid active window: end ({end}) must be after start ({start})")]
    InvalidTimeRange { start: String, end: String },

    /// Duration or count that must be positive
    #[error("'{field}' must be a positive number")]
    NonPositive { field: String },

    /// Time-of-day string is not HH:MM
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),

    /// Denylist would exceed its cap
    #[error("Too many distracting sites (max {max})")]
    TooManySites { max: usize },

    /// Hostname could not be normalised
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),
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

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
