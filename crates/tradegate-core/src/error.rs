//! Core error types for tradegate-core.
//!
//! This module defines the error hierarchy using thiserror. Checklist
//! gating violations are ordinary recoverable signals returned to the
//! caller; storage problems degrade gracefully; an unresolvable
//! reference timezone is fatal for the session clock.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tradegate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Checklist gating and index errors
    #[error("Checklist error: {0}")]
    Checklist(#[from] ChecklistError),

    /// State storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Session clock errors
    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the checklist gate.
///
/// Both variants leave the checklist state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    /// Toggle called with an index outside the task list.
    ///
    /// A correctly constrained host never produces this; it indicates a
    /// host bug rather than a user mistake.
    #[error("Task index {index} out of range for checklist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Attempt to check a task whose predecessor is still unchecked.
    ///
    /// Expected during normal use; the host shows a transient warning
    /// and reverts any optimistic UI change.
    #[error("Task {index} cannot be checked while its predecessor is incomplete")]
    OutOfOrder { index: usize },
}

/// State-store errors.
///
/// These never block checklist use: a failed load falls back to the
/// all-false default and a failed save leaves the in-memory state
/// authoritative.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the state database
    #[error("Failed to open state store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored record could not be decoded
    #[error("Stored state is corrupt: {0}")]
    Corrupt(String),
}

/// Session clock errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The configured reference timezone name did not resolve.
    ///
    /// Fatal for the clock subsystem: session activity is
    /// timezone-dependent, so the clock refuses to report rather than
    /// fall back to an unintended zone.
    #[error("Unknown reference timezone: '{0}'")]
    UnknownTimezone(String),
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
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
