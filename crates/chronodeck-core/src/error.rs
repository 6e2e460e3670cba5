//! Core error types for chronodeck-core.
//!
//! Temporal arithmetic itself is failure-free; errors appear only at the
//! validation and I/O seams (cycle construction, config load, popout window
//! creation).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for chronodeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Window-manager collaborator errors
    #[error("window error: {0}")]
    Window(#[from] WindowError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("failed to read config at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config at {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Rejected construction inputs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A pomodoro cycle needs at least one work phase to run
    #[error("pomodoro repeat count must be at least 1")]
    ZeroRepeats,

    /// Zero-length phases would complete instantly and spin the state machine
    #[error("duration must be nonzero")]
    ZeroDuration,
}

/// Errors surfaced by the window-manager collaborator.
#[derive(Error, Debug)]
pub enum WindowError {
    /// The host failed to create a popout surface. Non-fatal: the requesting
    /// entity's focus flag is reverted and the frame continues.
    #[error("window creation failed: {0}")]
    CreateFailed(String),
}
