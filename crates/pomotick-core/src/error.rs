//! Core error types for pomotick-core.
//!
//! The hierarchy uses thiserror. Out-of-order timer commands and
//! out-of-range duration digits are deliberately *not* represented here:
//! the former are ignored and the latter are clamped.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Countdown engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

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

/// Countdown engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine task could not be created. Fatal to the widget.
    #[error("Failed to spawn countdown engine: {0}")]
    SpawnFailed(String),

    /// The engine task is gone and can no longer receive commands.
    #[error("Countdown engine is no longer running")]
    Closed,

    /// A wire message could not be decoded.
    #[error("Malformed engine message '{line}': {message}")]
    Malformed { line: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    NoDataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for text entering at the CLI boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
