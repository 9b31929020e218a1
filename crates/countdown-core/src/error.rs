//! Core error types for countdown-core.
//!
//! Timer validation failures, configuration file problems and the
//! umbrella [`CoreError`] that wraps both.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for countdown-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer-related errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the timer engine and duration parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A duration that is zero, negative, fractional or unparseable.
    /// The engine never clamps these; the call is rejected and state is left alone.
    #[error("Invalid timer duration '{input}': {reason}")]
    InvalidConfig { input: String, reason: String },
}

impl TimerError {
    pub(crate) fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        TimerError::InvalidConfig {
            input: input.into(),
            reason: reason.into(),
        }
    }
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

    /// Key does not exist in the configuration schema
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
