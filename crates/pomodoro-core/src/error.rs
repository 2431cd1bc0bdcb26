//! Core error types for pomodoro-core.
//!
//! Errors are defined with thiserror. None of them is fatal: the engine
//! recovers locally and front ends surface them to the user.

use std::path::PathBuf;
use thiserror::Error;

use crate::events::Event;
use crate::timer::Phase;

/// Core error type for pomodoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer engine errors
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

/// Errors raised by the timer engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A work or break duration was not a positive whole number of minutes.
    #[error("Invalid {phase} duration '{value}': expected a positive number of minutes")]
    InvalidDuration { phase: Phase, value: String },
}

impl TimerError {
    pub(crate) fn invalid_duration(phase: Phase, value: impl ToString) -> Self {
        TimerError::InvalidDuration {
            phase,
            value: value.to_string(),
        }
    }
}

impl From<&TimerError> for Event {
    fn from(err: &TimerError) -> Self {
        match err {
            TimerError::InvalidDuration { phase, value } => Event::InvalidDuration {
                phase: *phase,
                value: value.clone(),
            },
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config could not be rendered as TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
