//! Unified error type for the crate's fallible edges.

use thiserror::Error;

use super::category::ErrorCategory;
use super::config::ConfigError;
use super::replay::ReplayError;

/// Unified error type.
///
/// Only configuration loading, trace replay and the file access around them
/// can fail. Touch processing and arbitration are infallible.
#[derive(Debug, Error)]
pub enum GestureError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed replay trace.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GestureError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GestureError::Config(_) => ErrorCategory::Configuration,
            GestureError::Replay(_) | GestureError::Json(_) => ErrorCategory::Input,
            GestureError::Io(_) => ErrorCategory::System,
        }
    }

    /// Suggested next step for the user, from the error's category.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GestureError::Config(err) => err.error_code(),
            GestureError::Replay(err) => err.error_code(),
            GestureError::Json(_) => "JSON_ERROR",
            GestureError::Io(_) => "IO_ERROR",
        }
    }
}
