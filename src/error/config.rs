//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating gesture configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value is outside its allowed range
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// An environment override could not be parsed
    #[error("environment variable {var} has unparsable value '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidValue { .. } => "CFG_INVALID_VALUE",
            ConfigError::InvalidEnv { .. } => "CFG_INVALID_ENV",
        }
    }
}
