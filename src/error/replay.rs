//! Trace replay error types.

use thiserror::Error;

/// Errors raised while interpreting a recorded touch trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The trace declares no gesture areas
    #[error("trace declares no gesture areas")]
    NoAreas,

    /// Two areas share a name
    #[error("duplicate area name '{0}'")]
    DuplicateArea(String),

    /// A step refers to an area that was never declared
    #[error("unknown area '{0}'")]
    UnknownArea(String),
}

impl ReplayError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ReplayError::NoAreas => "REPLAY_NO_AREAS",
            ReplayError::DuplicateArea(_) => "REPLAY_DUPLICATE_AREA",
            ReplayError::UnknownArea(_) => "REPLAY_UNKNOWN_AREA",
        }
    }
}
