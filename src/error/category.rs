//! Error category classification.
//!
//! The gesture core itself never fails; categories only classify the errors
//! raised at the crate's edges (configuration loading, trace replay, I/O).

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid or unparsable configuration values.
    /// Not recoverable until the configuration is corrected.
    Configuration,

    /// Malformed input handed to the crate (replay traces, unknown names).
    Input,

    /// System/OS errors (filesystem, permissions).
    System,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Input => "input",
            ErrorCategory::System => "system",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "Check the gesture configuration file and environment",
            ErrorCategory::Input => "Check the touch trace for typos and missing fields",
            ErrorCategory::System => "Check that the file exists and is readable",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
