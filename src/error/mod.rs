//! Error handling for shell-gestures.
//!
//! Touch processing never fails: arbitration conflicts, touch counts outside
//! the configured range, stale touch ids and timer expiry are all absorbed as
//! state transitions. Errors exist only at the edges:
//!
//! | Type | Raised by | Category |
//! |------|-----------|----------|
//! | [`ConfigError`] | config validation, env overrides | Configuration |
//! | [`ReplayError`] | trace replay | Input |
//! | [`GestureError`] | everything above plus JSON and I/O | per source |

mod category;
mod config;
mod gesture_error;
mod replay;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use gesture_error::GestureError;
pub use replay::ReplayError;

/// Type alias for Results using [`GestureError`].
pub type GestureResult<T> = Result<T, GestureError>;
