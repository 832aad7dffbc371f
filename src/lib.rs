//! Shell gestures - touch gesture recognition with ownership arbitration
//!
//! Gesture areas compete for exclusive ownership of touch points through a
//! shared [`registry::TouchRegistry`]. The [`dispatch::GestureDispatcher`]
//! routes frames and ownership decisions between them.
//!
//! This library exposes modules for use by the `gesture-replay` binary and
//! integration tests.

pub mod area;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event_loop;
pub mod registry;
pub mod replay;
pub mod timer;
pub mod touch;

pub use area::{GestureSignal, GestureStatus, TouchGestureArea};
pub use dispatch::GestureDispatcher;
pub use registry::{AreaEvent, AreaId, OwnershipPolicy, TouchRegistry};
pub use touch::{GestureTouchPoint, RawTouchPoint, TouchFrame, TouchId};
