//! Notifications emitted by gesture areas

use std::time::Duration;

use serde::Serialize;

use super::status::GestureStatus;
use crate::touch::{GestureTouchPoint, TouchId};

/// A change observers of a gesture area are told about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GestureSignal {
    Pressed(Vec<GestureTouchPoint>),
    Updated(Vec<GestureTouchPoint>),
    Released(Vec<GestureTouchPoint>),
    /// Every point lifted without the area ever dragging
    Clicked,
    DraggingChanged(bool),
    StatusChanged(GestureStatus),
    /// The exposed point list changed
    TouchPointsUpdated,
    MinimumTouchPointsChanged(usize),
    MaximumTouchPointsChanged(usize),
    RecognitionPeriodChanged(Duration),
}

/// Request from an area to the platform about raw touch delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabRequest {
    /// Deliver every future raw update of this touch to the area only
    Grab(TouchId),
    /// Give up all grabs held by the area
    UngrabAll,
}
