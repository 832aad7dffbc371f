//! Raw touch input as delivered by the windowing system.
//!
//! A [`TouchFrame`] is one input event: the ordered list of every contact
//! that changed (or was reported stationary) at that instant. Gesture areas
//! turn these into [`GestureTouchPoint`]s, the value type observers see.

mod geometry;
mod point;

pub use geometry::{Position, Rect, Velocity};
pub use point::GestureTouchPoint;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Identifier of one physical contact.
///
/// Unique while the finger stays down; the platform is free to reuse it once
/// the contact has been released.
pub type TouchId = i32;

/// State of a contact within a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPointState {
    Pressed,
    Moved,
    Stationary,
    Released,
}

/// One contact observation inside a [`TouchFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawTouchPoint {
    pub id: TouchId,
    pub state: TouchPointState,
    /// Scene position
    pub position: Position,
    /// Only present when the device reports per-point velocity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Velocity>,
}

impl RawTouchPoint {
    pub fn new(id: TouchId, state: TouchPointState, x: f64, y: f64) -> Self {
        Self {
            id,
            state,
            position: Position::new(x, y),
            velocity: None,
        }
    }

    pub fn pressed(id: TouchId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPointState::Pressed, x, y)
    }

    pub fn moved(id: TouchId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPointState::Moved, x, y)
    }

    pub fn stationary(id: TouchId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPointState::Stationary, x, y)
    }

    pub fn released(id: TouchId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPointState::Released, x, y)
    }

    /// Attach a velocity sample
    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Some(Velocity::new(vx, vy));
        self
    }

    pub fn is_pressed(&self) -> bool {
        self.state == TouchPointState::Pressed
    }

    pub fn is_released(&self) -> bool {
        self.state == TouchPointState::Released
    }
}

/// One input event: every contact reported at a single instant, in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchFrame {
    pub points: Vec<RawTouchPoint>,
}

impl TouchFrame {
    pub fn new(points: Vec<RawTouchPoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn contains(&self, id: TouchId) -> bool {
        self.points.iter().any(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TouchId> + '_ {
        self.points.iter().map(|p| p.id)
    }

    /// Copy of this frame keeping only the first entry for each id.
    ///
    /// A contact has exactly one state per frame, so later entries for the
    /// same id (a release followed by a press, a repeated press) are dropped.
    pub fn deduplicated(&self) -> TouchFrame {
        let mut seen = HashSet::with_capacity(self.points.len());
        self.filtered(|p| seen.insert(p.id))
    }

    /// Copy of this frame restricted to the points matching `keep`
    pub fn filtered<F>(&self, mut keep: F) -> TouchFrame
    where
        F: FnMut(&RawTouchPoint) -> bool,
    {
        TouchFrame {
            points: self.points.iter().filter(|p| keep(p)).copied().collect(),
        }
    }
}

impl From<Vec<RawTouchPoint>> for TouchFrame {
    fn from(points: Vec<RawTouchPoint>) -> Self {
        Self::new(points)
    }
}
