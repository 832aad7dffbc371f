//! The touch point value type exposed to gesture observers

use serde::{Deserialize, Serialize};

use super::{Position, TouchId};

/// A tracked contact as seen by a gesture area's observers.
///
/// Position is local to the area that tracks the point. `pressed` drops to
/// false on the release frame; `dragging` latches once the point crossed the
/// drag threshold and stays set until the point is released.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureTouchPoint {
    pub id: TouchId,
    pub x: f64,
    pub y: f64,
    pub pressed: bool,
    pub dragging: bool,
}

impl GestureTouchPoint {
    /// A freshly pressed point
    pub fn new(id: TouchId, position: Position) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            pressed: true,
            dragging: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Move the point, returning whether the position actually changed
    pub fn set_position(&mut self, position: Position) -> bool {
        if self.x == position.x && self.y == position.y {
            return false;
        }
        self.x = position.x;
        self.y = position.y;
        true
    }
}
