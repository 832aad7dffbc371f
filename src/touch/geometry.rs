//! Geometry types for touch positions and hit areas
//!
//! Positions arrive from the platform in scene coordinates. Gesture areas
//! report them back relative to their own origin, so these types carry the
//! small amount of arithmetic needed for that conversion and for hit testing.

use serde::{Deserialize, Serialize};

/// A point in scene or area-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position relative to the given origin
    pub fn offset_from(&self, origin: Position) -> Position {
        Position {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }

    /// True when either axis moved further than `threshold` from `start`
    ///
    /// This is an axis-aligned check, not a euclidean distance: a finger that
    /// slides 11px to the right exceeds a 10px threshold even if the diagonal
    /// distance of a smaller two-axis move would not.
    pub fn exceeds_displacement(&self, start: Position, threshold: f64) -> bool {
        (self.x - start.x).abs() > threshold || (self.y - start.y).abs() > threshold
    }
}

/// Per-point velocity reported by devices with velocity capability
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when either component is faster than `threshold`
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.x.abs() > threshold || self.y.abs() > threshold
    }
}

/// Axis-aligned rectangle used as a gesture area's hit region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Check whether a scene position falls inside the rectangle
    ///
    /// The left and top edges are inclusive, the right and bottom edges
    /// exclusive, so adjacent areas never both claim a point on their shared
    /// border.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.x < self.x + self.width
            && pos.y >= self.y
            && pos.y < self.y + self.height
    }
}
