//! Messages routed to gesture areas.
//!
//! Everything an area reacts to arrives as an [`AreaEvent`] through
//! `TouchGestureArea::process_event`. The registry never calls into areas
//! directly; it queues [`Delivery`] records that the dispatcher drains.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::touch::{TouchFrame, TouchId};

/// Identity of a gesture area, allocated by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area#{}", self.0)
    }
}

/// Outcome of an ownership request for a single touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchOwnershipEvent {
    pub touch_id: TouchId,
    pub gained: bool,
}

impl TouchOwnershipEvent {
    pub fn gained(touch_id: TouchId) -> Self {
        Self {
            touch_id,
            gained: true,
        }
    }

    pub fn lost(touch_id: TouchId) -> Self {
        Self {
            touch_id,
            gained: false,
        }
    }
}

/// Input to a gesture area's state machine
#[derive(Debug, Clone, PartialEq)]
pub enum AreaEvent {
    /// Raw frame delivered by the platform (presses that hit the area, and
    /// every update of touches the area has grabbed)
    Touch(TouchFrame),
    /// Copy of a frame for touches the area is a candidate for or watches
    Unowned(TouchFrame),
    /// Registry decision about a candidate touch
    Ownership(TouchOwnershipEvent),
    /// The recognition period elapsed
    RecognitionTimeout,
}

/// A queued registry notification and its recipient
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub target: AreaId,
    pub event: AreaEvent,
}
