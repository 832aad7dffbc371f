//! Recognition states

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status visible to observers of a gesture area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureStatus {
    WaitingForTouch,
    Undecided,
    Recognized,
    Rejected,
}

/// Full state of the recognition state machine.
///
/// Two internal states are hidden behind their external neighbours:
/// `WaitingForOwnership` reports as `Undecided`, `WaitingForRejection`
/// reports as `Recognized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalStatus {
    /// Idle
    WaitingForTouch,
    /// Fewer candidate touches than the minimum; timer running
    Undecided,
    /// Ownership requested, registry decision pending
    WaitingForOwnership,
    /// Owns at least the minimum number of touches
    Recognized,
    /// Dropped below the minimum after recognition; timer running
    WaitingForRejection,
    /// Lost arbitration; watching until every touch lifts
    Rejected,
}

impl InternalStatus {
    pub fn external(self) -> GestureStatus {
        match self {
            InternalStatus::WaitingForTouch => GestureStatus::WaitingForTouch,
            InternalStatus::Undecided | InternalStatus::WaitingForOwnership => {
                GestureStatus::Undecided
            }
            InternalStatus::Recognized | InternalStatus::WaitingForRejection => {
                GestureStatus::Recognized
            }
            InternalStatus::Rejected => GestureStatus::Rejected,
        }
    }

    /// States in which the recognition timer runs
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            InternalStatus::Undecided | InternalStatus::WaitingForRejection
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InternalStatus::WaitingForTouch => "WaitingForTouch",
            InternalStatus::Undecided => "Undecided",
            InternalStatus::WaitingForOwnership => "WaitingForOwnership",
            InternalStatus::Recognized => "Recognized",
            InternalStatus::WaitingForRejection => "WaitingForRejection",
            InternalStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for InternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
