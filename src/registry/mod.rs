//! Touch ownership arbitration.
//!
//! The [`TouchRegistry`] decides which gesture area owns each touch. For
//! every active touch id it keeps an ordered candidate list, a watcher list
//! and at most one owner:
//!
//! 1. Areas register as candidates when a touch lands on them
//! 2. A candidate asks for ownership once it has seen enough touches
//! 3. The [`OwnershipPolicy`] picks a winner; the winner is told it gained
//!    the touch and every other candidate is told it lost it
//! 4. Watchers keep receiving unowned copies of the touch's updates until the
//!    touch ends
//!
//! The registry never calls into areas. Decisions are queued as
//! [`Delivery`] records and drained by the dispatcher before the frame that
//! caused them finishes processing.
//!
//! There is one registry per process. It is created explicitly and every
//! area receives a clone of the handle at construction.

mod entry;
mod events;
mod policy;

pub use entry::{Candidate, TouchEntry};
pub use events::{AreaEvent, AreaId, Delivery, TouchOwnershipEvent};
pub use policy::OwnershipPolicy;

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::touch::{RawTouchPoint, TouchFrame, TouchId};

#[derive(Debug, Default)]
struct RegistryState {
    policy: OwnershipPolicy,
    entries: BTreeMap<TouchId, TouchEntry>,
    outbox: VecDeque<Delivery>,
    next_area: u32,
    next_request: u64,
}

impl RegistryState {
    fn notify(&mut self, target: AreaId, event: TouchOwnershipEvent) {
        self.outbox.push_back(Delivery {
            target,
            event: AreaEvent::Ownership(event),
        });
    }

    /// Grant the touch if the policy has a winner; deny everyone else
    fn resolve(&mut self, touch_id: TouchId) {
        let policy = self.policy;
        let Some(entry) = self.entries.get_mut(&touch_id) else {
            return;
        };
        if entry.owner.is_some() {
            return;
        }
        let Some(winner) = policy.winner(entry) else {
            return;
        };

        entry.owner = Some(winner);
        let losers: Vec<AreaId> = entry
            .candidates
            .drain(..)
            .map(|c| c.area)
            .filter(|area| *area != winner)
            .collect();

        tracing::debug!(
            touch_id,
            %winner,
            losers = losers.len(),
            "Touch ownership granted"
        );

        self.notify(winner, TouchOwnershipEvent::gained(touch_id));
        for loser in losers {
            self.notify(loser, TouchOwnershipEvent::lost(touch_id));
        }
    }
}

/// Shared handle to the process-wide touch arbiter
#[derive(Debug, Clone, Default)]
pub struct TouchRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl TouchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: OwnershipPolicy) -> Self {
        let registry = Self::default();
        registry.state.borrow_mut().policy = policy;
        registry
    }

    pub fn policy(&self) -> OwnershipPolicy {
        self.state.borrow().policy
    }

    /// Allocate an identity for a new gesture area
    pub fn allocate_area_id(&self) -> AreaId {
        let mut state = self.state.borrow_mut();
        let id = AreaId(state.next_area);
        state.next_area += 1;
        id
    }

    /// Register `area` as contending for `touch_id`. Idempotent.
    ///
    /// A touch that already has an owner accepts no new candidates: the late
    /// area is told it lost the touch instead.
    pub fn add_candidate_owner_for_touch(&self, touch_id: TouchId, area: AreaId) {
        let mut state = self.state.borrow_mut();
        let owner = state.entries.entry(touch_id).or_default().owner;

        match owner {
            Some(owner) if owner == area => {}
            Some(_) => {
                tracing::debug!(touch_id, %area, "Late candidate for owned touch");
                state.notify(area, TouchOwnershipEvent::lost(touch_id));
            }
            None => {
                let entry = state.entries.entry(touch_id).or_default();
                if !entry.is_candidate(area) {
                    entry.candidates.push(Candidate {
                        area,
                        requested: None,
                    });
                    tracing::trace!(touch_id, %area, "Candidate added");
                }
            }
        }
    }

    /// Withdraw candidacy. Unknown touches or areas are ignored.
    pub fn remove_candidate_owner_for_touch(&self, touch_id: TouchId, area: AreaId) {
        let mut state = self.state.borrow_mut();
        let Some(entry) = state.entries.get_mut(&touch_id) else {
            return;
        };
        let before = entry.candidates.len();
        entry.candidates.retain(|c| c.area != area);
        if entry.candidates.len() != before {
            tracing::trace!(touch_id, %area, "Candidate removed");
            // An earlier candidate leaving may unblock a waiting request
            state.resolve(touch_id);
        }
    }

    /// Ask for exclusive ownership of `touch_id`.
    ///
    /// Each candidate's request is recorded once; repeated requests are
    /// ignored. An area that was not yet a candidate becomes one first.
    pub fn request_touch_ownership(&self, touch_id: TouchId, area: AreaId) {
        let mut state = self.state.borrow_mut();
        let owner = state.entries.entry(touch_id).or_default().owner;

        match owner {
            Some(owner) if owner == area => return,
            Some(_) => {
                state.notify(area, TouchOwnershipEvent::lost(touch_id));
                return;
            }
            None => {}
        }

        let seq = state.next_request;
        let entry = state.entries.entry(touch_id).or_default();
        if let Some(candidate) = entry.candidate_mut(area) {
            if candidate.requested.is_some() {
                return;
            }
            candidate.requested = Some(seq);
        } else {
            entry.candidates.push(Candidate {
                area,
                requested: Some(seq),
            });
        }
        state.next_request += 1;
        tracing::trace!(touch_id, %area, "Ownership requested");
        state.resolve(touch_id);
    }

    /// Take `touch_id` without competing for it, as an area that already
    /// recognized its gesture does with further presses. Every other
    /// candidate is told it lost. Fails if another area owns the touch.
    pub fn claim_touch(&self, touch_id: TouchId, area: AreaId) -> bool {
        let mut state = self.state.borrow_mut();
        let entry = state.entries.entry(touch_id).or_default();
        if let Some(owner) = entry.owner {
            return owner == area;
        }

        entry.owner = Some(area);
        let losers: Vec<AreaId> = entry
            .candidates
            .drain(..)
            .map(|c| c.area)
            .filter(|candidate| *candidate != area)
            .collect();
        tracing::debug!(touch_id, %area, losers = losers.len(), "Touch claimed");
        for loser in losers {
            state.notify(loser, TouchOwnershipEvent::lost(touch_id));
        }
        true
    }

    /// Receive unowned updates for `touch_id`. Idempotent.
    pub fn add_touch_watcher(&self, touch_id: TouchId, area: AreaId) {
        let mut state = self.state.borrow_mut();
        let entry = state.entries.entry(touch_id).or_default();
        if !entry.is_watcher(area) {
            entry.watchers.push(area);
        }
    }

    pub fn remove_touch_watcher(&self, touch_id: TouchId, area: AreaId) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.entries.get_mut(&touch_id) {
            entry.watchers.retain(|w| *w != area);
        }
    }

    /// Remove every candidacy, watch and ownership held by `area`,
    /// including notifications still queued for it
    pub fn detach_area(&self, area: AreaId) {
        let mut state = self.state.borrow_mut();
        let touched: Vec<TouchId> = state
            .entries
            .iter_mut()
            .filter_map(|(id, entry)| entry.forget(area).then_some(*id))
            .collect();
        state.outbox.retain(|d| d.target != area);
        for touch_id in &touched {
            state.resolve(*touch_id);
        }
        if !touched.is_empty() {
            tracing::debug!(%area, touches = touched.len(), "Area detached from registry");
        }
    }

    /// Open entries for touches pressed in this frame
    pub fn begin_frame(&self, frame: &TouchFrame) {
        let mut state = self.state.borrow_mut();
        for point in frame.points.iter().filter(|p| p.is_pressed()) {
            state.entries.entry(point.id).or_default();
        }
    }

    /// Close entries for touches released in this frame
    pub fn end_frame(&self, frame: &TouchFrame) {
        let mut state = self.state.borrow_mut();
        for point in frame.points.iter().filter(|p| p.is_released()) {
            if state.entries.remove(&point.id).is_some() {
                tracing::trace!(touch_id = point.id, "Touch entry closed");
            }
        }
    }

    /// Per area, the points of `frame` it should receive as unowned updates
    pub fn unowned_targets(&self, frame: &TouchFrame) -> BTreeMap<AreaId, TouchFrame> {
        let state = self.state.borrow();
        let mut targets: BTreeMap<AreaId, Vec<RawTouchPoint>> = BTreeMap::new();
        for point in &frame.points {
            if let Some(entry) = state.entries.get(&point.id) {
                for area in entry.unowned_recipients() {
                    targets.entry(area).or_default().push(*point);
                }
            }
        }
        targets
            .into_iter()
            .map(|(area, points)| (area, TouchFrame::new(points)))
            .collect()
    }

    /// Pop the oldest queued notification
    pub fn next_delivery(&self) -> Option<Delivery> {
        self.state.borrow_mut().outbox.pop_front()
    }

    pub fn has_pending_deliveries(&self) -> bool {
        !self.state.borrow().outbox.is_empty()
    }

    pub fn owner_of(&self, touch_id: TouchId) -> Option<AreaId> {
        self.state
            .borrow()
            .entries
            .get(&touch_id)
            .and_then(|e| e.owner)
    }

    pub fn candidates_for(&self, touch_id: TouchId) -> Vec<AreaId> {
        self.state
            .borrow()
            .entries
            .get(&touch_id)
            .map(|e| e.candidates.iter().map(|c| c.area).collect())
            .unwrap_or_default()
    }

    pub fn watchers_for(&self, touch_id: TouchId) -> Vec<AreaId> {
        self.state
            .borrow()
            .entries
            .get(&touch_id)
            .map(|e| e.watchers.clone())
            .unwrap_or_default()
    }

    /// Whether any entry still references `area`
    pub fn references_area(&self, area: AreaId) -> bool {
        self.state.borrow().entries.values().any(|e| {
            e.owner == Some(area) || e.is_candidate(area) || e.is_watcher(area)
        })
    }

    /// Number of touches currently tracked
    pub fn active_touches(&self) -> usize {
        self.state.borrow().entries.len()
    }
}
