//! Touch gesture recognition.
//!
//! A [`TouchGestureArea`] decides whether the touches landing on it form its
//! gesture. It competes with other areas for ownership of each touch through
//! the [`TouchRegistry`], and reports what the tracked points do through
//! [`GestureSignal`]s.
//!
//! # Recognition
//!
//! ```text
//!  WaitingForTouch ──press──▶ Undecided ──min reached──▶ WaitingForOwnership
//!        ▲                       │ timer                      │ granted ≥ min
//!        │                       ▼                            ▼
//!        └──all lifted─── Rejected ◀──denied / > max── Recognized ◀─┐
//!                                ▲                            │ < min│ ≥ min
//!                                └────────timer──── WaitingForRejection
//! ```
//!
//! The recognition timer runs only in `Undecided` and `WaitingForRejection`;
//! when it fires the gesture is rejected.
//!
//! # Events
//!
//! Everything the area reacts to goes through [`TouchGestureArea::process_event`]:
//! raw frames from the platform, unowned copies of frames for touches the
//! area competes for or watches, ownership decisions, and timer expiry.

mod points;
mod signals;
mod status;

pub use points::{FrameLists, PointChanges, PointTracker};
pub use signals::{GestureSignal, GrabRequest};
pub use status::{GestureStatus, InternalStatus};

use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::{AreaConfig, DragSettings, GestureConfig};
use crate::registry::{AreaEvent, AreaId, TouchOwnershipEvent, TouchRegistry};
use crate::timer::{Clock, RecognitionTimer};
use crate::touch::{GestureTouchPoint, Position, Rect, TouchFrame, TouchId};

/// A gesture recognizer competing for touches
#[derive(Debug)]
pub struct TouchGestureArea {
    id: AreaId,
    name: String,
    registry: TouchRegistry,
    status: InternalStatus,
    config: AreaConfig,
    drag: DragSettings,
    bounds: Option<Rect>,
    enabled: bool,
    dragging: bool,
    /// Touches submitted to the registry, no decision yet
    candidates: BTreeSet<TouchId>,
    /// Touches observed through unowned updates; disjoint from `candidates`
    watched: BTreeSet<TouchId>,
    /// Watched touches the area holds; these count toward the minimum
    owned: BTreeSet<TouchId>,
    points: PointTracker,
    timer: RecognitionTimer,
    signals: Vec<GestureSignal>,
    grab_requests: Vec<GrabRequest>,
}

impl TouchGestureArea {
    /// Create an area with default configuration, attached to `registry`
    pub fn new(name: impl Into<String>, registry: &TouchRegistry, clock: Rc<dyn Clock>) -> Self {
        let config = AreaConfig::default();
        Self {
            id: registry.allocate_area_id(),
            name: name.into(),
            registry: registry.clone(),
            status: InternalStatus::WaitingForTouch,
            config,
            drag: DragSettings::default(),
            bounds: None,
            enabled: true,
            dragging: false,
            candidates: BTreeSet::new(),
            watched: BTreeSet::new(),
            owned: BTreeSet::new(),
            points: PointTracker::new(),
            timer: RecognitionTimer::new(clock, config.recognition_period()),
            signals: Vec::new(),
            grab_requests: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: &GestureConfig) -> Self {
        self.drag = config.drag;
        self.config = config.area;
        self.timer.set_interval(config.area.recognition_period());
        self
    }

    pub fn with_area_config(mut self, config: AreaConfig) -> Self {
        self.config = config;
        self.timer.set_interval(config.recognition_period());
        self
    }

    pub fn with_drag_settings(mut self, drag: DragSettings) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    // ============= Accessors =============

    pub fn id(&self) -> AreaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> GestureStatus {
        self.status.external()
    }

    pub fn internal_status(&self) -> InternalStatus {
        self.status
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Current points, in press order
    pub fn touch_points(&self) -> &[GestureTouchPoint] {
        self.points.cached()
    }

    pub fn touch_point_count(&self) -> usize {
        self.points.cached().len()
    }

    pub fn touch_point_at(&self, index: usize) -> Option<&GestureTouchPoint> {
        self.points.cached().get(index)
    }

    pub fn candidate_touches(&self) -> &BTreeSet<TouchId> {
        &self.candidates
    }

    pub fn watched_touches(&self) -> &BTreeSet<TouchId> {
        &self.watched
    }

    pub fn owned_touches(&self) -> &BTreeSet<TouchId> {
        &self.owned
    }

    pub fn minimum_touch_points(&self) -> usize {
        self.config.minimum_touch_points
    }

    pub fn maximum_touch_points(&self) -> usize {
        self.config.maximum()
    }

    pub fn recognition_period(&self) -> Duration {
        self.config.recognition_period()
    }

    pub fn drag_settings(&self) -> DragSettings {
        self.drag
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a scene position hits the area. Unbounded areas accept everything.
    pub fn contains(&self, pos: Position) -> bool {
        self.bounds.map_or(true, |b| b.contains(pos))
    }

    /// Deadline of the running recognition timer
    pub fn recognition_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    // ============= Configuration =============

    pub fn set_minimum_touch_points(&mut self, value: usize) {
        if self.config.minimum_touch_points != value {
            self.config.minimum_touch_points = value;
            self.emit(GestureSignal::MinimumTouchPointsChanged(value));
        }
    }

    pub fn set_maximum_touch_points(&mut self, value: usize) {
        if self.config.maximum() != value {
            self.config.maximum_touch_points = Some(value);
            self.emit(GestureSignal::MaximumTouchPointsChanged(value));
        }
    }

    /// Change the recognition period; a running timer restarts with it
    pub fn set_recognition_period(&mut self, period: Duration) {
        if self.config.recognition_period() != period {
            self.config = self.config.with_recognition_period(period);
            self.timer.set_interval(period);
            self.emit(GestureSignal::RecognitionPeriodChanged(period));
        }
    }

    pub fn set_drag_settings(&mut self, drag: DragSettings) {
        self.drag = drag;
    }

    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    /// A disabled area ignores raw frames; unowned updates and ownership
    /// decisions still reach it so pending bookkeeping can complete
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ============= Outboxes =============

    /// Take the signals emitted since the last call
    pub fn take_signals(&mut self) -> Vec<GestureSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Take the grab changes requested since the last call
    pub fn take_grab_requests(&mut self) -> Vec<GrabRequest> {
        std::mem::take(&mut self.grab_requests)
    }

    /// Poll the recognition timer; true when it fired and a
    /// [`AreaEvent::RecognitionTimeout`] is due
    pub fn recognition_timer_expired(&mut self) -> bool {
        self.timer.poll()
    }

    // ============= Event entry point =============

    /// Feed one event into the state machine.
    ///
    /// Returns whether the event was accepted. For raw frames an accepted
    /// event means the area takes the implicit grab of the presses in it.
    pub fn process_event(&mut self, event: AreaEvent) -> bool {
        match event {
            AreaEvent::Touch(frame) => self.touch_event(&frame),
            AreaEvent::Unowned(frame) => {
                self.unowned_touch_event(&frame);
                false
            }
            AreaEvent::Ownership(ownership) => {
                self.touch_ownership_event(ownership);
                true
            }
            AreaEvent::RecognitionTimeout => {
                if self.status.is_timed() {
                    tracing::debug!(area = %self.name, status = %self.status, "Recognition period elapsed");
                    self.reject_gesture();
                }
                true
            }
        }
    }

    /// Give up the gesture: withdraw candidacy, watch those touches instead
    /// and drop every grab
    pub fn reject_gesture(&mut self) {
        tracing::debug!(
            area = %self.name,
            candidates = ?self.candidates,
            watched = ?self.watched,
            "Rejecting gesture"
        );
        self.grab_requests.push(GrabRequest::UngrabAll);

        for touch_id in std::mem::take(&mut self.candidates) {
            self.registry.remove_candidate_owner_for_touch(touch_id, self.id);
            self.registry.add_touch_watcher(touch_id, self.id);
            self.watched.insert(touch_id);
        }
        self.owned.clear();

        if self.watched.is_empty() {
            self.set_status(InternalStatus::WaitingForTouch);
        } else {
            self.set_status(InternalStatus::Rejected);
        }
    }

    // ============= Raw frames =============

    fn touch_event(&mut self, frame: &TouchFrame) -> bool {
        if !self.enabled {
            tracing::trace!(area = %self.name, "Disabled, raw frame ignored");
            return false;
        }
        tracing::trace!(area = %self.name, status = %self.status, points = frame.len(), "Raw frame");

        let accepted = match self.status {
            InternalStatus::WaitingForTouch | InternalStatus::Undecided => {
                self.touch_event_undecided(frame)
            }
            InternalStatus::WaitingForOwnership => self.touch_event_waiting_for_ownership(frame),
            InternalStatus::Recognized | InternalStatus::WaitingForRejection => {
                self.touch_event_recognized(frame)
            }
            InternalStatus::Rejected => {
                self.watch_new_presses(frame);
                false
            }
        };

        self.update_touch_points(frame);
        accepted
    }

    fn touch_event_undecided(&mut self, frame: &TouchFrame) -> bool {
        self.add_candidates_from_presses(frame);

        let count = self.candidates.len();
        if count > self.config.maximum() {
            self.reject_gesture();
            false
        } else if count >= self.effective_minimum() {
            self.set_status(InternalStatus::WaitingForOwnership);
            for touch_id in self.candidates.clone() {
                self.registry.request_touch_ownership(touch_id, self.id);
            }
            true
        } else {
            if count > 0 && self.status == InternalStatus::WaitingForTouch {
                self.set_status(InternalStatus::Undecided);
            }
            false
        }
    }

    fn touch_event_waiting_for_ownership(&mut self, frame: &TouchFrame) -> bool {
        let added = self.add_candidates_from_presses(frame);

        if self.candidates.len() + self.owned.len() > self.config.maximum() {
            self.reject_gesture();
            return false;
        }
        for touch_id in added {
            self.registry.request_touch_ownership(touch_id, self.id);
        }
        true
    }

    fn touch_event_recognized(&mut self, frame: &TouchFrame) -> bool {
        for point in frame.points.iter().filter(|p| p.is_pressed()) {
            if self.watched.contains(&point.id) || self.candidates.contains(&point.id) {
                continue;
            }
            self.registry.add_touch_watcher(point.id, self.id);
            self.watched.insert(point.id);
            if self.registry.claim_touch(point.id, self.id) {
                self.owned.insert(point.id);
            } else {
                tracing::debug!(area = %self.name, touch_id = point.id, "Press owned elsewhere, watching only");
            }
        }

        if self.owned.len() > self.config.maximum() {
            self.reject_gesture();
            false
        } else {
            if self.owned.len() >= self.effective_minimum()
                && self.status == InternalStatus::WaitingForRejection
            {
                self.set_status(InternalStatus::Recognized);
            }
            true
        }
    }

    /// Register every new press as a candidate, returning the new ids
    fn add_candidates_from_presses(&mut self, frame: &TouchFrame) -> Vec<TouchId> {
        let mut added = Vec::new();
        for point in frame.points.iter().filter(|p| p.is_pressed()) {
            if self.candidates.contains(&point.id) || self.watched.contains(&point.id) {
                continue;
            }
            self.registry.add_candidate_owner_for_touch(point.id, self.id);
            self.candidates.insert(point.id);
            added.push(point.id);
        }
        added
    }

    fn watch_new_presses(&mut self, frame: &TouchFrame) {
        for point in frame.points.iter().filter(|p| p.is_pressed()) {
            if !self.watched.contains(&point.id) && !self.candidates.contains(&point.id) {
                self.registry.add_touch_watcher(point.id, self.id);
                self.watched.insert(point.id);
            }
        }
    }

    // ============= Ownership =============

    fn touch_ownership_event(&mut self, event: TouchOwnershipEvent) {
        let touch_id = event.touch_id;
        tracing::debug!(area = %self.name, touch_id, gained = event.gained, "Ownership decision");

        if !self.candidates.contains(&touch_id) {
            tracing::debug!(area = %self.name, touch_id, "Ownership decision for non-candidate ignored");
            return;
        }

        if !event.gained {
            self.reject_gesture();
            return;
        }

        self.candidates.remove(&touch_id);
        self.grab_requests.push(GrabRequest::Grab(touch_id));
        self.registry.add_touch_watcher(touch_id, self.id);
        self.watched.insert(touch_id);
        self.owned.insert(touch_id);

        if self.owned.len() > self.config.maximum() {
            self.reject_gesture();
        } else if self.owned.len() >= self.effective_minimum()
            && matches!(
                self.status,
                InternalStatus::WaitingForOwnership | InternalStatus::WaitingForRejection
            )
        {
            self.set_status(InternalStatus::Recognized);
        }
    }

    // ============= Unowned frames =============

    fn unowned_touch_event(&mut self, frame: &TouchFrame) {
        tracing::trace!(area = %self.name, status = %self.status, points = frame.len(), "Unowned frame");

        match self.status {
            InternalStatus::WaitingForTouch => {}
            InternalStatus::Undecided => {
                for point in frame.points.iter().filter(|p| p.is_released()) {
                    self.forget_touch(point.id);
                }
                if self.candidates.is_empty() {
                    self.set_status(InternalStatus::WaitingForTouch);
                }
            }
            InternalStatus::WaitingForOwnership => {
                for point in frame.points.iter().filter(|p| p.is_released()) {
                    self.forget_touch(point.id);
                }
                if self.candidates.is_empty() && self.watched.is_empty() {
                    self.set_status(InternalStatus::WaitingForTouch);
                } else if self.candidates.len() + self.owned.len() < self.effective_minimum() {
                    // Not enough touches left to ever reach the minimum
                    self.reject_gesture();
                }
            }
            InternalStatus::Recognized | InternalStatus::WaitingForRejection => {
                for point in frame.points.iter().filter(|p| p.is_released()) {
                    self.forget_touch(point.id);
                }
                if self.owned.len() < self.effective_minimum()
                    && self.status == InternalStatus::Recognized
                {
                    self.set_status(InternalStatus::WaitingForRejection);
                }
            }
            InternalStatus::Rejected => {
                self.watch_new_presses(frame);
                for point in frame.points.iter().filter(|p| p.is_released()) {
                    self.forget_touch(point.id);
                }
                if self.watched.is_empty() {
                    self.set_status(InternalStatus::WaitingForTouch);
                }
            }
        }

        self.update_touch_points(frame);
    }

    /// Drop a lifted touch from every set and from the registry
    fn forget_touch(&mut self, touch_id: TouchId) {
        if self.candidates.remove(&touch_id) {
            self.registry.remove_candidate_owner_for_touch(touch_id, self.id);
        }
        if self.watched.remove(&touch_id) {
            self.registry.remove_touch_watcher(touch_id, self.id);
        }
        self.owned.remove(&touch_id);
    }

    // ============= State =============

    fn effective_minimum(&self) -> usize {
        self.config.minimum_touch_points.max(1)
    }

    fn set_status(&mut self, status: InternalStatus) {
        if status == self.status {
            return;
        }
        let old = self.status;
        self.status = status;

        if old.external() != status.external() {
            self.emit(GestureSignal::StatusChanged(status.external()));
        }
        if old.is_timed() {
            self.timer.stop();
        }

        tracing::debug!(area = %self.name, "{} -> {}", old, status);

        match status {
            InternalStatus::WaitingForTouch
            | InternalStatus::Recognized
            | InternalStatus::Rejected => self.resync_cached_touch_points(),
            InternalStatus::Undecided | InternalStatus::WaitingForRejection => self.timer.start(),
            InternalStatus::WaitingForOwnership => {}
        }
    }

    fn set_dragging(&mut self, dragging: bool) {
        if self.dragging == dragging {
            return;
        }
        tracing::debug!(area = %self.name, dragging, "Dragging changed");
        self.dragging = dragging;
        self.emit(GestureSignal::DraggingChanged(dragging));
    }

    fn emit(&mut self, signal: GestureSignal) {
        self.signals.push(signal);
    }

    // ============= Points =============

    fn update_touch_points(&mut self, frame: &TouchFrame) {
        let updateable = self.status != InternalStatus::WaitingForRejection;
        let origin = self.bounds.map(|b| b.origin()).unwrap_or_default();
        let changes = self.points.apply_frame(frame, origin, &self.drag, updateable);
        if updateable {
            self.emit_point_changes(changes);
        }
    }

    fn resync_cached_touch_points(&mut self) {
        let changes = self.points.resync();
        self.emit_point_changes(changes);
    }

    fn emit_point_changes(&mut self, changes: PointChanges) {
        if changes.wants_drag && !self.dragging {
            self.set_dragging(true);
        }

        let lists = self.points.lists().clone();
        if changes.ended {
            if self.points.live_count() == 0 {
                if !self.dragging {
                    self.emit(GestureSignal::Clicked);
                }
                self.set_dragging(false);
            }
            tracing::debug!(area = %self.name, points = ?ids(&lists.released), "Released");
            self.emit(GestureSignal::Released(lists.released));
        }
        if changes.added {
            tracing::debug!(area = %self.name, points = ?ids(&lists.pressed), "Pressed");
            self.emit(GestureSignal::Pressed(lists.pressed));
        }
        if changes.moved {
            tracing::trace!(area = %self.name, points = ?ids(&lists.moved), "Updated");
            self.emit(GestureSignal::Updated(lists.moved));
        }
        if changes.any() {
            self.emit(GestureSignal::TouchPointsUpdated);
        }
    }
}

impl Drop for TouchGestureArea {
    fn drop(&mut self) {
        self.registry.detach_area(self.id);
    }
}

fn ids(points: &[GestureTouchPoint]) -> Vec<TouchId> {
    points.iter().map(|p| p.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Delivery, OwnershipPolicy};
    use crate::timer::ManualClock;
    use crate::touch::RawTouchPoint;

    fn setup() -> (TouchRegistry, ManualClock, TouchGestureArea) {
        let registry = TouchRegistry::new();
        let clock = ManualClock::new();
        let area = TouchGestureArea::new("area", &registry, Rc::new(clock.clone()));
        (registry, clock, area)
    }

    /// Run a raw frame through registry and area the way the dispatcher does
    fn raw(registry: &TouchRegistry, area: &mut TouchGestureArea, points: Vec<RawTouchPoint>) -> bool {
        let frame = TouchFrame::new(points);
        registry.begin_frame(&frame);
        let accepted = area.process_event(AreaEvent::Touch(frame.clone()));
        pump(registry, area);
        if let Some(sub) = registry.unowned_targets(&frame).remove(&area.id()) {
            area.process_event(AreaEvent::Unowned(sub));
            pump(registry, area);
        }
        registry.end_frame(&frame);
        accepted
    }

    fn pump(registry: &TouchRegistry, area: &mut TouchGestureArea) {
        while let Some(Delivery { target, event }) = registry.next_delivery() {
            if target == area.id() {
                area.process_event(event);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let (_registry, _clock, area) = setup();
        assert_eq!(area.status(), GestureStatus::WaitingForTouch);
        assert_eq!(area.minimum_touch_points(), 1);
        assert_eq!(area.maximum_touch_points(), usize::MAX);
        assert_eq!(area.recognition_period(), Duration::from_millis(50));
        assert!(area.touch_points().is_empty());
        assert!(!area.dragging());
    }

    #[test]
    fn test_single_touch_is_recognized() {
        let (registry, _clock, mut area) = setup();

        let accepted = raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);

        assert!(accepted);
        assert_eq!(area.internal_status(), InternalStatus::Recognized);
        assert_eq!(registry.owner_of(1), Some(area.id()));
        assert_eq!(area.owned_touches().len(), 1);
        assert!(area.candidate_touches().is_empty());
        assert_eq!(
            area.take_grab_requests(),
            vec![GrabRequest::Grab(1)]
        );
    }

    #[test]
    fn test_below_minimum_is_undecided_with_timer() {
        let (registry, _clock, mut area) = setup();
        area.set_minimum_touch_points(2);

        let accepted = raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);

        assert!(!accepted);
        assert_eq!(area.internal_status(), InternalStatus::Undecided);
        assert!(area.recognition_deadline().is_some());
        assert_eq!(registry.candidates_for(1), vec![area.id()]);
    }

    #[test]
    fn test_timeout_rejects_undecided() {
        let (registry, clock, mut area) = setup();
        area.set_minimum_touch_points(2);
        raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);

        clock.advance(Duration::from_millis(50));
        assert!(area.recognition_timer_expired());
        area.process_event(AreaEvent::RecognitionTimeout);

        assert_eq!(area.status(), GestureStatus::Rejected);
        assert!(area.candidate_touches().is_empty());
        assert!(area.watched_touches().contains(&1));
        assert_eq!(registry.watchers_for(1), vec![area.id()]);
        assert!(registry.candidates_for(1).is_empty());
    }

    #[test]
    fn test_stale_timeout_is_ignored() {
        let (registry, _clock, mut area) = setup();
        raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);
        area.process_event(AreaEvent::RecognitionTimeout);
        assert_eq!(area.internal_status(), InternalStatus::Recognized);
    }

    #[test]
    fn test_release_in_undecided_returns_to_idle() {
        let (registry, _clock, mut area) = setup();
        area.set_minimum_touch_points(2);
        raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);
        raw(&registry, &mut area, vec![RawTouchPoint::released(1, 5.0, 5.0)]);

        assert_eq!(area.status(), GestureStatus::WaitingForTouch);
        assert!(area.recognition_deadline().is_none());
        assert_eq!(registry.active_touches(), 0);
    }

    #[test]
    fn test_more_than_maximum_rejects() {
        let (registry, _clock, mut area) = setup();
        area.set_minimum_touch_points(2);
        area.set_maximum_touch_points(2);

        raw(
            &registry,
            &mut area,
            vec![
                RawTouchPoint::pressed(1, 0.0, 0.0),
                RawTouchPoint::pressed(2, 1.0, 0.0),
                RawTouchPoint::pressed(3, 2.0, 0.0),
            ],
        );

        assert_eq!(area.status(), GestureStatus::Rejected);
        assert_eq!(area.watched_touches().len(), 3);
        let statuses: Vec<GestureSignal> = area
            .take_signals()
            .into_iter()
            .filter(|s| matches!(s, GestureSignal::StatusChanged(_)))
            .collect();
        assert_eq!(
            statuses,
            vec![GestureSignal::StatusChanged(GestureStatus::Rejected)]
        );
    }

    #[test]
    fn test_denied_ownership_rejects() {
        let registry = TouchRegistry::with_policy(OwnershipPolicy::FirstRequester);
        let clock = ManualClock::new();
        let other = registry.allocate_area_id();
        let mut area = TouchGestureArea::new("area", &registry, Rc::new(clock));

        let frame = TouchFrame::new(vec![RawTouchPoint::pressed(1, 0.0, 0.0)]);
        registry.begin_frame(&frame);
        registry.add_candidate_owner_for_touch(1, other);
        registry.request_touch_ownership(1, other);
        while registry.next_delivery().is_some() {}

        area.process_event(AreaEvent::Touch(frame));
        pump(&registry, &mut area);

        assert_eq!(area.status(), GestureStatus::Rejected);
        assert_eq!(registry.owner_of(1), Some(other));
    }

    #[test]
    fn test_recognized_drops_to_waiting_for_rejection_then_idle() {
        let (registry, clock, mut area) = setup();
        raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);
        raw(&registry, &mut area, vec![RawTouchPoint::released(1, 5.0, 5.0)]);

        assert_eq!(area.internal_status(), InternalStatus::WaitingForRejection);
        assert_eq!(area.status(), GestureStatus::Recognized);

        clock.advance(Duration::from_millis(50));
        assert!(area.recognition_timer_expired());
        area.process_event(AreaEvent::RecognitionTimeout);
        assert_eq!(area.status(), GestureStatus::WaitingForTouch);
    }

    #[test]
    fn test_waiting_for_rejection_recovers() {
        let (registry, _clock, mut area) = setup();
        raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);
        raw(&registry, &mut area, vec![RawTouchPoint::released(1, 5.0, 5.0)]);
        assert_eq!(area.internal_status(), InternalStatus::WaitingForRejection);

        raw(&registry, &mut area, vec![RawTouchPoint::pressed(2, 8.0, 8.0)]);

        assert_eq!(area.internal_status(), InternalStatus::Recognized);
        assert_eq!(registry.owner_of(2), Some(area.id()));
        assert!(area.recognition_deadline().is_none());
        assert_eq!(area.touch_point_count(), 1);
        assert_eq!(area.touch_point_at(0).map(|p| p.id), Some(2));
    }

    #[test]
    fn test_config_setters_emit_on_change_only() {
        let (_registry, _clock, mut area) = setup();
        area.set_minimum_touch_points(1);
        area.set_maximum_touch_points(usize::MAX);
        area.set_recognition_period(Duration::from_millis(50));
        assert!(area.take_signals().is_empty());

        area.set_minimum_touch_points(2);
        area.set_maximum_touch_points(4);
        area.set_recognition_period(Duration::from_millis(120));
        assert_eq!(
            area.take_signals(),
            vec![
                GestureSignal::MinimumTouchPointsChanged(2),
                GestureSignal::MaximumTouchPointsChanged(4),
                GestureSignal::RecognitionPeriodChanged(Duration::from_millis(120)),
            ]
        );
    }

    #[test]
    fn test_disabled_area_ignores_raw_frames() {
        let (registry, _clock, mut area) = setup();
        area.set_enabled(false);
        let accepted = raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);
        assert!(!accepted);
        assert_eq!(area.status(), GestureStatus::WaitingForTouch);
        assert!(registry.candidates_for(1).is_empty());
    }

    #[test]
    fn test_drop_detaches_from_registry() {
        let registry = TouchRegistry::new();
        let clock = ManualClock::new();
        let mut area = TouchGestureArea::new("area", &registry, Rc::new(clock));
        area.set_minimum_touch_points(2);
        let id = area.id();
        raw(&registry, &mut area, vec![RawTouchPoint::pressed(1, 5.0, 5.0)]);
        assert!(registry.references_area(id));

        drop(area);

        assert!(!registry.references_area(id));
    }
}
