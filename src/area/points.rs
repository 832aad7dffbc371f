//! Point tracking for a gesture area
//!
//! Two views of the touches are kept:
//!
//! - **live** points follow every processed frame
//! - **cached** points are what observers see; they follow the live points
//!   except while the area is waiting for rejection, and are brought back in
//!   line by [`PointTracker::resync`] afterwards
//!
//! The pressed/moved/released lists are rebuilt from scratch for every frame
//! and describe only that frame.

use crate::config::DragSettings;
use crate::touch::{GestureTouchPoint, Position, TouchFrame, TouchId, TouchPointState};

#[derive(Debug, Clone, Copy)]
struct LivePoint {
    point: GestureTouchPoint,
    /// Scene position of the press, for drag detection
    press_position: Position,
}

/// Points that changed in the last processed frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameLists {
    pub pressed: Vec<GestureTouchPoint>,
    pub moved: Vec<GestureTouchPoint>,
    pub released: Vec<GestureTouchPoint>,
}

impl FrameLists {
    fn clear(&mut self) {
        self.pressed.clear();
        self.moved.clear();
        self.released.clear();
    }
}

/// What a frame (or a resync) changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointChanges {
    pub added: bool,
    pub moved: bool,
    pub ended: bool,
    /// A point crossed the drag threshold
    pub wants_drag: bool,
}

impl PointChanges {
    pub fn any(&self) -> bool {
        self.added || self.moved || self.ended
    }
}

#[derive(Debug, Default)]
pub struct PointTracker {
    live: Vec<LivePoint>,
    cached: Vec<GestureTouchPoint>,
    lists: FrameLists,
}

impl PointTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a frame into the live points.
    ///
    /// `origin` converts scene positions to area-local ones. When
    /// `updateable` is false the cached snapshot is left untouched.
    /// Releases of unknown ids, duplicate presses and stationary points are
    /// ignored, as are moves that neither change the position nor start a
    /// drag.
    pub fn apply_frame(
        &mut self,
        frame: &TouchFrame,
        origin: Position,
        drag: &DragSettings,
        updateable: bool,
    ) -> PointChanges {
        self.lists.clear();
        let mut changes = PointChanges::default();
        let velocity_threshold =
            (drag.start_drag_velocity > 0.0).then_some(drag.start_drag_velocity);

        for raw in &frame.points {
            let local = raw.position.offset_from(origin);
            let index = self.live_index(raw.id);

            match (raw.state, index) {
                (TouchPointState::Released, Some(index)) => {
                    let mut live = self.live.remove(index);
                    live.point.set_position(local);
                    live.point.pressed = false;
                    self.lists.released.push(live.point);
                    if updateable {
                        self.cached.retain(|p| p.id != raw.id);
                    }
                    changes.ended = true;
                }
                (TouchPointState::Pressed, None) => {
                    let point = GestureTouchPoint::new(raw.id, local);
                    self.live.push(LivePoint {
                        point,
                        press_position: raw.position,
                    });
                    self.lists.pressed.push(point);
                    if updateable {
                        match self.cached.iter_mut().find(|p| p.id == raw.id) {
                            Some(cached) => {
                                cached.set_position(local);
                            }
                            None => self.cached.push(point),
                        }
                    }
                    changes.added = true;
                }
                (TouchPointState::Moved, Some(index)) => {
                    let live = &mut self.live[index];
                    let over_threshold = raw
                        .position
                        .exceeds_displacement(live.press_position, drag.start_drag_distance)
                        || match (velocity_threshold, raw.velocity) {
                            (Some(threshold), Some(velocity)) => velocity.exceeds(threshold),
                            _ => false,
                        };
                    // A fast flick may report the same position with a new velocity
                    let starts_drag = over_threshold && !live.point.dragging;
                    if !live.point.set_position(local) && !starts_drag {
                        continue;
                    }

                    if over_threshold {
                        live.point.dragging = true;
                        changes.wants_drag = true;
                    }
                    self.lists.moved.push(live.point);
                    changes.moved = true;

                    if updateable {
                        if let Some(cached) = self.cached.iter_mut().find(|p| p.id == raw.id) {
                            cached.set_position(local);
                            if over_threshold {
                                cached.dragging = true;
                            }
                        }
                    }
                }
                (TouchPointState::Released, None) | (TouchPointState::Moved, None) => {
                    tracing::trace!(touch_id = raw.id, "Update for untracked touch skipped");
                }
                (TouchPointState::Pressed, Some(_)) | (TouchPointState::Stationary, _) => {}
            }
        }

        changes
    }

    /// Bring the cached snapshot in line with the live points, recording the
    /// difference in the frame lists
    pub fn resync(&mut self) -> PointChanges {
        self.lists.clear();
        let mut changes = PointChanges::default();

        let live_ids: Vec<TouchId> = self.live.iter().map(|l| l.point.id).collect();
        let lists = &mut self.lists;
        self.cached.retain(|cached| {
            if live_ids.contains(&cached.id) {
                return true;
            }
            let mut released = *cached;
            released.pressed = false;
            lists.released.push(released);
            changes.ended = true;
            false
        });

        for live in &self.live {
            match self.cached.iter_mut().find(|p| p.id == live.point.id) {
                Some(cached) => {
                    if *cached != live.point {
                        *cached = live.point;
                        self.lists.moved.push(live.point);
                        changes.moved = true;
                        if live.point.dragging {
                            changes.wants_drag = true;
                        }
                    }
                }
                None => {
                    self.cached.push(live.point);
                    self.lists.pressed.push(live.point);
                    changes.added = true;
                }
            }
        }

        changes
    }

    pub fn lists(&self) -> &FrameLists {
        &self.lists
    }

    /// The snapshot exposed to observers, in press order
    pub fn cached(&self) -> &[GestureTouchPoint] {
        &self.cached
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn live_index(&self, id: TouchId) -> Option<usize> {
        self.live.iter().position(|l| l.point.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touch::RawTouchPoint;

    fn frame(points: Vec<RawTouchPoint>) -> TouchFrame {
        TouchFrame::new(points)
    }

    fn apply(tracker: &mut PointTracker, points: Vec<RawTouchPoint>, updateable: bool) -> PointChanges {
        tracker.apply_frame(
            &frame(points),
            Position::default(),
            &DragSettings::default(),
            updateable,
        )
    }

    #[test]
    fn test_press_move_release() {
        let mut tracker = PointTracker::new();

        let changes = apply(&mut tracker, vec![RawTouchPoint::pressed(1, 5.0, 5.0)], true);
        assert!(changes.added);
        assert_eq!(tracker.cached().len(), 1);
        assert_eq!(tracker.lists().pressed.len(), 1);

        let changes = apply(&mut tracker, vec![RawTouchPoint::moved(1, 6.0, 5.0)], true);
        assert!(changes.moved && !changes.wants_drag);
        assert!(tracker.lists().pressed.is_empty());
        assert_eq!(tracker.cached()[0].x, 6.0);

        let changes = apply(&mut tracker, vec![RawTouchPoint::released(1, 6.0, 5.0)], true);
        assert!(changes.ended);
        assert!(!tracker.lists().released[0].pressed);
        assert!(tracker.cached().is_empty());
        assert_eq!(tracker.live_count(), 0);
    }

    #[test]
    fn test_local_coordinates() {
        let mut tracker = PointTracker::new();
        tracker.apply_frame(
            &frame(vec![RawTouchPoint::pressed(1, 105.0, 60.0)]),
            Position::new(100.0, 50.0),
            &DragSettings::default(),
            true,
        );
        assert_eq!(tracker.cached()[0].position(), Position::new(5.0, 10.0));
    }

    #[test]
    fn test_unchanged_move_is_ignored() {
        let mut tracker = PointTracker::new();
        apply(&mut tracker, vec![RawTouchPoint::pressed(1, 5.0, 5.0)], true);
        apply(&mut tracker, vec![RawTouchPoint::moved(1, 7.0, 5.0)], true);

        let changes = apply(&mut tracker, vec![RawTouchPoint::moved(1, 7.0, 5.0)], true);
        assert!(!changes.any());
        assert!(tracker.lists().moved.is_empty());
    }

    #[test]
    fn test_duplicate_press_and_stale_release_are_ignored() {
        let mut tracker = PointTracker::new();
        apply(&mut tracker, vec![RawTouchPoint::pressed(1, 5.0, 5.0)], true);

        let changes = apply(
            &mut tracker,
            vec![
                RawTouchPoint::pressed(1, 9.0, 9.0),
                RawTouchPoint::released(7, 0.0, 0.0),
                RawTouchPoint::stationary(1, 5.0, 5.0),
            ],
            true,
        );
        assert!(!changes.any());
        assert_eq!(tracker.cached()[0].position(), Position::new(5.0, 5.0));
    }

    #[test]
    fn test_drag_threshold_by_distance() {
        let mut tracker = PointTracker::new();
        apply(&mut tracker, vec![RawTouchPoint::pressed(1, 0.0, 0.0)], true);

        let changes = apply(&mut tracker, vec![RawTouchPoint::moved(1, 10.0, 0.0)], true);
        assert!(!changes.wants_drag);

        let changes = apply(&mut tracker, vec![RawTouchPoint::moved(1, 10.5, 0.0)], true);
        assert!(changes.wants_drag);
        assert!(tracker.cached()[0].dragging);
    }

    #[test]
    fn test_drag_threshold_by_velocity() {
        let mut tracker = PointTracker::new();
        let drag = DragSettings::new(100.0, 50.0);
        tracker.apply_frame(
            &frame(vec![RawTouchPoint::pressed(1, 0.0, 0.0)]),
            Position::default(),
            &drag,
            true,
        );

        let changes = tracker.apply_frame(
            &frame(vec![RawTouchPoint::moved(1, 2.0, 0.0).with_velocity(60.0, 0.0)]),
            Position::default(),
            &drag,
            true,
        );
        assert!(changes.wants_drag);
    }

    #[test]
    fn test_velocity_starts_drag_without_displacement() {
        let mut tracker = PointTracker::new();
        let drag = DragSettings::new(100.0, 50.0);
        let apply_fast = |tracker: &mut PointTracker, raw: RawTouchPoint| {
            tracker.apply_frame(&frame(vec![raw]), Position::default(), &drag, true)
        };
        apply_fast(&mut tracker, RawTouchPoint::pressed(1, 4.0, 4.0));

        let changes = apply_fast(&mut tracker, RawTouchPoint::moved(1, 4.0, 4.0).with_velocity(0.0, 80.0));
        assert!(changes.wants_drag && changes.moved);
        assert!(tracker.cached()[0].dragging);
        assert_eq!(tracker.lists().moved.len(), 1);

        // Already dragging: the same report is a no-op
        let changes = apply_fast(&mut tracker, RawTouchPoint::moved(1, 4.0, 4.0).with_velocity(0.0, 80.0));
        assert!(!changes.any());
    }

    #[test]
    fn test_velocity_ignored_when_threshold_disabled() {
        let mut tracker = PointTracker::new();
        apply(&mut tracker, vec![RawTouchPoint::pressed(1, 0.0, 0.0)], true);
        let changes = apply(
            &mut tracker,
            vec![RawTouchPoint::moved(1, 1.0, 0.0).with_velocity(1000.0, 0.0)],
            true,
        );
        assert!(!changes.wants_drag);
    }

    #[test]
    fn test_frozen_cache_and_resync() {
        let mut tracker = PointTracker::new();
        apply(
            &mut tracker,
            vec![
                RawTouchPoint::pressed(1, 0.0, 0.0),
                RawTouchPoint::pressed(2, 50.0, 0.0),
            ],
            true,
        );

        // Cache frozen: 1 lifts, 2 moves, 3 lands
        apply(
            &mut tracker,
            vec![
                RawTouchPoint::released(1, 0.0, 0.0),
                RawTouchPoint::moved(2, 52.0, 0.0),
                RawTouchPoint::pressed(3, 90.0, 0.0),
            ],
            false,
        );
        assert_eq!(tracker.cached().len(), 2);
        assert_eq!(tracker.cached()[1].x, 50.0);

        let changes = tracker.resync();
        assert!(changes.added && changes.moved && changes.ended);
        assert_eq!(tracker.lists().released[0].id, 1);
        assert_eq!(tracker.lists().moved[0].id, 2);
        assert_eq!(tracker.lists().pressed[0].id, 3);
        let ids: Vec<TouchId> = tracker.cached().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_resync_without_difference_is_quiet() {
        let mut tracker = PointTracker::new();
        apply(&mut tracker, vec![RawTouchPoint::pressed(1, 0.0, 0.0)], true);
        assert!(!tracker.resync().any());
    }
}
