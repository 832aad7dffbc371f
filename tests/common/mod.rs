//! Common test utilities for integration tests.
//!
//! [`Harness`] wraps a [`GestureDispatcher`] running on a [`ManualClock`] and
//! keeps every emitted signal so tests can assert on the full history.
//!
//! # Example
//!
//! ```ignore
//! let mut h = Harness::new();
//! let tap = h.area("tap", AreaConfig::new());
//! h.frame(vec![press(1, 5.0, 5.0)]);
//! assert_eq!(h.status(tap), GestureStatus::Recognized);
//! ```

#![allow(dead_code)]

use std::rc::Rc;
use std::time::Duration;

use shell_gestures::area::{GestureSignal, GestureStatus, TouchGestureArea};
use shell_gestures::config::AreaConfig;
use shell_gestures::dispatch::GestureDispatcher;
use shell_gestures::registry::{AreaId, OwnershipPolicy, TouchRegistry};
use shell_gestures::timer::ManualClock;
use shell_gestures::touch::{RawTouchPoint, TouchFrame, TouchId};

pub fn press(id: TouchId, x: f64, y: f64) -> RawTouchPoint {
    RawTouchPoint::pressed(id, x, y)
}

pub fn move_to(id: TouchId, x: f64, y: f64) -> RawTouchPoint {
    RawTouchPoint::moved(id, x, y)
}

pub fn release(id: TouchId, x: f64, y: f64) -> RawTouchPoint {
    RawTouchPoint::released(id, x, y)
}

/// Dispatcher plus manual clock plus recorded signal history.
pub struct Harness {
    pub clock: ManualClock,
    pub dispatcher: GestureDispatcher,
    pub history: Vec<(AreaId, GestureSignal)>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(OwnershipPolicy::default())
    }

    pub fn with_policy(policy: OwnershipPolicy) -> Self {
        let clock = ManualClock::new();
        let dispatcher =
            GestureDispatcher::new(TouchRegistry::with_policy(policy), Rc::new(clock.clone()));
        Self {
            clock,
            dispatcher,
            history: Vec::new(),
        }
    }

    /// Add an area on top of the stack
    pub fn area(&mut self, name: &str, config: AreaConfig) -> AreaId {
        let area = TouchGestureArea::new(name, self.dispatcher.registry(), self.dispatcher.clock())
            .with_area_config(config);
        self.dispatcher.add_area(area)
    }

    pub fn frame(&mut self, points: Vec<RawTouchPoint>) {
        self.dispatcher.dispatch_frame(TouchFrame::new(points));
        self.collect();
    }

    pub fn wait(&mut self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.dispatcher.process_timers();
        self.collect();
    }

    pub fn remove(&mut self, id: AreaId) {
        self.dispatcher.remove_area(id);
        self.collect();
    }

    pub fn status(&self, id: AreaId) -> GestureStatus {
        self.get(id).status()
    }

    pub fn get(&self, id: AreaId) -> &TouchGestureArea {
        self.dispatcher
            .area(id)
            .unwrap_or_else(|| panic!("area {} not in dispatcher", id))
    }

    pub fn registry(&self) -> &TouchRegistry {
        self.dispatcher.registry()
    }

    /// Every signal emitted by one area so far
    pub fn signals(&self, id: AreaId) -> Vec<GestureSignal> {
        self.history
            .iter()
            .filter(|(area, _)| *area == id)
            .map(|(_, signal)| signal.clone())
            .collect()
    }

    /// The sequence of external statuses an area went through
    pub fn statuses(&self, id: AreaId) -> Vec<GestureStatus> {
        self.signals(id)
            .into_iter()
            .filter_map(|signal| match signal {
                GestureSignal::StatusChanged(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn collect(&mut self) {
        self.history.extend(self.dispatcher.drain_signals());
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
