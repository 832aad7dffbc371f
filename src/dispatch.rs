//! Frame delivery.
//!
//! [`GestureDispatcher`] plays the part of the windowing system for a set of
//! gesture areas sharing one [`TouchRegistry`]:
//!
//! 1. New presses are hit-tested against the areas from the top (last added)
//!    down. The first area that accepts the frame grabs those presses.
//! 2. Grabbed touches go straight to their grabbing area.
//! 3. After every area call the registry outbox is drained, so ownership
//!    decisions reach their areas before anything else happens.
//! 4. The frame is then fanned out as unowned updates to the candidates and
//!    watchers of each touch it contains.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use crate::area::{GestureSignal, GrabRequest, TouchGestureArea};
use crate::config::GestureConfig;
use crate::registry::{AreaEvent, AreaId, Delivery, TouchRegistry};
use crate::timer::Clock;
use crate::touch::{RawTouchPoint, TouchFrame, TouchId};

/// Owns the gesture areas and routes frames, ownership decisions and timer
/// expiry to them
#[derive(Debug)]
pub struct GestureDispatcher {
    registry: TouchRegistry,
    clock: Rc<dyn Clock>,
    config: GestureConfig,
    /// Stacking order: later entries are on top
    areas: Vec<TouchGestureArea>,
    grabs: HashMap<TouchId, AreaId>,
    signals: Vec<(AreaId, GestureSignal)>,
}

impl GestureDispatcher {
    pub fn new(registry: TouchRegistry, clock: Rc<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            config: GestureConfig::default(),
            areas: Vec::new(),
            grabs: HashMap::new(),
            signals: Vec::new(),
        }
    }

    /// Configuration applied to areas created through [`Self::create_area`]
    pub fn with_config(mut self, config: GestureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &TouchRegistry {
        &self.registry
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    /// Create an area on top of the existing ones
    pub fn create_area(&mut self, name: impl Into<String>) -> AreaId {
        let area = TouchGestureArea::new(name, &self.registry, self.clock())
            .with_config(&self.config);
        self.add_area(area)
    }

    /// Put an area built against this dispatcher's registry on top
    pub fn add_area(&mut self, area: TouchGestureArea) -> AreaId {
        let id = area.id();
        tracing::debug!(area = %area.name(), %id, "Area added");
        self.areas.push(area);
        id
    }

    /// Remove and drop an area. Its registry state goes with it, which may
    /// settle ownership for the areas that remain.
    pub fn remove_area(&mut self, id: AreaId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let area = self.areas.remove(index);
        tracing::debug!(area = %area.name(), %id, "Area removed");
        drop(area);

        self.grabs.retain(|_, holder| *holder != id);
        self.pump();
        true
    }

    pub fn area(&self, id: AreaId) -> Option<&TouchGestureArea> {
        self.areas.iter().find(|a| a.id() == id)
    }

    pub fn area_mut(&mut self, id: AreaId) -> Option<&mut TouchGestureArea> {
        self.areas.iter_mut().find(|a| a.id() == id)
    }

    pub fn areas(&self) -> impl Iterator<Item = &TouchGestureArea> {
        self.areas.iter()
    }

    pub fn grab_holder(&self, touch_id: TouchId) -> Option<AreaId> {
        self.grabs.get(&touch_id).copied()
    }

    /// Deliver one frame of raw touch data
    pub fn dispatch_frame(&mut self, frame: TouchFrame) {
        if frame.is_empty() {
            return;
        }
        let deduped = frame.deduplicated();
        let frame = if deduped.len() < frame.len() {
            tracing::debug!(
                dropped = frame.len() - deduped.len(),
                "Ignoring repeated touch ids in frame"
            );
            deduped
        } else {
            frame
        };
        tracing::trace!(points = frame.len(), "Dispatching frame");
        self.registry.begin_frame(&frame);

        self.deliver_raw(&frame);

        for (target, sub) in self.registry.unowned_targets(&frame) {
            if let Some(index) = self.index_of(target) {
                self.call(index, AreaEvent::Unowned(sub));
                self.pump();
            }
        }

        self.registry.end_frame(&frame);
        for point in frame.points.iter().filter(|p| p.is_released()) {
            self.grabs.remove(&point.id);
        }
    }

    /// Fire every recognition timer whose deadline has passed
    pub fn process_timers(&mut self) {
        for index in 0..self.areas.len() {
            if self.areas[index].recognition_timer_expired() {
                self.call(index, AreaEvent::RecognitionTimeout);
                self.pump();
            }
        }
    }

    /// Earliest pending recognition deadline across all areas
    pub fn next_deadline(&self) -> Option<Instant> {
        self.areas
            .iter()
            .filter_map(TouchGestureArea::recognition_deadline)
            .min()
    }

    /// Take every signal emitted since the last call, in emission order
    pub fn drain_signals(&mut self) -> Vec<(AreaId, GestureSignal)> {
        std::mem::take(&mut self.signals)
    }

    fn deliver_raw(&mut self, frame: &TouchFrame) {
        let mut offered: Vec<RawTouchPoint> = frame
            .points
            .iter()
            .filter(|p| p.is_pressed() && !self.grabs.contains_key(&p.id))
            .copied()
            .collect();

        for index in (0..self.areas.len()).rev() {
            let id = self.areas[index].id();
            let area = &self.areas[index];
            let grabbed = frame.filtered(|p| self.grabs.get(&p.id) == Some(&id));
            let hits: Vec<RawTouchPoint> = offered
                .iter()
                .filter(|p| area.contains(p.position))
                .copied()
                .collect();

            if grabbed.is_empty() && hits.is_empty() {
                continue;
            }

            // Keep frame order across grabbed and newly offered points
            let sub = frame.filtered(|p| {
                grabbed.contains(p.id) || hits.iter().any(|h| h.id == p.id)
            });
            let accepted = self.call(index, AreaEvent::Touch(sub));

            if accepted && !hits.is_empty() {
                for hit in &hits {
                    tracing::trace!(touch_id = hit.id, %id, "Implicit grab");
                    self.grabs.insert(hit.id, id);
                }
                offered.retain(|p| !hits.iter().any(|h| h.id == p.id));
            }
            self.pump();
        }

        if !offered.is_empty() {
            tracing::trace!(points = offered.len(), "Presses not accepted by any area");
        }
    }

    /// Hand one event to an area and collect what it produced
    fn call(&mut self, index: usize, event: AreaEvent) -> bool {
        let area = &mut self.areas[index];
        let id = area.id();
        let accepted = area.process_event(event);

        for request in area.take_grab_requests() {
            match request {
                GrabRequest::Grab(touch_id) => {
                    self.grabs.insert(touch_id, id);
                }
                GrabRequest::UngrabAll => self.grabs.retain(|_, holder| *holder != id),
            }
        }
        self.signals
            .extend(area.take_signals().into_iter().map(|signal| (id, signal)));
        accepted
    }

    /// Deliver every queued registry notification
    fn pump(&mut self) {
        while let Some(Delivery { target, event }) = self.registry.next_delivery() {
            match self.index_of(target) {
                Some(index) => {
                    self.call(index, event);
                }
                None => tracing::warn!(%target, "Delivery for unknown area dropped"),
            }
        }
    }

    fn index_of(&self, id: AreaId) -> Option<usize> {
        self.areas.iter().position(|a| a.id() == id)
    }
}
