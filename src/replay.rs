//! Deterministic replay of recorded touch traces.
//!
//! A trace declares a stack of gesture areas (first declared is at the
//! bottom) and a list of steps. Steps run against a [`GestureDispatcher`]
//! driven by a [`ManualClock`], so recognition timers fire exactly when a
//! `wait_ms` step moves time past their deadline.
//!
//! ```json
//! {
//!   "policy": "first_requester",
//!   "areas": [{ "name": "pinch", "minimum_touch_points": 2 }],
//!   "steps": [
//!     { "frame": [{ "id": 1, "state": "pressed", "position": { "x": 5.0, "y": 5.0 } }] },
//!     { "wait_ms": 60 }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::area::{GestureSignal, TouchGestureArea};
use crate::config::GestureConfig;
use crate::dispatch::GestureDispatcher;
use crate::error::{GestureResult, ReplayError};
use crate::registry::{AreaId, OwnershipPolicy, TouchRegistry};
use crate::timer::ManualClock;
use crate::touch::{Rect, TouchFrame};

/// Declaration of one area in a trace. Unset fields fall back to the
/// loaded [`GestureConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDecl {
    pub name: String,
    #[serde(default)]
    pub bounds: Option<Rect>,
    #[serde(default)]
    pub minimum_touch_points: Option<usize>,
    #[serde(default)]
    pub maximum_touch_points: Option<usize>,
    #[serde(default)]
    pub recognition_period_ms: Option<u64>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// One step of a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStep {
    /// Deliver a frame of raw touch points
    Frame(TouchFrame),
    /// Advance the clock and fire expired recognition timers
    WaitMs(u64),
    /// Remove an area from the stack
    Remove(String),
    SetEnabled { area: String, enabled: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub policy: OwnershipPolicy,
    pub areas: Vec<AreaDecl>,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn from_json_str(json: &str) -> GestureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> GestureResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let trace = Self::from_json_str(&contents)?;
        tracing::debug!(
            areas = trace.areas.len(),
            steps = trace.steps.len(),
            "Loaded trace from {}",
            path.display()
        );
        Ok(trace)
    }
}

/// One emitted signal in replay output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayRecord {
    /// Index of the step that produced the signal
    pub step: usize,
    pub area: String,
    pub signal: GestureSignal,
}

/// Run `trace` to completion and collect every emitted signal
pub fn run_trace(trace: &Trace, config: &GestureConfig) -> GestureResult<Vec<ReplayRecord>> {
    if trace.areas.is_empty() {
        return Err(ReplayError::NoAreas.into());
    }

    let clock = ManualClock::new();
    let registry = TouchRegistry::with_policy(trace.policy);
    let mut dispatcher =
        GestureDispatcher::new(registry, Rc::new(clock.clone())).with_config(*config);

    let mut names: HashMap<AreaId, String> = HashMap::new();
    let mut ids: HashMap<String, AreaId> = HashMap::new();
    for decl in &trace.areas {
        if ids.contains_key(&decl.name) {
            return Err(ReplayError::DuplicateArea(decl.name.clone()).into());
        }
        let area = build_area(decl, &dispatcher, config)?;
        let id = dispatcher.add_area(area);
        names.insert(id, decl.name.clone());
        ids.insert(decl.name.clone(), id);
    }

    let mut records = Vec::new();
    for (step, action) in trace.steps.iter().enumerate() {
        match action {
            TraceStep::Frame(frame) => dispatcher.dispatch_frame(frame.clone()),
            TraceStep::WaitMs(ms) => {
                clock.advance(Duration::from_millis(*ms));
                dispatcher.process_timers();
            }
            TraceStep::Remove(name) => {
                let id = lookup(&ids, name)?;
                dispatcher.remove_area(id);
            }
            TraceStep::SetEnabled { area, enabled } => {
                let id = lookup(&ids, area)?;
                if let Some(area) = dispatcher.area_mut(id) {
                    area.set_enabled(*enabled);
                }
            }
        }

        records.extend(dispatcher.drain_signals().into_iter().map(|(id, signal)| {
            ReplayRecord {
                step,
                area: names.get(&id).cloned().unwrap_or_else(|| id.to_string()),
                signal,
            }
        }));
    }

    tracing::debug!(steps = trace.steps.len(), signals = records.len(), "Trace replayed");
    Ok(records)
}

fn build_area(
    decl: &AreaDecl,
    dispatcher: &GestureDispatcher,
    config: &GestureConfig,
) -> GestureResult<TouchGestureArea> {
    let mut area_config = config.area;
    if let Some(min) = decl.minimum_touch_points {
        area_config.minimum_touch_points = min;
    }
    if let Some(max) = decl.maximum_touch_points {
        area_config.maximum_touch_points = Some(max);
    }
    if let Some(period) = decl.recognition_period_ms {
        area_config.recognition_period_ms = period;
    }
    area_config.validate()?;

    let mut area = TouchGestureArea::new(decl.name.as_str(), dispatcher.registry(), dispatcher.clock())
        .with_drag_settings(config.drag)
        .with_area_config(area_config);
    if let Some(bounds) = decl.bounds {
        area = area.with_bounds(bounds);
    }
    area.set_enabled(decl.enabled);
    Ok(area)
}

fn lookup(ids: &HashMap<String, AreaId>, name: &str) -> Result<AreaId, ReplayError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| ReplayError::UnknownArea(name.to_string()))
}
