//! Gesture configuration.
//!
//! Two groups of settings feed the gesture core:
//!
//! - [`DragSettings`]: the platform-wide interaction hints (how far or how
//!   fast a finger must travel before a press becomes a drag)
//! - [`AreaConfig`]: per-area recognition parameters (touch count bounds and
//!   the recognition period)
//!
//! Both load from JSON, and the common values can be overridden through the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SHELL_GESTURES_DRAG_DISTANCE` | `drag.start_drag_distance` |
//! | `SHELL_GESTURES_DRAG_VELOCITY` | `drag.start_drag_velocity` |
//! | `SHELL_GESTURES_RECOGNITION_PERIOD_MS` | `area.recognition_period_ms` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GestureResult};

pub const ENV_DRAG_DISTANCE: &str = "SHELL_GESTURES_DRAG_DISTANCE";
pub const ENV_DRAG_VELOCITY: &str = "SHELL_GESTURES_DRAG_VELOCITY";
pub const ENV_RECOGNITION_PERIOD_MS: &str = "SHELL_GESTURES_RECOGNITION_PERIOD_MS";

/// Default drag start distance in scene units
pub const DEFAULT_DRAG_DISTANCE: f64 = 10.0;

/// Default recognition period in milliseconds
pub const DEFAULT_RECOGNITION_PERIOD_MS: u64 = 50;

/// Platform interaction hints used for drag detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Displacement along either axis after which a point is dragging
    pub start_drag_distance: f64,
    /// Velocity along either axis after which a point is dragging.
    /// Zero disables velocity-based detection.
    pub start_drag_velocity: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            start_drag_distance: DEFAULT_DRAG_DISTANCE,
            start_drag_velocity: 0.0,
        }
    }
}

impl DragSettings {
    pub fn new(start_drag_distance: f64, start_drag_velocity: f64) -> Self {
        Self {
            start_drag_distance,
            start_drag_velocity,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.start_drag_distance.is_finite() || self.start_drag_distance < 0.0 {
            return Err(ConfigError::invalid(
                "start_drag_distance",
                format!("must be a non-negative number, got {}", self.start_drag_distance),
            ));
        }
        if !self.start_drag_velocity.is_finite() || self.start_drag_velocity < 0.0 {
            return Err(ConfigError::invalid(
                "start_drag_velocity",
                format!("must be a non-negative number, got {}", self.start_drag_velocity),
            ));
        }
        Ok(())
    }
}

/// Recognition parameters of one gesture area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub minimum_touch_points: usize,
    /// `None` means unbounded
    pub maximum_touch_points: Option<usize>,
    pub recognition_period_ms: u64,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            minimum_touch_points: 1,
            maximum_touch_points: None,
            recognition_period_ms: DEFAULT_RECOGNITION_PERIOD_MS,
        }
    }
}

impl AreaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minimum_touch_points(mut self, value: usize) -> Self {
        self.minimum_touch_points = value;
        self
    }

    pub fn with_maximum_touch_points(mut self, value: usize) -> Self {
        self.maximum_touch_points = Some(value);
        self
    }

    pub fn with_recognition_period(mut self, period: Duration) -> Self {
        self.recognition_period_ms = period.as_millis() as u64;
        self
    }

    pub fn recognition_period(&self) -> Duration {
        Duration::from_millis(self.recognition_period_ms)
    }

    /// Upper touch bound with "unbounded" mapped to `usize::MAX`
    pub fn maximum(&self) -> usize {
        self.maximum_touch_points.unwrap_or(usize::MAX)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_touch_points == 0 {
            return Err(ConfigError::invalid(
                "minimum_touch_points",
                "must be at least 1",
            ));
        }
        if let Some(max) = self.maximum_touch_points {
            if max < self.minimum_touch_points {
                return Err(ConfigError::invalid(
                    "maximum_touch_points",
                    format!(
                        "{} is below minimum_touch_points ({})",
                        max, self.minimum_touch_points
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Complete gesture configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub drag: DragSettings,
    pub area: AreaConfig,
}

impl GestureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drag(mut self, drag: DragSettings) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_area(mut self, area: AreaConfig) -> Self {
        self.area = area;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drag.validate()?;
        self.area.validate()
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> GestureResult<Self> {
        let config: GestureConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON file
    pub fn load_from_path(path: &Path) -> GestureResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!("Loaded gesture config from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/shell-gestures/gestures.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shell-gestures").join("gestures.json"))
    }

    /// Load the default file if present, then apply environment overrides
    pub fn load() -> GestureResult<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SHELL_GESTURES_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(distance) = env_value::<f64>(ENV_DRAG_DISTANCE)? {
            self.drag.start_drag_distance = distance;
        }
        if let Some(velocity) = env_value::<f64>(ENV_DRAG_VELOCITY)? {
            self.drag.start_drag_velocity = velocity;
        }
        if let Some(period) = env_value::<u64>(ENV_RECOGNITION_PERIOD_MS)? {
            self.area.recognition_period_ms = period;
        }
        Ok(())
    }
}

fn env_value<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
        Err(_) => Ok(None),
    }
}
