use crate::domain::chart::{LayoutConfig, SpacingLimits};
use crate::domain::errors::{ViewerError, ViewerResult};
use crate::domain::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Viewer settings. Every field has a default, so a partial JSON document
/// is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Capacity of the in-memory window, in records
    pub window_count: usize,
    /// Records across the plot when the view is first fitted
    pub visible_count: usize,
    pub spacing: SpacingLimits,
    /// Multiplicative horizontal zoom per wheel notch
    pub wheel_zoom_step: f64,
    pub y_zoom_sensitivity: f64,
    pub hover_tolerance_px: f64,
    /// Stored integer prices are divided by this for display
    pub price_scale: f64,
    pub layout: LayoutConfig,
    /// Minimum level for `init_console_logging`
    pub log_level: LogLevel,
    /// Undrained events kept before the oldest are shed
    pub event_queue_capacity: usize,
}

/// Largest accepted window, in records.
pub const MAX_WINDOW_COUNT: usize = 1 << 20;

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_count: 240,
            visible_count: 60,
            spacing: SpacingLimits::default(),
            wheel_zoom_step: 1.10,
            y_zoom_sensitivity: 0.01,
            hover_tolerance_px: 2.0,
            price_scale: 1.0,
            layout: LayoutConfig::default(),
            log_level: LogLevel::Info,
            event_queue_capacity: 1024,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> ViewerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ViewerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ViewerResult<()> {
        let fail = |msg: &str| Err(ViewerError::Config(msg.to_string()));
        let s = &self.spacing;

        if self.window_count == 0 {
            return fail("window_count must be positive");
        }
        if self.window_count > MAX_WINDOW_COUNT {
            return fail("window_count exceeds the maximum window size");
        }
        if self.event_queue_capacity == 0 {
            return fail("event_queue_capacity must be positive");
        }
        let finite = [
            s.body_min,
            s.body_max,
            s.gap_min,
            s.gap_max,
            self.wheel_zoom_step,
            self.y_zoom_sensitivity,
            self.hover_tolerance_px,
            self.price_scale,
            self.layout.left_axis_width,
            self.layout.bottom_axis_height,
            self.layout.padding,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return fail("numeric settings must be finite");
        }
        if self.visible_count == 0 {
            return fail("visible_count must be positive");
        }
        if !(s.body_min > 0.0 && s.body_max > 0.0 && s.gap_min > 0.0 && s.gap_max > 0.0) {
            return fail("spacing limits must be positive");
        }
        if s.body_min > s.body_max {
            return fail("body_min exceeds body_max");
        }
        if s.gap_min > s.gap_max {
            return fail("gap_min exceeds gap_max");
        }
        if !(self.wheel_zoom_step > 1.0) {
            return fail("wheel_zoom_step must be greater than 1");
        }
        if !(self.y_zoom_sensitivity > 0.0) {
            return fail("y_zoom_sensitivity must be positive");
        }
        if !(self.hover_tolerance_px >= 0.0) {
            return fail("hover_tolerance_px must not be negative");
        }
        if !(self.price_scale > 0.0) {
            return fail("price_scale must be positive");
        }
        let l = &self.layout;
        if !(l.left_axis_width >= 0.0 && l.bottom_axis_height >= 0.0 && l.padding >= 0.0) {
            return fail("layout sizes must not be negative");
        }
        Ok(())
    }

    /// Records per cursor page.
    pub fn cursor_step(&self) -> u64 {
        (self.window_count / 2).max(1) as u64
    }
}
