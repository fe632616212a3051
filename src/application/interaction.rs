use crate::config::ViewerConfig;
use crate::domain::chart::services::clamp;
use crate::domain::chart::{
    ChartState, MAX_PRICE_PER_PIXEL, MAX_SECONDS_PER_PIXEL, MIN_PRICE_PER_PIXEL, MIN_SECONDS_PER_PIXEL, PlotRect,
};
use crate::domain::logging::LogComponent;
use crate::log_trace;

/// Active pointer drag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    Panning,
    /// Vertical zoom from the price gutter. `anchor_t` is the normalised
    /// height of the press point, `anchor_price` the price under it.
    ZoomingPrice { anchor_t: f64, anchor_price: f64 },
}

/// What a gesture did to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Ignored,
    Unchanged,
    ViewChanged,
    HoverChanged(Option<usize>),
}

/// Gesture tuning taken from `ViewerConfig`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub wheel_zoom_step: f64,
    pub y_zoom_sensitivity: f64,
    pub hover_tolerance_px: f64,
}

impl From<&ViewerConfig> for InteractionSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            wheel_zoom_step: config.wheel_zoom_step,
            y_zoom_sensitivity: config.y_zoom_sensitivity,
            hover_tolerance_px: config.hover_tolerance_px,
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

/// Turns pointer and wheel input into pan/zoom changes and hover hits.
#[derive(Debug, Default)]
pub struct InteractionController {
    settings: InteractionSettings,
    drag: DragMode,
    last_point: (f64, f64),
    hovered: Option<usize>,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings) -> Self {
        Self { settings, ..Default::default() }
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Start a drag: vertical zoom inside the price gutter, pan elsewhere.
    pub fn pointer_pressed(&mut self, chart: &ChartState, plot: &PlotRect, x: f64, y: f64) -> GestureOutcome {
        self.last_point = (x, y);

        if plot.in_price_gutter(x, y) && plot.height > 0.0 {
            let anchor_t = (plot.bottom() - y) / plot.height;
            let anchor_price = chart.mapper().screen_y_to_price(&chart.view, plot, y);
            self.drag = DragMode::ZoomingPrice { anchor_t, anchor_price };
        } else {
            self.drag = DragMode::Panning;
        }

        log_trace!(LogComponent::Application("Interaction"), "pressed at ({x:.1}, {y:.1}) -> {:?}", self.drag);
        GestureOutcome::Unchanged
    }

    pub fn pointer_released(&mut self) -> GestureOutcome {
        self.drag = DragMode::Idle;
        GestureOutcome::Unchanged
    }

    /// Pan or zoom while dragging; hit-test for hover otherwise.
    pub fn pointer_moved(&mut self, chart: &mut ChartState, plot: &PlotRect, x: f64, y: f64) -> GestureOutcome {
        if chart.window.is_empty() {
            return GestureOutcome::Ignored;
        }

        if self.drag == DragMode::Idle {
            let hit = self.hit_test(chart, plot, x, y);
            if hit == self.hovered {
                return GestureOutcome::Unchanged;
            }
            self.hovered = hit;
            return GestureOutcome::HoverChanged(hit);
        }

        let dx = x - self.last_point.0;
        let dy = y - self.last_point.1;
        self.last_point = (x, y);

        match self.drag {
            DragMode::ZoomingPrice { anchor_t, anchor_price } => {
                let factor = (dy * self.settings.y_zoom_sensitivity).exp();
                let view = &mut chart.view;
                view.price_per_pixel = clamp(view.price_per_pixel * factor, MIN_PRICE_PER_PIXEL, MAX_PRICE_PER_PIXEL);
                let span = plot.height * view.price_per_pixel;
                view.center_price = anchor_price - (anchor_t - 0.5) * span;
                view.refresh_visible_prices(plot.height);
            }
            DragMode::Panning => {
                let view = &mut chart.view;
                view.center_time_sec -= dx * view.seconds_per_pixel;
                view.center_price += dy * view.price_per_pixel;
                view.refresh_visible_prices(plot.height);
            }
            DragMode::Idle => return GestureOutcome::Unchanged,
        }

        GestureOutcome::ViewChanged
    }

    /// Horizontal zoom by one notch, keeping the time under the anchor fixed.
    ///
    /// The anchor is the pointer when it is inside the plot, else the plot
    /// centre. Positive deltas zoom in.
    pub fn wheel(&mut self, chart: &mut ChartState, plot: &PlotRect, x: f64, y: f64, delta: f64) -> GestureOutcome {
        if chart.window.is_empty() || !plot.has_area() || delta == 0.0 || !delta.is_finite() {
            return GestureOutcome::Ignored;
        }

        let anchor_x = if plot.contains(x, y) { x } else { plot.center_x() };
        let mapper = *chart.mapper();
        let t0 = mapper.screen_x_to_time(&chart.view, plot, anchor_x);

        let factor = if delta > 0.0 { self.settings.wheel_zoom_step } else { 1.0 / self.settings.wheel_zoom_step };
        chart.view.seconds_per_pixel =
            clamp(chart.view.seconds_per_pixel / factor, MIN_SECONDS_PER_PIXEL, MAX_SECONDS_PER_PIXEL);
        chart.clamp_zoom();

        let t1 = mapper.screen_x_to_time(&chart.view, plot, anchor_x);
        chart.view.center_time_sec += t0 - t1;

        GestureOutcome::ViewChanged
    }

    /// Local index of the record whose body is under `(x, y)`, within half
    /// the body width plus the hover tolerance.
    pub fn hit_test(&self, chart: &ChartState, plot: &PlotRect, x: f64, y: f64) -> Option<usize> {
        if chart.window.is_empty() || !plot.contains(x, y) {
            return None;
        }

        let mapper = chart.mapper();
        let time = mapper.screen_x_to_time(&chart.view, plot, x);
        let local = chart.window.find_closest(time)?;
        let center_x = mapper.time_to_screen_x(&chart.view, plot, chart.window.time_sec(local)?);
        let half_body = chart.body_width() * 0.5;

        ((x - center_x).abs() <= half_body + self.settings.hover_tolerance_px).then_some(local)
    }
}
