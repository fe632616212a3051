use super::interaction::{GestureOutcome, InteractionController, InteractionSettings};
use super::reload::{ReloadController, ReloadOutcome, ReloadStats, SuppressReason};
use crate::config::ViewerConfig;
use crate::domain::chart::{ChartState, PlotRect, ViewState};
use crate::domain::errors::ViewerResult;
use crate::domain::events::{EventDispatcher, InMemoryEventDispatcher, ViewportEvent};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{CandleWindow, RecordSource, StoreIndex};
use crate::infrastructure::RecordStore;
use crate::presentation::{HoverInfo, RenderFrame};
use crate::{log_debug, log_info};
use std::path::Path;

/// Viewport over a memory-mapped store file
pub type StoreViewport = ViewportCoordinator<RecordStore>;

/// Entry point the host event loop drives: store attachment, gestures,
/// the idle tick and per-frame output.
///
/// Gestures only mark the view dirty; the edge check runs at most once per
/// `frame()` and on every `tick()`.
#[derive(Debug)]
pub struct ViewportCoordinator<S = RecordStore> {
    config: ViewerConfig,
    source: Option<S>,
    chart: ChartState,
    reload: ReloadController,
    input: InteractionController,
    events: InMemoryEventDispatcher,
    plot: PlotRect,
    view_dirty: bool,
    redraw_pending: bool,
}

impl ViewportCoordinator<RecordStore> {
    /// Open and attach a store file, returning its record count.
    pub fn attach(&mut self, path: impl AsRef<Path>) -> ViewerResult<u64> {
        let store = RecordStore::open(path)?;
        Ok(self.attach_source(store))
    }
}

impl<S: RecordSource> ViewportCoordinator<S> {
    pub fn new(config: ViewerConfig) -> ViewerResult<Self> {
        config.validate()?;
        log_info!(
            LogComponent::Application("ViewportCoordinator"),
            "creating viewport window_count={} visible_count={}",
            config.window_count,
            config.visible_count
        );

        Ok(Self {
            chart: ChartState::new(config.window_count, config.spacing, config.price_scale),
            input: InteractionController::new(InteractionSettings::from(&config)),
            events: InMemoryEventDispatcher::with_capacity(config.event_queue_capacity),
            config,
            source: None,
            reload: ReloadController::new(),
            plot: PlotRect::default(),
            view_dirty: false,
            redraw_pending: false,
        })
    }

    /// Replace the current source and load its most recent records.
    pub fn attach_source(&mut self, source: S) -> u64 {
        if self.source.is_some() {
            self.detach();
        }

        let count = source.count();
        let start = count.saturating_sub(self.config.window_count as u64);
        let loaded = self.chart.load(&source, start);
        self.source = Some(source);

        log_info!(
            LogComponent::Application("ViewportCoordinator"),
            "attached store count={} start={} loaded={}",
            count,
            start,
            loaded
        );

        self.events.publish(ViewportEvent::StoreAttached { count });
        self.events.publish(ViewportEvent::WindowReloaded { start, loaded });
        self.fit_view();
        self.request_redraw();
        count
    }

    /// Release the source (unmapping a store file) and clear all state.
    pub fn detach(&mut self) -> Option<S> {
        let source = self.source.take()?;
        self.chart.reset();
        self.reload.reset();
        self.input.clear_hover();
        self.input.pointer_released();
        self.view_dirty = false;

        log_info!(LogComponent::Application("ViewportCoordinator"), "store detached");
        self.events.publish(ViewportEvent::StoreDetached);
        self.request_redraw();
        Some(source)
    }

    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn chart(&self) -> &ChartState {
        &self.chart
    }

    pub fn window(&self) -> &CandleWindow {
        &self.chart.window
    }

    pub fn view(&self) -> &ViewState {
        &self.chart.view
    }

    pub fn plot(&self) -> &PlotRect {
        &self.plot
    }

    pub fn reload_stats(&self) -> ReloadStats {
        self.reload.stats()
    }

    pub fn is_view_dirty(&self) -> bool {
        self.view_dirty
    }

    /// Control bounds changed; the plot is carved out of them.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.plot = PlotRect::from_bounds(width, height, &self.config.layout);
        if !self.fit_view() && self.chart.is_view_fitted() {
            self.chart.clamp_center(self.plot.width);
            self.refresh_prices();
        }
        self.view_dirty = true;
        self.request_redraw();
    }

    pub fn pointer_pressed(&mut self, x: f64, y: f64) -> GestureOutcome {
        self.input.pointer_pressed(&self.chart, &self.plot, x, y)
    }

    pub fn pointer_released(&mut self) -> GestureOutcome {
        self.input.pointer_released()
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) -> GestureOutcome {
        let outcome = self.input.pointer_moved(&mut self.chart, &self.plot, x, y);
        self.after_gesture(outcome);
        outcome
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta: f64) -> GestureOutcome {
        let outcome = self.input.wheel(&mut self.chart, &self.plot, x, y, delta);
        self.after_gesture(outcome);
        outcome
    }

    fn after_gesture(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::ViewChanged => {
                self.view_dirty = true;
                self.events.publish(ViewportEvent::ViewChanged);
                self.request_redraw();
            }
            GestureOutcome::HoverChanged(local) => self.publish_hover(local),
            GestureOutcome::Ignored | GestureOutcome::Unchanged => {}
        }
    }

    fn publish_hover(&mut self, local: Option<usize>) {
        let store_index = local.and_then(|i| self.chart.window.store_index(i));

        #[cfg(debug_assertions)]
        if let Some(record) = local.and_then(|i| self.chart.window.record(i)) {
            let mapper = self.chart.mapper();
            log_debug!(
                LogComponent::Application("ViewportCoordinator"),
                "hover i={} date(UTC)={} O={} H={} L={} C={} V={} Sym={}",
                local.unwrap_or_default(),
                crate::time_utils::format_ts_utc(record.timestamp_ns),
                mapper.price(record.open),
                mapper.price(record.high),
                mapper.price(record.low),
                mapper.price(record.close),
                record.volume,
                record.symbol_code
            );
        }

        self.events.publish(ViewportEvent::HoverChanged { store_index });
    }

    /// Periodic idle check so a view resting near an edge still prefetches.
    pub fn tick(&mut self) -> ReloadOutcome {
        self.ensure_window_around_view()
    }

    /// Run the pending edge check, then snapshot what to draw. `None` while
    /// there is nothing loaded or no plot area.
    pub fn frame(&mut self) -> Option<RenderFrame> {
        self.fit_view();
        if self.view_dirty {
            self.view_dirty = false;
            self.ensure_window_around_view();
        }

        if self.chart.window.is_empty() || !self.plot.has_area() {
            return None;
        }

        self.refresh_prices();
        Some(RenderFrame::capture(&self.chart, &self.plot))
    }

    pub fn cursor_prev(&mut self) -> ReloadOutcome {
        let step = self.config.cursor_step();
        let Some(source) = self.source.as_ref() else {
            return ReloadOutcome::Suppressed(SuppressReason::NoData);
        };
        let outcome = self.reload.cursor_prev(&mut self.chart, source, step, self.plot.width);
        self.after_navigation(outcome);
        outcome
    }

    pub fn cursor_next(&mut self) -> ReloadOutcome {
        let step = self.config.cursor_step();
        let Some(source) = self.source.as_ref() else {
            return ReloadOutcome::Suppressed(SuppressReason::NoData);
        };
        let outcome = self.reload.cursor_next(&mut self.chart, source, step, self.plot.width);
        self.after_navigation(outcome);
        outcome
    }

    /// Load the window around the record nearest `timestamp_ns` and centre
    /// the view on it. Returns that record's store index.
    pub fn seek_to_timestamp(&mut self, timestamp_ns: i64) -> Option<u64> {
        let source = self.source.as_ref()?;
        let target = StoreIndex::nearest(source, timestamp_ns)?;

        let capacity = self.chart.window.capacity() as i64;
        let start = ReloadController::clamp_start(target as i64 - capacity / 2, source.count(), capacity);
        let outcome = self.reload.reload_window(&mut self.chart, source, start, self.plot.width);

        if let Some(time) = self
            .chart
            .window
            .local_for_store_index(target)
            .and_then(|local| self.chart.window.time_sec(local))
        {
            self.chart.view.center_time_sec = time;
            if self.plot.width > 0.0 {
                self.chart.clamp_center(self.plot.width);
            }
        }

        log_debug!(
            LogComponent::Application("ViewportCoordinator"),
            "seek ts={} -> index={} ({:?})",
            timestamp_ns,
            target,
            outcome
        );
        self.after_navigation(outcome);
        Some(target)
    }

    /// Record currently under the pointer.
    pub fn hover_info(&self) -> Option<HoverInfo> {
        HoverInfo::from_chart(&self.chart, self.input.hovered()?)
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&ViewportEvent) + 'static,
    {
        self.events.subscribe(handler);
    }

    /// Events published since the last drain.
    pub fn events(&self) -> &[ViewportEvent] {
        self.events.pending()
    }

    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        self.events.drain()
    }

    /// Undrained events discarded because the queue was full.
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }

    /// Whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    fn ensure_window_around_view(&mut self) -> ReloadOutcome {
        let Some(source) = self.source.as_ref() else {
            return ReloadOutcome::Suppressed(SuppressReason::NoData);
        };
        let outcome = self.reload.ensure_window_around_view(&mut self.chart, source, self.plot.width);
        if outcome.is_reloaded() {
            self.on_window_reloaded(outcome);
        }
        outcome
    }

    fn after_navigation(&mut self, outcome: ReloadOutcome) {
        if outcome.is_reloaded() {
            self.on_window_reloaded(outcome);
        } else {
            self.request_redraw();
        }
        self.refresh_prices();
    }

    fn on_window_reloaded(&mut self, outcome: ReloadOutcome) {
        if let ReloadOutcome::Reloaded { start, loaded } = outcome {
            self.events.publish(ViewportEvent::WindowReloaded { start, loaded });
        }
        // Local indices now point at different records.
        if self.input.hovered().is_some() {
            self.input.clear_hover();
            self.events.publish(ViewportEvent::HoverChanged { store_index: None });
        }
        self.request_redraw();
    }

    fn fit_view(&mut self) -> bool {
        let fitted = self.chart.fit_view_if_needed(&self.plot, self.config.visible_count);
        if fitted {
            self.events.publish(ViewportEvent::ViewChanged);
        }
        fitted
    }

    fn refresh_prices(&mut self) {
        if self.plot.height > 0.0 && self.chart.view.price_per_pixel > 0.0 {
            self.chart.view.refresh_visible_prices(self.plot.height);
        }
    }

    fn request_redraw(&mut self) {
        if !self.redraw_pending {
            self.redraw_pending = true;
            self.events.publish(ViewportEvent::RedrawRequested);
        }
    }
}
