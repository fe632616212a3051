use crate::domain::chart::ChartState;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::RecordSource;
use crate::log_debug;
use serde::Serialize;

const MIN_PREFETCH_MARGIN: usize = 10;
const MAX_PREFETCH_MARGIN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReloadState {
    #[default]
    Idle,
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// A reload was requested while one was already running
    Reentrant,
    /// No store attached or nothing loaded
    NoData,
    SameAsCurrent,
    DuplicateRequest,
    /// View centre is away from both window edges
    NotNearEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReloadOutcome {
    Reloaded { start: u64, loaded: usize },
    Suppressed(SuppressReason),
}

impl ReloadOutcome {
    pub fn is_reloaded(&self) -> bool {
        matches!(self, ReloadOutcome::Reloaded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReloadStats {
    pub reloads: u64,
    pub suppressed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// Slides the window over the store as the view moves, without ever
/// changing pan or zoom itself.
#[derive(Debug, Default)]
pub struct ReloadController {
    state: ReloadState,
    last_requested_start: Option<u64>,
    stats: ReloadStats,
}

impl ReloadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    pub fn stats(&self) -> ReloadStats {
        self.stats
    }

    pub fn last_requested_start(&self) -> Option<u64> {
        self.last_requested_start
    }

    /// Forget the duplicate-suppression token, e.g. when a new store is
    /// attached.
    pub fn reset(&mut self) {
        self.state = ReloadState::Idle;
        self.last_requested_start = None;
    }

    /// Distance in records from either window edge that triggers a reload.
    pub fn prefetch_margin(loaded: usize) -> usize {
        (loaded / 4).clamp(MIN_PREFETCH_MARGIN, MAX_PREFETCH_MARGIN)
    }

    fn suppress(&mut self, reason: SuppressReason) -> ReloadOutcome {
        self.stats.suppressed += 1;
        ReloadOutcome::Suppressed(reason)
    }

    /// Refill the window from `new_start`, keeping the view as it was and
    /// then clamping its centre to the new window.
    pub fn reload_window<S: RecordSource + ?Sized>(
        &mut self,
        chart: &mut ChartState,
        source: &S,
        new_start: i64,
        plot_width: f64,
    ) -> ReloadOutcome {
        if self.state == ReloadState::Reloading {
            return self.suppress(SuppressReason::Reentrant);
        }
        let count = source.count();
        if count == 0 {
            return self.suppress(SuppressReason::NoData);
        }

        let new_start = u64::try_from(new_start.max(0)).unwrap_or(0).min(count - 1);
        if new_start == chart.window.start() {
            return self.suppress(SuppressReason::SameAsCurrent);
        }
        if self.last_requested_start == Some(new_start) {
            return self.suppress(SuppressReason::DuplicateRequest);
        }
        self.last_requested_start = Some(new_start);

        self.state = ReloadState::Reloading;
        let kept = chart.view.snapshot();

        let loaded = chart.load(source, new_start);

        chart.view.restore(kept);
        if plot_width > 0.0 {
            chart.clamp_center(plot_width);
        }
        self.state = ReloadState::Idle;
        self.stats.reloads += 1;

        log_debug!(
            LogComponent::Application("ReloadController"),
            "reloaded start={} loaded={} center={:.3}",
            new_start,
            loaded,
            chart.view.center_time_sec
        );

        ReloadOutcome::Reloaded { start: new_start, loaded }
    }

    /// Edge check: reload around the view centre once it comes within the
    /// prefetch margin of either end of the loaded window.
    pub fn ensure_window_around_view<S: RecordSource + ?Sized>(
        &mut self,
        chart: &mut ChartState,
        source: &S,
        plot_width: f64,
    ) -> ReloadOutcome {
        if self.state == ReloadState::Reloading {
            return self.suppress(SuppressReason::Reentrant);
        }
        if chart.window.is_empty() {
            return self.suppress(SuppressReason::NoData);
        }

        chart.clamp_center(plot_width);

        let Some(center_local) = chart.center_local_index() else {
            return self.suppress(SuppressReason::NoData);
        };
        let loaded = chart.window.loaded();
        let margin = Self::prefetch_margin(loaded);

        if center_local >= margin && center_local + margin < loaded {
            return ReloadOutcome::Suppressed(SuppressReason::NotNearEdge);
        }

        let Some(center_global) = chart.window.store_index(center_local) else {
            return self.suppress(SuppressReason::NoData);
        };
        let half = (chart.window.capacity() / 2) as i64;
        self.reload_window(chart, source, center_global as i64 - half, plot_width)
    }

    /// Move the window by `step` records and centre the view on the record
    /// that lands in the middle of it.
    pub fn page<S: RecordSource + ?Sized>(
        &mut self,
        chart: &mut ChartState,
        source: &S,
        direction: PageDirection,
        step: u64,
        plot_width: f64,
    ) -> ReloadOutcome {
        if self.state == ReloadState::Reloading {
            return self.suppress(SuppressReason::Reentrant);
        }
        if chart.window.is_empty() {
            return self.suppress(SuppressReason::NoData);
        }

        let center_local = chart.center_local_index().unwrap_or(chart.window.loaded() / 2);
        let Some(center_global) = chart.window.store_index(center_local) else {
            return self.suppress(SuppressReason::NoData);
        };

        let step = i64::try_from(step).unwrap_or(i64::MAX);
        let target = match direction {
            PageDirection::Previous => (center_global as i64).saturating_sub(step),
            PageDirection::Next => (center_global as i64).saturating_add(step),
        };
        let capacity = chart.window.capacity() as i64;
        let new_start = Self::clamp_start(target - capacity / 2, source.count(), capacity);

        let outcome = self.reload_window(chart, source, new_start, plot_width);

        let target = u64::try_from(target.max(0)).unwrap_or(0);
        if let Some(time) = chart.window.local_for_store_index(target).and_then(|local| chart.window.time_sec(local)) {
            chart.view.center_time_sec = time;
            if plot_width > 0.0 {
                chart.clamp_center(plot_width);
            }
        }

        log_debug!(
            LogComponent::Application("ReloadController"),
            "page {:?} target={} outcome={:?}",
            direction,
            target,
            outcome
        );
        outcome
    }

    pub fn cursor_prev<S: RecordSource + ?Sized>(
        &mut self,
        chart: &mut ChartState,
        source: &S,
        step: u64,
        plot_width: f64,
    ) -> ReloadOutcome {
        self.page(chart, source, PageDirection::Previous, step, plot_width)
    }

    pub fn cursor_next<S: RecordSource + ?Sized>(
        &mut self,
        chart: &mut ChartState,
        source: &S,
        step: u64,
        plot_width: f64,
    ) -> ReloadOutcome {
        self.page(chart, source, PageDirection::Next, step, plot_width)
    }

    /// Keep a page start inside `[0, max(0, count - capacity)]`.
    pub fn clamp_start(start: i64, count: u64, capacity: i64) -> i64 {
        let max_start = (i64::try_from(count).unwrap_or(i64::MAX) - capacity).max(0);
        start.clamp(0, max_start)
    }
}
