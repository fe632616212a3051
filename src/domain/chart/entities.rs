use super::services::CoordinateMapper;
use super::value_objects::{PlotRect, SpacingLimits, ViewState};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{CandleWindow, RecordSource};
use crate::log_info;

/// Domain aggregate - the loaded window together with the view over it
#[derive(Debug, Clone)]
pub struct ChartState {
    pub window: CandleWindow,
    pub view: ViewState,
    mapper: CoordinateMapper,
    view_fitted: bool,
}

impl ChartState {
    pub fn new(window_count: usize, limits: SpacingLimits, price_scale: f64) -> Self {
        Self {
            window: CandleWindow::new(window_count),
            view: ViewState::default(),
            mapper: CoordinateMapper::new(limits, price_scale),
            view_fitted: false,
        }
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn is_view_fitted(&self) -> bool {
        self.view_fitted
    }

    /// Refill the window without touching the view.
    pub fn load<S: RecordSource + ?Sized>(&mut self, source: &S, start_index: u64) -> usize {
        self.window.load_window(source, start_index)
    }

    /// Drop loaded data and forget the fitted view; the next non-empty
    /// window is auto-fitted again.
    pub fn reset(&mut self) {
        self.window = CandleWindow::new(self.window.capacity());
        self.view = ViewState::default();
        self.view_fitted = false;
    }

    /// Auto-fit both axes the first time data and a plot area are available.
    pub fn fit_view_if_needed(&mut self, plot: &PlotRect, visible_count: usize) -> bool {
        if self.view_fitted || self.window.is_empty() || !plot.has_area() {
            return false;
        }

        self.mapper.fit_time_axis(&mut self.view, &self.window, plot, visible_count);
        self.mapper.fit_price_axis(&mut self.view, &self.window, plot);
        self.view_fitted = true;

        log_info!(
            LogComponent::Domain("ChartState"),
            "view fitted: center={:.3} spp={:.6} center_price={:.3} ppp={:.6}",
            self.view.center_time_sec,
            self.view.seconds_per_pixel,
            self.view.center_price,
            self.view.price_per_pixel
        );
        true
    }

    pub fn interval_seconds(&self) -> f64 {
        CoordinateMapper::estimate_interval_seconds(&self.window)
    }

    pub fn clamp_center(&mut self, plot_width: f64) {
        self.mapper.clamp_center_time(&mut self.view, &self.window, plot_width);
    }

    pub fn clamp_zoom(&mut self) {
        let dt = self.interval_seconds();
        self.mapper.clamp_zoom_to_spacing(&mut self.view, dt);
    }

    pub fn pitch(&self) -> f64 {
        self.mapper.pitch(&self.view, self.interval_seconds())
    }

    pub fn body_width(&self) -> f64 {
        self.mapper.compute_body_width(&self.view, self.interval_seconds())
    }

    /// Local index of the loaded record nearest the view centre.
    pub fn center_local_index(&self) -> Option<usize> {
        self.window.find_closest(self.view.center_time_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{Record, SymbolCode};

    fn data(n: i64) -> Vec<Record> {
        (0..n)
            .map(|i| Record {
                timestamp_ns: (1_700_000_000 + i * 60) * 1_000_000_000,
                open: 100 + i,
                high: 110 + i,
                low: 90 + i,
                close: 105 + i,
                volume: 10,
                symbol_code: SymbolCode::from(1),
            })
            .collect()
    }

    #[test]
    fn fit_happens_once() {
        let source = data(50);
        let plot = PlotRect::new(80.0, 10.0, 600.0, 400.0);
        let mut chart = ChartState::new(40, SpacingLimits::default(), 1.0);

        assert!(!chart.fit_view_if_needed(&plot, 20));
        chart.load(&source, 10);
        assert!(chart.fit_view_if_needed(&plot, 20));
        let fitted = chart.view;
        chart.view.center_time_sec -= 100.0;
        assert!(!chart.fit_view_if_needed(&plot, 20));
        assert_ne!(chart.view, fitted);
    }

    #[test]
    fn fit_needs_plot_area() {
        let source = data(5);
        let mut chart = ChartState::new(5, SpacingLimits::default(), 1.0);
        chart.load(&source, 0);
        assert!(!chart.fit_view_if_needed(&PlotRect::default(), 20));
        assert!(!chart.is_view_fitted());
    }

    #[test]
    fn reset_keeps_capacity() {
        let source = data(5);
        let mut chart = ChartState::new(3, SpacingLimits::default(), 1.0);
        chart.load(&source, 0);
        chart.fit_view_if_needed(&PlotRect::new(0.0, 0.0, 100.0, 100.0), 3);
        chart.reset();
        assert!(chart.window.is_empty());
        assert_eq!(chart.window.capacity(), 3);
        assert!(!chart.is_view_fitted());
    }
}
