use super::value_objects::{PlotRect, SpacingLimits, ViewState};
use crate::domain::market_data::CandleWindow;

/// Nominal spacing assumed until two distinct timestamps are loaded.
pub const FALLBACK_INTERVAL_SECONDS: f64 = 60.0;
pub const MIN_SECONDS_PER_PIXEL: f64 = 1e-6;
pub const MAX_SECONDS_PER_PIXEL: f64 = 1e6;
pub const MIN_PRICE_PER_PIXEL: f64 = 1e-9;
pub const MAX_PRICE_PER_PIXEL: f64 = 1e9;

const BODY_FRACTION: f64 = 0.70;
const PRICE_FIT_PADDING: f64 = 1.20;

/// Lower bound wins when the bounds cross, unlike `f64::clamp` which panics.
#[inline]
pub(crate) fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// Domain service mapping between screen pixels and world (time, price)
/// coordinates for a given `ViewState`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    limits: SpacingLimits,
    price_scale: f64,
}

impl CoordinateMapper {
    pub fn new(limits: SpacingLimits, price_scale: f64) -> Self {
        Self { limits, price_scale }
    }

    pub fn limits(&self) -> &SpacingLimits {
        &self.limits
    }

    /// Stored fixed-point price in world units.
    pub fn price(&self, raw: i64) -> f64 {
        raw as f64 / self.price_scale
    }

    pub fn screen_x_to_time(&self, view: &ViewState, plot: &PlotRect, x: f64) -> f64 {
        view.center_time_sec + (x - plot.center_x()) * view.seconds_per_pixel
    }

    pub fn time_to_screen_x(&self, view: &ViewState, plot: &PlotRect, time_sec: f64) -> f64 {
        plot.center_x() + (time_sec - view.center_time_sec) / view.seconds_per_pixel
    }

    pub fn price_to_screen_y(&self, view: &ViewState, plot: &PlotRect, price: f64) -> f64 {
        let t = (price - view.visible_min_price) / (view.visible_max_price - view.visible_min_price);
        plot.bottom() - t * plot.height
    }

    pub fn screen_y_to_price(&self, view: &ViewState, plot: &PlotRect, y: f64) -> f64 {
        let span = (view.visible_max_price - view.visible_min_price).max(1e-12);
        let t = (plot.bottom() - y) / plot.height;
        view.visible_min_price + t * span
    }

    /// Keep the centre inside the loaded data so that no half of the plot
    /// shows time beyond the window. Collapses to the window midpoint when
    /// the window is narrower than the visible span.
    pub fn clamp_center_time(&self, view: &mut ViewState, window: &CandleWindow, plot_width: f64) {
        let (Some(first), Some(last)) = (window.first_time_sec(), window.last_time_sec()) else {
            return;
        };

        let half_span = (plot_width * 0.5) * view.seconds_per_pixel;
        let min_center = first + half_span;
        let max_center = last - half_span;

        if max_center < min_center {
            view.center_time_sec = 0.5 * (first + last);
            return;
        }

        view.center_time_sec = clamp(view.center_time_sec, min_center, max_center);
    }

    /// Delta between the first record and the first later record with a
    /// different timestamp.
    pub fn estimate_interval_seconds(window: &CandleWindow) -> f64 {
        let ts = window.timestamps();
        let Some(&t0) = ts.first() else {
            return FALLBACK_INTERVAL_SECONDS;
        };

        ts.iter()
            .skip(1)
            .find(|&&t| t != t0)
            .map(|&t| (t as f64 - t0 as f64).abs() / 1_000_000_000.0)
            .map(|dt| dt.max(1e-6))
            .unwrap_or(FALLBACK_INTERVAL_SECONDS)
    }

    /// Pixel distance between adjacent record centres.
    pub fn pitch(&self, view: &ViewState, interval_sec: f64) -> f64 {
        interval_sec / view.seconds_per_pixel
    }

    /// Bound horizontal zoom so the pitch stays within
    /// `[body_min + gap_min, body_max + gap_max]`.
    pub fn clamp_zoom_to_spacing(&self, view: &mut ViewState, interval_sec: f64) {
        let min_spp = interval_sec / self.limits.max_pitch();
        let max_spp = interval_sec / self.limits.min_pitch();
        view.seconds_per_pixel = clamp(view.seconds_per_pixel, min_spp, max_spp);
    }

    /// On-screen body width: 70% of the pitch, never closer than `gap_min`
    /// to the neighbouring body.
    pub fn compute_body_width(&self, view: &ViewState, interval_sec: f64) -> f64 {
        let limits = &self.limits;
        let pitch = clamp(self.pitch(view, interval_sec), limits.gap_min + 1.0, limits.max_pitch());
        let desired = pitch * BODY_FRACTION;
        let max_allowed_by_gap = (pitch - limits.gap_min).max(1.0);
        clamp(desired, limits.body_min, limits.body_max.min(max_allowed_by_gap))
    }

    /// Auto-fit the horizontal axis: `visible_count` records across the plot,
    /// right edge on the last loaded record.
    pub fn fit_time_axis(&self, view: &mut ViewState, window: &CandleWindow, plot: &PlotRect, visible_count: usize) {
        let Some(last) = window.last_time_sec() else {
            return;
        };

        let mut dt = Self::estimate_interval_seconds(window);
        if dt <= 0.0 {
            dt = FALLBACK_INTERVAL_SECONDS;
        }

        view.seconds_per_pixel = (visible_count as f64 * dt) / plot.width.max(1.0);
        view.center_time_sec = last - (plot.width * 0.5) * view.seconds_per_pixel;

        self.clamp_zoom_to_spacing(view, dt);
        self.clamp_center_time(view, window, plot.width);
    }

    /// Auto-fit the vertical axis to the loaded lows/highs plus padding.
    pub fn fit_price_axis(&self, view: &mut ViewState, window: &CandleWindow, plot: &PlotRect) {
        if window.is_empty() || plot.height <= 0.0 {
            return;
        }

        let (mut min_p, mut max_p) = window
            .price_range()
            .map(|(lo, hi)| (self.price(lo), self.price(hi)))
            .unwrap_or((0.0, 1.0));

        if !min_p.is_finite() || !max_p.is_finite() {
            min_p = 0.0;
            max_p = 1.0;
        } else if max_p <= min_p {
            min_p -= 0.5;
            max_p = min_p + 1.0;
        }

        view.center_price = (min_p + max_p) * 0.5;
        view.price_per_pixel = ((max_p - min_p) * PRICE_FIT_PADDING) / plot.height;
        if view.price_per_pixel <= 0.0 {
            view.price_per_pixel = 1e-6;
        }
        view.refresh_visible_prices(plot.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{Record, SymbolCode};

    const NS: i64 = 1_000_000_000;
    const T0: i64 = 1_700_000_000;

    fn window_with(times: &[i64]) -> CandleWindow {
        let data: Vec<Record> = times
            .iter()
            .map(|&t| Record {
                timestamp_ns: t * NS,
                open: 100,
                high: 110,
                low: 90,
                close: 105,
                volume: 1,
                symbol_code: SymbolCode::from(0),
            })
            .collect();
        let mut window = CandleWindow::new(data.len().max(1));
        window.load_window(&data, 0);
        window
    }

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(SpacingLimits::default(), 1.0)
    }

    #[test]
    fn interval_skips_repeated_leading_timestamps() {
        let window = window_with(&[T0, T0, T0 + 300, T0 + 360]);
        assert_eq!(CoordinateMapper::estimate_interval_seconds(&window), 300.0);
    }

    #[test]
    fn interval_falls_back_without_two_distinct_times() {
        assert_eq!(CoordinateMapper::estimate_interval_seconds(&window_with(&[T0])), FALLBACK_INTERVAL_SECONDS);
        assert_eq!(
            CoordinateMapper::estimate_interval_seconds(&window_with(&[T0, T0])),
            FALLBACK_INTERVAL_SECONDS
        );
    }

    #[test]
    fn narrow_window_collapses_to_midpoint() {
        let window = window_with(&[T0, T0 + 60]);
        let mut view = ViewState { center_time_sec: 0.0, seconds_per_pixel: 1.0, ..Default::default() };
        mapper().clamp_center_time(&mut view, &window, 800.0);
        assert_eq!(view.center_time_sec, (T0 + 30) as f64);
    }

    #[test]
    fn body_width_leaves_gap() {
        let m = mapper();
        for spp in [0.24, 1.0, 5.0, 11.9] {
            let view = ViewState { seconds_per_pixel: spp, ..Default::default() };
            let pitch = m.pitch(&view, 60.0);
            let body = m.compute_body_width(&view, 60.0);
            assert!(body >= 3.0);
            assert!(body + 2.0 <= pitch + 1e-9, "spp={spp} body={body} pitch={pitch}");
        }
    }

    #[test]
    fn screen_x_roundtrip() {
        let m = mapper();
        let plot = PlotRect::new(80.0, 10.0, 700.0, 500.0);
        let view = ViewState { center_time_sec: 1_000.0, seconds_per_pixel: 2.5, ..Default::default() };
        let t = m.screen_x_to_time(&view, &plot, 123.0);
        assert!((m.time_to_screen_x(&view, &plot, t) - 123.0).abs() < 1e-9);
    }

    #[test]
    fn price_axis_fit_contains_range() {
        let window = window_with(&[T0, T0 + 60]);
        let plot = PlotRect::new(0.0, 0.0, 400.0, 300.0);
        let mut view = ViewState::default();
        mapper().fit_price_axis(&mut view, &window, &plot);
        assert_eq!(view.center_price, 100.0);
        assert!(view.visible_min_price < 90.0 && view.visible_max_price > 110.0);
    }
}
