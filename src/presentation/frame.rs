use crate::domain::chart::{ChartState, PlotRect, SpacingLimits, ViewState};
use crate::domain::market_data::Record;
use crate::time_utils::{format_time_label, format_ts_utc};
use serde::Serialize;

const MAX_TICKS: f64 = 7.0;
const MIN_TICKS: f64 = 4.0;

/// Axis density picked from the current body width: wide bodies get fewer,
/// coarser labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisProfile {
    pub price_ticks: usize,
    pub time_ticks: usize,
    pub time_with_seconds: bool,
    pub price_decimals: usize,
}

impl AxisProfile {
    pub fn from_body_width(body_width: f64, limits: &SpacingLimits) -> Self {
        let t = (body_width - limits.body_min) / (limits.body_max - limits.body_min).max(1e-9);
        let t = t.clamp(0.0, 1.0);
        let ticks = (MAX_TICKS + (MIN_TICKS - MAX_TICKS) * t).round() as usize;

        let price_decimals = if t < 0.33 {
            5
        } else if t < 0.66 {
            3
        } else {
            2
        };

        Self { price_ticks: ticks, time_ticks: ticks, time_with_seconds: t < 0.33, price_decimals }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    /// Screen coordinate along the axis
    pub position: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTicks {
    pub profile: AxisProfile,
    pub price: Vec<AxisTick>,
    pub time: Vec<AxisTick>,
}

impl AxisTicks {
    /// Evenly spaced ticks from the bottom/left edge to the top/right edge,
    /// both ends included.
    pub fn compute(chart: &ChartState, plot: &PlotRect) -> Self {
        let mapper = chart.mapper();
        let profile = AxisProfile::from_body_width(chart.body_width(), mapper.limits());

        let price = (0..=profile.price_ticks)
            .map(|i| {
                let y = plot.bottom() - (i as f64 / profile.price_ticks as f64) * plot.height;
                let value = mapper.screen_y_to_price(&chart.view, plot, y);
                AxisTick { position: y, value, label: format_price(value, profile.price_decimals) }
            })
            .collect();

        let time = (0..=profile.time_ticks)
            .map(|i| {
                let x = plot.left() + (i as f64 / profile.time_ticks as f64) * plot.width;
                let value = mapper.screen_x_to_time(&chart.view, plot, x);
                AxisTick { position: x, value, label: format_time_label(value, profile.time_with_seconds) }
            })
            .collect();

        Self { profile, price, time }
    }
}

/// Fixed decimals with trailing zeros dropped.
pub fn format_price(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub window_start: u64,
    pub first_valid_index: Option<u64>,
    pub loaded: usize,
    pub timestamps: Vec<i64>,
    pub opens: Vec<i64>,
    pub highs: Vec<i64>,
    pub lows: Vec<i64>,
    pub closes: Vec<i64>,
    pub volumes: Vec<u32>,
    pub symbols: Vec<u8>,
    pub view: ViewState,
    pub plot: PlotRect,
    pub body_width: f64,
    pub pitch: f64,
    pub axes: AxisTicks,
}

impl RenderFrame {
    pub fn capture(chart: &ChartState, plot: &PlotRect) -> Self {
        let window = &chart.window;
        Self {
            window_start: window.start(),
            first_valid_index: window.first_valid_index(),
            loaded: window.loaded(),
            timestamps: window.timestamps().to_vec(),
            opens: window.opens().to_vec(),
            highs: window.highs().to_vec(),
            lows: window.lows().to_vec(),
            closes: window.closes().to_vec(),
            volumes: window.volumes().to_vec(),
            symbols: window.symbols().iter().map(|s| s.value()).collect(),
            view: chart.view,
            plot: *plot,
            body_width: chart.body_width(),
            pitch: chart.pitch(),
            axes: AxisTicks::compute(chart, plot),
        }
    }
}

/// Details of the record under the pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverInfo {
    pub local_index: usize,
    pub store_index: u64,
    pub record: Record,
    pub label: String,
}

impl HoverInfo {
    pub fn from_chart(chart: &ChartState, local_index: usize) -> Option<Self> {
        let record = chart.window.record(local_index)?;
        let store_index = chart.window.store_index(local_index)?;
        Some(Self { local_index, store_index, record, label: format_ts_utc(record.timestamp_ns) })
    }
}
