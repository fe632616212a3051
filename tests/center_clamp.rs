use candle_window::domain::chart::{CoordinateMapper, SpacingLimits, ViewState};
use candle_window::domain::market_data::{CandleWindow, Record, SymbolCode};
use quickcheck_macros::quickcheck;

const T0: i64 = 1_700_000_000;

fn window(len: usize) -> CandleWindow {
    let store: Vec<Record> = (0..len as i64)
        .map(|i| Record {
            timestamp_ns: (T0 + i * 60) * 1_000_000_000,
            open: 10,
            high: 11,
            low: 9,
            close: 10,
            volume: 0,
            symbol_code: SymbolCode::from(0),
        })
        .collect();
    let mut window = CandleWindow::new(len.max(1));
    window.load_window(&store, 0);
    window
}

#[quickcheck]
fn clamp_is_idempotent(len: u8, offset_min: i32, spp_milli: u32, width: u16) -> bool {
    let window = window(len as usize % 200 + 1);
    let mapper = CoordinateMapper::new(SpacingLimits::default(), 1.0);
    let mut view = ViewState {
        center_time_sec: T0 as f64 + offset_min as f64 * 60.0,
        seconds_per_pixel: (spp_milli % 100_000 + 1) as f64 / 1_000.0,
        ..Default::default()
    };
    let plot_width = width as f64;

    mapper.clamp_center_time(&mut view, &window, plot_width);
    let once = view;
    mapper.clamp_center_time(&mut view, &window, plot_width);
    view == once
}

#[test]
fn center_never_leaves_loaded_data() {
    let window = window(100);
    let mapper = CoordinateMapper::new(SpacingLimits::default(), 1.0);
    let mut view = ViewState { center_time_sec: 4.0e9, seconds_per_pixel: 2.0, ..Default::default() };

    mapper.clamp_center_time(&mut view, &window, 300.0);
    let last = (T0 + 99 * 60) as f64;
    assert_eq!(view.center_time_sec, last - 300.0);
}

#[test]
fn wide_view_collapses_to_midpoint() {
    let window = window(10);
    let mapper = CoordinateMapper::new(SpacingLimits::default(), 1.0);
    let mut view = ViewState { center_time_sec: 0.0, seconds_per_pixel: 60.0, ..Default::default() };

    mapper.clamp_center_time(&mut view, &window, 500.0);
    assert_eq!(view.center_time_sec, T0 as f64 + 4.5 * 60.0);
}

#[test]
fn empty_window_leaves_view_alone() {
    let window = CandleWindow::new(4);
    let mapper = CoordinateMapper::new(SpacingLimits::default(), 1.0);
    let mut view = ViewState { center_time_sec: 123.0, seconds_per_pixel: 1.0, ..Default::default() };
    mapper.clamp_center_time(&mut view, &window, 500.0);
    assert_eq!(view.center_time_sec, 123.0);
}
