use candle_window::application::ViewportCoordinator;
use candle_window::domain::market_data::{Record, SymbolCode};
use candle_window::ViewerConfig;

const T0: i64 = 1_700_000_000;

fn viewport(price_scale: f64) -> ViewportCoordinator<Vec<Record>> {
    let data: Vec<Record> = (0..400)
        .map(|i| Record {
            timestamp_ns: (T0 + i * 60) * 1_000_000_000,
            open: 2_000_000 + i * 100,
            high: 2_000_500 + i * 100,
            low: 1_999_500 + i * 100,
            close: 2_000_200 + i * 100,
            volume: 10,
            symbol_code: SymbolCode::from(3),
        })
        .collect();
    let config = ViewerConfig { price_scale, ..Default::default() };
    let mut vp: ViewportCoordinator<Vec<Record>> = ViewportCoordinator::new(config).expect("valid config");
    vp.resize(1_000.0, 600.0);
    vp.attach_source(data);
    vp
}

#[test]
fn frame_exposes_loaded_slices() {
    let mut vp = viewport(1.0);
    let frame = vp.frame().expect("frame");

    assert_eq!(frame.timestamps.len(), frame.loaded);
    assert_eq!(frame.closes.len(), frame.loaded);
    assert_eq!(frame.symbols.first(), Some(&3));
    assert_eq!(frame.first_valid_index, Some(frame.window_start));
    assert!(frame.body_width > 0.0 && frame.body_width <= frame.pitch);
}

#[test]
fn axes_cover_plot_edges() {
    let mut vp = viewport(1.0);
    let frame = vp.frame().expect("frame");
    let axes = &frame.axes;

    assert_eq!(axes.price.len(), axes.profile.price_ticks + 1);
    assert_eq!(axes.time.len(), axes.profile.time_ticks + 1);
    assert!((4..=7).contains(&axes.profile.time_ticks));
    assert_eq!(axes.time[0].position, frame.plot.left());
    assert_eq!(axes.price[0].position, frame.plot.bottom());
    assert!(axes.price.windows(2).all(|w| w[0].value < w[1].value));
    assert!(axes.time.windows(2).all(|w| w[0].value < w[1].value));
    assert!(axes.time.iter().all(|tick| !tick.label.is_empty()));
}

#[test]
fn price_scale_applies_to_fit() {
    let mut raw = viewport(1.0);
    let mut scaled = viewport(100.0);
    let raw_view = raw.frame().expect("frame").view;
    let scaled_view = scaled.frame().expect("frame").view;

    assert!((raw_view.center_price / scaled_view.center_price - 100.0).abs() < 1e-9);
    assert!(scaled_view.visible_min_price < scaled_view.center_price);
}

#[test]
fn frame_serializes_to_json() {
    let mut vp = viewport(1.0);
    let frame = vp.frame().expect("frame");
    let json = serde_json::to_value(&frame).expect("serialize");

    assert_eq!(json["loaded"], frame.loaded);
    assert!(json["axes"]["price"].is_array());
}
