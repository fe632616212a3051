#![cfg(feature = "logic-only")]

use candle_window::presentation::format_price;
use candle_window::time_utils::{format_time_label, format_ts_utc};

#[test]
fn format_time_label_basic() {
    assert_eq!(format_time_label(0.0, false), "00:00");
    assert_eq!(format_time_label(59.9, true), "00:00:59");
    assert_eq!(format_time_label(3_600.0, false), "01:00");
}

#[test]
fn hover_label_basic() {
    assert_eq!(format_ts_utc(946_684_800_000_000_007), "2000-01-01 00:00:00 (+7ns)");
}

#[test]
fn price_label_basic() {
    assert_eq!(format_price(12.5, 5), "12.5");
    assert_eq!(format_price(12.0, 2), "12");
}
