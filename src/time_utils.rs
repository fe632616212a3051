use chrono::{DateTime, Utc};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

fn utc_from_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

/// Full UTC label for a record timestamp: `YYYY-MM-DD HH:MM:SS (+Nns)`,
/// where `N` is the sub-second remainder.
pub fn format_ts_utc(timestamp_ns: i64) -> String {
    let seconds = timestamp_ns.div_euclid(NANOS_PER_SECOND);
    let remainder = timestamp_ns.rem_euclid(NANOS_PER_SECOND);
    match utc_from_seconds(seconds) {
        Some(dt) => format!("{} (+{}ns)", dt.format("%Y-%m-%d %H:%M:%S"), remainder),
        None => format!("{timestamp_ns}ns"),
    }
}

/// Time axis label in UTC, `HH:MM:SS` when `with_seconds` else `HH:MM`.
pub fn format_time_label(time_sec: f64, with_seconds: bool) -> String {
    if !time_sec.is_finite() {
        return String::new();
    }
    let Some(dt) = utc_from_seconds(time_sec.floor() as i64) else {
        return String::new();
    };
    if with_seconds {
        dt.format("%H:%M:%S").to_string()
    } else {
        dt.format("%H:%M").to_string()
    }
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}
