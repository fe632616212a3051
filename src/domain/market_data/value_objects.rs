use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumCount, EnumIter};

/// Width in bytes of one stored record.
pub const RECORD_SIZE: usize = 45;

/// 2000-01-01T00:00:00Z
pub const MIN_VALID_TIMESTAMP_NS: i64 = 946_684_800 * 1_000_000_000;
/// 2100-01-01T00:00:00Z
pub const MAX_VALID_TIMESTAMP_NS: i64 = 4_102_444_800 * 1_000_000_000;
/// Prices above this are treated as garbage.
pub const MAX_REASONABLE_PRICE: i64 = 10_000_000_000_000;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Value Object - one-byte instrument tag
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into, Display, Serialize, Deserialize,
)]
pub struct SymbolCode(u8);

impl SymbolCode {
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Reason a stored record fails the sanity filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, AsRefStr, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordDefect {
    #[strum(serialize = "timestamp_out_of_range")]
    TimestampOutOfRange,
    #[strum(serialize = "non_positive_price")]
    NonPositivePrice,
    #[strum(serialize = "inverted_range")]
    InvertedRange,
    #[strum(serialize = "price_above_ceiling")]
    PriceAboveCeiling,
}

/// Value Object - one fixed-width OHLCV record as stored on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp_ns: i64,
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub close: i64,
    pub volume: u32,
    pub symbol_code: SymbolCode,
}

impl Record {
    /// First sanity rule this record breaks, if any.
    pub fn defect(&self) -> Option<RecordDefect> {
        if self.timestamp_ns < MIN_VALID_TIMESTAMP_NS || self.timestamp_ns > MAX_VALID_TIMESTAMP_NS {
            return Some(RecordDefect::TimestampOutOfRange);
        }
        if self.open <= 0 || self.high <= 0 || self.low <= 0 || self.close <= 0 {
            return Some(RecordDefect::NonPositivePrice);
        }
        if self.high < self.low {
            return Some(RecordDefect::InvertedRange);
        }
        if self.open > MAX_REASONABLE_PRICE
            || self.high > MAX_REASONABLE_PRICE
            || self.low > MAX_REASONABLE_PRICE
            || self.close > MAX_REASONABLE_PRICE
        {
            return Some(RecordDefect::PriceAboveCeiling);
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.defect().is_none()
    }

    pub fn time_sec(&self) -> f64 {
        ns_to_seconds(self.timestamp_ns)
    }
}

#[inline]
pub fn ns_to_seconds(timestamp_ns: i64) -> f64 {
    timestamp_ns as f64 / NANOS_PER_SECOND
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            timestamp_ns: 1_700_000_000 * 1_000_000_000,
            open: 100,
            high: 120,
            low: 90,
            close: 110,
            volume: 5,
            symbol_code: SymbolCode::from(1),
        }
    }

    #[test]
    fn sane_record_is_valid() {
        assert!(sample().is_valid());
    }

    #[test]
    fn defects_are_reported_in_rule_order() {
        let mut r = sample();
        r.timestamp_ns = 0;
        r.low = -1;
        assert_eq!(r.defect(), Some(RecordDefect::TimestampOutOfRange));

        let mut r = sample();
        r.close = 0;
        assert_eq!(r.defect(), Some(RecordDefect::NonPositivePrice));

        let mut r = sample();
        r.low = 100;
        r.high = 50;
        assert_eq!(r.defect(), Some(RecordDefect::InvertedRange));

        let mut r = sample();
        r.high = MAX_REASONABLE_PRICE + 1;
        assert_eq!(r.defect(), Some(RecordDefect::PriceAboveCeiling));
    }

    #[test]
    fn calendar_bounds_are_inclusive() {
        let mut r = sample();
        r.timestamp_ns = MIN_VALID_TIMESTAMP_NS;
        assert!(r.is_valid());
        r.timestamp_ns = MAX_VALID_TIMESTAMP_NS;
        assert!(r.is_valid());
        r.timestamp_ns = MAX_VALID_TIMESTAMP_NS + 1;
        assert!(!r.is_valid());
    }
}
