use super::repositories::RecordSource;
use super::value_objects::RecordDefect;
use serde::Serialize;

/// Timestamp lookups over the raw store order.
///
/// These read timestamps as stored, garbage included, and rely on the store
/// being sorted by timestamp.
pub struct StoreIndex;

impl StoreIndex {
    /// First index whose timestamp is `>= target_ns`; `count()` if none.
    pub fn lower_bound<S: RecordSource + ?Sized>(source: &S, target_ns: i64) -> u64 {
        let mut lo = 0u64;
        let mut hi = source.count();
        while lo < hi {
            let mid = lo + ((hi - lo) >> 1);
            match source.timestamp_at(mid) {
                Some(ts) if ts < target_ns => lo = mid + 1,
                _ => hi = mid,
            }
        }
        lo
    }

    /// Index whose timestamp is nearest to `target_ns`, ties to the lower.
    pub fn nearest<S: RecordSource + ?Sized>(source: &S, target_ns: i64) -> Option<u64> {
        let count = source.count();
        if count == 0 {
            return None;
        }

        let i = Self::lower_bound(source, target_ns);
        if i == 0 {
            return Some(0);
        }
        if i >= count {
            return Some(count - 1);
        }

        let before = source.timestamp_at(i - 1)?;
        let after = source.timestamp_at(i)?;
        let d_before = target_ns.abs_diff(before);
        let d_after = after.abs_diff(target_ns);
        Some(if d_before <= d_after { i - 1 } else { i })
    }

    /// Half-open index range covering `[target - before_ns, target + after_ns]`.
    pub fn range_around<S: RecordSource + ?Sized>(
        source: &S,
        target_ns: i64,
        before_ns: i64,
        after_ns: i64,
    ) -> (u64, u64) {
        let from = target_ns.saturating_sub(before_ns.max(0));
        let to = target_ns.saturating_add(after_ns.max(0)).saturating_add(1);

        let start = Self::lower_bound(source, from);
        let end = Self::lower_bound(source, to).max(start);
        (start, end)
    }
}

/// Per-rule counts of rejected records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefectCounts {
    pub timestamp_out_of_range: u64,
    pub non_positive_price: u64,
    pub inverted_range: u64,
    pub price_above_ceiling: u64,
}

impl DefectCounts {
    fn add(&mut self, defect: RecordDefect) {
        match defect {
            RecordDefect::TimestampOutOfRange => self.timestamp_out_of_range += 1,
            RecordDefect::NonPositivePrice => self.non_positive_price += 1,
            RecordDefect::InvertedRange => self.inverted_range += 1,
            RecordDefect::PriceAboveCeiling => self.price_above_ceiling += 1,
        }
    }

    fn merge(&mut self, other: &DefectCounts) {
        self.timestamp_out_of_range += other.timestamp_out_of_range;
        self.non_positive_price += other.non_positive_price;
        self.inverted_range += other.inverted_range;
        self.price_above_ceiling += other.price_above_ceiling;
    }

    pub fn total(&self) -> u64 {
        self.timestamp_out_of_range + self.non_positive_price + self.inverted_range + self.price_above_ceiling
    }
}

/// Whole-store integrity summary.
///
/// Ordering checks compare consecutive valid records only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub total_records: u64,
    pub valid_records: u64,
    pub defects: DefectCounts,
    pub duplicate_timestamps: u64,
    pub backwards_timestamps: u64,
    pub first_valid_timestamp_ns: Option<i64>,
    pub last_valid_timestamp_ns: Option<i64>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.defects.total() == 0 && self.duplicate_timestamps == 0 && self.backwards_timestamps == 0
    }

    fn observe_valid(&mut self, ts: i64) {
        match self.last_valid_timestamp_ns {
            Some(prev) if ts == prev => self.duplicate_timestamps += 1,
            Some(prev) if ts < prev => self.backwards_timestamps += 1,
            _ => {}
        }
        if self.first_valid_timestamp_ns.is_none() {
            self.first_valid_timestamp_ns = Some(ts);
        }
        self.last_valid_timestamp_ns = Some(ts);
        self.valid_records += 1;
    }

    /// Combine with the report of the range that directly follows this one.
    fn merge(mut self, next: AuditReport) -> AuditReport {
        if let (Some(prev), Some(first)) = (self.last_valid_timestamp_ns, next.first_valid_timestamp_ns) {
            if first == prev {
                self.duplicate_timestamps += 1;
            } else if first < prev {
                self.backwards_timestamps += 1;
            }
        }

        self.total_records += next.total_records;
        self.valid_records += next.valid_records;
        self.defects.merge(&next.defects);
        self.duplicate_timestamps += next.duplicate_timestamps;
        self.backwards_timestamps += next.backwards_timestamps;
        if self.first_valid_timestamp_ns.is_none() {
            self.first_valid_timestamp_ns = next.first_valid_timestamp_ns;
        }
        if next.last_valid_timestamp_ns.is_some() {
            self.last_valid_timestamp_ns = next.last_valid_timestamp_ns;
        }
        self
    }
}

/// Validity and ordering audit of a complete store.
pub struct StoreAudit;

impl StoreAudit {
    #[cfg(feature = "parallel")]
    const CHUNK: u64 = 1 << 16;

    pub fn run<S: RecordSource + Sync + ?Sized>(source: &S) -> AuditReport {
        let count = source.count();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let chunks = count.div_ceil(Self::CHUNK);
            let parts: Vec<AuditReport> = (0..chunks)
                .into_par_iter()
                .map(|chunk| {
                    let start = chunk * Self::CHUNK;
                    let end = (start + Self::CHUNK).min(count);
                    Self::run_range(source, start, end)
                })
                .collect();
            parts.into_iter().fold(AuditReport::default(), AuditReport::merge)
        }

        #[cfg(not(feature = "parallel"))]
        {
            Self::run_range(source, 0, count)
        }
    }

    /// Audit the half-open index range `[start, end)`.
    pub fn run_range<S: RecordSource + ?Sized>(source: &S, start: u64, end: u64) -> AuditReport {
        let mut report = AuditReport::default();
        for idx in start..end.min(source.count()) {
            let Some(record) = source.read_at(idx) else {
                break;
            };
            report.total_records += 1;
            match record.defect() {
                Some(defect) => report.defects.add(defect),
                None => report.observe_valid(record.timestamp_ns),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{Record, SymbolCode};

    const NS: i64 = 1_000_000_000;
    const T0: i64 = 1_650_000_000;

    fn rec(ts_sec: i64) -> Record {
        Record {
            timestamp_ns: ts_sec * NS,
            open: 5,
            high: 6,
            low: 4,
            close: 5,
            volume: 0,
            symbol_code: SymbolCode::from(3),
        }
    }

    #[test]
    fn lower_bound_and_nearest() {
        let data: Vec<Record> = (0..10).map(|i| rec(T0 + i * 60)).collect();

        assert_eq!(StoreIndex::lower_bound(&data, (T0 + 61) * NS), 2);
        assert_eq!(StoreIndex::lower_bound(&data, (T0 + 60) * NS), 1);
        assert_eq!(StoreIndex::lower_bound(&data, (T0 + 10_000) * NS), 10);

        assert_eq!(StoreIndex::nearest(&data, (T0 + 89) * NS), Some(1));
        assert_eq!(StoreIndex::nearest(&data, (T0 + 90) * NS), Some(1));
        assert_eq!(StoreIndex::nearest(&data, (T0 + 91) * NS), Some(2));
        assert_eq!(StoreIndex::nearest(&data, 0), Some(0));
        assert_eq!(StoreIndex::nearest(&Vec::<Record>::new(), 0), None);
    }

    #[test]
    fn range_around_is_inclusive_of_bounds() {
        let data: Vec<Record> = (0..10).map(|i| rec(T0 + i * 60)).collect();
        let range = StoreIndex::range_around(&data, (T0 + 300) * NS, 120 * NS, 60 * NS);
        assert_eq!(range, (3, 7));
    }

    #[test]
    fn merge_matches_single_pass() {
        let mut data: Vec<Record> = (0..20).map(|i| rec(T0 + i * 60)).collect();
        data[7] = data[6];
        data[12].low = 100;
        data[15].timestamp_ns = data[3].timestamp_ns;

        let whole = StoreAudit::run_range(&data, 0, 20);
        let split = [(0, 7), (7, 13), (13, 20)]
            .into_iter()
            .map(|(s, e)| StoreAudit::run_range(&data, s, e))
            .fold(AuditReport::default(), AuditReport::merge);

        assert_eq!(whole, split);
        assert_eq!(whole.duplicate_timestamps, 1);
        assert_eq!(whole.defects.inverted_range, 1);
        assert_eq!(whole.backwards_timestamps, 1);
    }
}
