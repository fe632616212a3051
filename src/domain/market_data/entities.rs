pub use super::value_objects::{Record, SymbolCode};
use super::repositories::RecordSource;
use super::value_objects::ns_to_seconds;
use crate::domain::logging::LogComponent;
use crate::log_debug;

/// Domain entity - bounded window of valid records sliding over a store.
///
/// Field storage is a set of parallel arrays sized once at construction;
/// reloads overwrite slots in place and never reallocate.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    timestamps: Vec<i64>,
    opens: Vec<i64>,
    highs: Vec<i64>,
    lows: Vec<i64>,
    closes: Vec<i64>,
    volumes: Vec<u32>,
    symbols: Vec<SymbolCode>,
    store_indices: Vec<u64>,
    loaded: usize,
    start: u64,
    scan_end: u64,
    scans: u64,
}

impl CandleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            timestamps: vec![0; capacity],
            opens: vec![0; capacity],
            highs: vec![0; capacity],
            lows: vec![0; capacity],
            closes: vec![0; capacity],
            volumes: vec![0; capacity],
            symbols: vec![SymbolCode::default(); capacity],
            store_indices: vec![0; capacity],
            loaded: 0,
            start: 0,
            scan_end: 0,
            scans: 0,
        }
    }

    /// Refill from `source`, scanning forward from `start_index`.
    ///
    /// Invalid records advance the scan cursor without taking a slot. Stops
    /// once every slot is filled or the source is exhausted. `start()` is
    /// set to `start_index` even when leading records were skipped.
    pub fn load_window<S: RecordSource + ?Sized>(&mut self, source: &S, start_index: u64) -> usize {
        let capacity = self.capacity();
        let count = source.count();
        let mut idx = start_index;
        let mut filled = 0usize;

        while filled < capacity && idx < count {
            let Some(record) = source.read_at(idx) else {
                break;
            };

            if record.is_valid() {
                self.timestamps[filled] = record.timestamp_ns;
                self.opens[filled] = record.open;
                self.highs[filled] = record.high;
                self.lows[filled] = record.low;
                self.closes[filled] = record.close;
                self.volumes[filled] = record.volume;
                self.symbols[filled] = record.symbol_code;
                self.store_indices[filled] = idx;
                filled += 1;
            }

            idx += 1;
        }

        self.loaded = filled;
        self.start = start_index;
        self.scan_end = idx;
        self.scans += 1;

        log_debug!(
            LogComponent::Domain("CandleWindow"),
            "window loaded={} start={} scan_end={}",
            self.loaded,
            self.start,
            self.scan_end
        );

        filled
    }

    pub fn capacity(&self) -> usize {
        self.timestamps.len()
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }

    /// Scan origin of the last load.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// One past the last store index examined by the last load.
    pub fn scan_end(&self) -> u64 {
        self.scan_end
    }

    /// Number of store scans performed so far.
    pub fn scan_count(&self) -> u64 {
        self.scans
    }

    /// Store index of the first loaded record, which differs from `start()`
    /// when leading records were invalid.
    pub fn first_valid_index(&self) -> Option<u64> {
        self.store_index(0)
    }

    /// True store index of a loaded slot.
    pub fn store_index(&self, local: usize) -> Option<u64> {
        self.store_indices[..self.loaded].get(local).copied()
    }

    /// Local slot holding the store index nearest to `store_index`, ties to
    /// the lower slot.
    pub fn local_for_store_index(&self, store_index: u64) -> Option<usize> {
        let indices = &self.store_indices[..self.loaded];
        if indices.is_empty() {
            return None;
        }
        let upper = indices.partition_point(|&i| i < store_index);
        if upper == 0 {
            return Some(0);
        }
        if upper == indices.len() {
            return Some(upper - 1);
        }
        let lower = upper - 1;
        if store_index - indices[lower] <= indices[upper] - store_index {
            Some(lower)
        } else {
            Some(upper)
        }
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps[..self.loaded]
    }

    pub fn opens(&self) -> &[i64] {
        &self.opens[..self.loaded]
    }

    pub fn highs(&self) -> &[i64] {
        &self.highs[..self.loaded]
    }

    pub fn lows(&self) -> &[i64] {
        &self.lows[..self.loaded]
    }

    pub fn closes(&self) -> &[i64] {
        &self.closes[..self.loaded]
    }

    pub fn volumes(&self) -> &[u32] {
        &self.volumes[..self.loaded]
    }

    pub fn symbols(&self) -> &[SymbolCode] {
        &self.symbols[..self.loaded]
    }

    pub fn record(&self, local: usize) -> Option<Record> {
        if local >= self.loaded {
            return None;
        }
        Some(Record {
            timestamp_ns: self.timestamps[local],
            open: self.opens[local],
            high: self.highs[local],
            low: self.lows[local],
            close: self.closes[local],
            volume: self.volumes[local],
            symbol_code: self.symbols[local],
        })
    }

    pub fn time_sec(&self, local: usize) -> Option<f64> {
        self.timestamps().get(local).map(|&ts| ns_to_seconds(ts))
    }

    pub fn first_time_sec(&self) -> Option<f64> {
        self.time_sec(0)
    }

    pub fn last_time_sec(&self) -> Option<f64> {
        self.loaded.checked_sub(1).and_then(|last| self.time_sec(last))
    }

    /// Lowest low and highest high over the loaded records.
    pub fn price_range(&self) -> Option<(i64, i64)> {
        let min = self.lows().iter().copied().min()?;
        let max = self.highs().iter().copied().max()?;
        Some((min, max))
    }

    /// Local index of the loaded record nearest to `target_sec`.
    ///
    /// When the target falls between two records the nearer one wins; an
    /// exact tie goes to the lower index.
    pub fn find_closest(&self, target_sec: f64) -> Option<usize> {
        if self.loaded == 0 {
            return None;
        }

        let ts = self.timestamps();
        let mut lo: isize = 0;
        let mut hi: isize = self.loaded as isize - 1;
        while lo <= hi {
            let mid = (lo + hi) >> 1;
            let t = ns_to_seconds(ts[mid as usize]);
            if t < target_sec {
                lo = mid + 1;
            } else if t > target_sec {
                hi = mid - 1;
            } else {
                return Some(mid as usize);
            }
        }

        let last = self.loaded as isize - 1;
        let upper = lo.clamp(0, last) as usize;
        let lower = (lo - 1).clamp(0, last) as usize;
        let d_upper = (ns_to_seconds(ts[upper]) - target_sec).abs();
        let d_lower = (ns_to_seconds(ts[lower]) - target_sec).abs();

        Some(if d_upper < d_lower { upper } else { lower })
    }
}
