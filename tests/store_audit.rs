use candle_window::domain::market_data::{Record, StoreAudit, StoreIndex, SymbolCode};
use candle_window::infrastructure::codec::write_records;
use candle_window::RecordStore;
use insta::assert_json_snapshot;
use std::io::Write;

const T0: i64 = 1_700_000_000;
const NS: i64 = 1_000_000_000;

fn dirty_store() -> Vec<Record> {
    let mut data: Vec<Record> = (0..10)
        .map(|i| Record {
            timestamp_ns: (T0 + i * 60) * NS,
            open: 300,
            high: 320,
            low: 290,
            close: 310,
            volume: 5,
            symbol_code: SymbolCode::from(1),
        })
        .collect();
    data[3].open = 0;
    data[5].timestamp_ns = data[4].timestamp_ns;
    data[7].low = 400;
    data[8].timestamp_ns = 0;
    data
}

#[test]
fn audit_report_snapshot() {
    let report = StoreAudit::run(&dirty_store());
    assert!(!report.is_clean());
    assert_json_snapshot!("audit_report", report);
}

#[test]
fn mapped_store_audits_like_memory() {
    let data = dirty_store();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write_records(&mut file, &data).expect("write");
    file.flush().expect("flush");

    let store = RecordStore::open(file.path()).expect("open");
    assert_eq!(StoreAudit::run(&store), StoreAudit::run(&data));
}

#[test]
fn clean_store_reports_clean() {
    let data: Vec<Record> = dirty_store().into_iter().take(3).collect();
    let report = StoreAudit::run(&data);
    assert!(report.is_clean());
    assert_eq!(report.valid_records, 3);
}

#[test]
fn lookups_over_mapped_store() {
    let data: Vec<Record> = (0..50)
        .map(|i| Record { timestamp_ns: (T0 + i * 60) * NS, open: 1, high: 1, low: 1, close: 1, ..Default::default() })
        .collect();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write_records(&mut file, &data).expect("write");
    file.flush().expect("flush");
    let store = RecordStore::open(file.path()).expect("open");

    assert_eq!(StoreIndex::lower_bound(&store, (T0 + 600) * NS), 10);
    assert_eq!(StoreIndex::nearest(&store, (T0 + 629) * NS), Some(10));
    assert_eq!(StoreIndex::nearest(&store, (T0 + 631) * NS), Some(11));
    assert_eq!(StoreIndex::range_around(&store, (T0 + 600) * NS, 120 * NS, 120 * NS), (8, 13));
    assert_eq!(StoreIndex::lower_bound(&store, i64::MAX), 50);
}
