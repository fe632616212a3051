use crate::domain::market_data::{RECORD_SIZE, Record, SymbolCode};
use bytemuck::{Pod, Zeroable};
use std::io::{self, Write};

/// On-disk layout of one record: little-endian fields, no padding.
///
/// Fields are byte arrays so the struct has alignment 1 and can be cast
/// straight out of an unaligned mapped region.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RawRecord {
    pub timestamp_ns: [u8; 8],
    pub open: [u8; 8],
    pub high: [u8; 8],
    pub low: [u8; 8],
    pub close: [u8; 8],
    pub volume: [u8; 4],
    pub symbol_code: u8,
}

const _: () = assert!(std::mem::size_of::<RawRecord>() == RECORD_SIZE);

impl From<&RawRecord> for Record {
    fn from(raw: &RawRecord) -> Self {
        Record {
            timestamp_ns: i64::from_le_bytes(raw.timestamp_ns),
            open: i64::from_le_bytes(raw.open),
            high: i64::from_le_bytes(raw.high),
            low: i64::from_le_bytes(raw.low),
            close: i64::from_le_bytes(raw.close),
            volume: u32::from_le_bytes(raw.volume),
            symbol_code: SymbolCode::from(raw.symbol_code),
        }
    }
}

impl From<&Record> for RawRecord {
    fn from(record: &Record) -> Self {
        RawRecord {
            timestamp_ns: record.timestamp_ns.to_le_bytes(),
            open: record.open.to_le_bytes(),
            high: record.high.to_le_bytes(),
            low: record.low.to_le_bytes(),
            close: record.close.to_le_bytes(),
            volume: record.volume.to_le_bytes(),
            symbol_code: record.symbol_code.value(),
        }
    }
}

/// Decode one record from exactly `RECORD_SIZE` bytes.
#[inline]
pub fn decode_record(bytes: &[u8]) -> Option<Record> {
    bytemuck::try_from_bytes::<RawRecord>(bytes).ok().map(Record::from)
}

/// Timestamp of the record starting at `bytes`, without decoding the rest.
#[inline]
pub fn decode_timestamp(bytes: &[u8]) -> Option<i64> {
    let head: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
    Some(i64::from_le_bytes(head))
}

pub fn encode_record(record: &Record) -> [u8; RECORD_SIZE] {
    let raw = RawRecord::from(record);
    let mut out = [0u8; RECORD_SIZE];
    out.copy_from_slice(bytemuck::bytes_of(&raw));
    out
}

/// Append records in store layout.
pub fn write_records<'a, W, I>(writer: &mut W, records: I) -> io::Result<u64>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut written = 0u64;
    for record in records {
        writer.write_all(&encode_record(record))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_offsets_match_layout() {
        let record = Record {
            timestamp_ns: 0x0102_0304_0506_0708,
            open: 1,
            high: 2,
            low: 3,
            close: 4,
            volume: 0xAABB_CCDD,
            symbol_code: SymbolCode::from(0x7F),
        };
        let bytes = encode_record(&record);

        assert_eq!(&bytes[0..8], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(bytes[8], 1);
        assert_eq!(bytes[16], 2);
        assert_eq!(bytes[24], 3);
        assert_eq!(bytes[32], 4);
        assert_eq!(&bytes[40..44], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(bytes[44], 0x7F);
        assert_eq!(decode_record(&bytes), Some(record));
        assert_eq!(decode_timestamp(&bytes), Some(record.timestamp_ns));
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(decode_record(&[0u8; RECORD_SIZE - 1]), None);
        assert_eq!(decode_record(&[0u8; RECORD_SIZE + 1]), None);
        assert_eq!(decode_timestamp(&[0u8; 4]), None);
    }

    #[test]
    fn decodes_from_unaligned_offset() {
        let record = Record { timestamp_ns: 42, open: 5, high: 6, low: 4, close: 5, ..Default::default() };
        let mut buf = vec![0u8; 1];
        buf.extend_from_slice(&encode_record(&record));
        assert_eq!(decode_record(&buf[1..]), Some(record));
    }
}
