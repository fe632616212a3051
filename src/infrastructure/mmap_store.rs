use super::codec::{decode_record, decode_timestamp};
use crate::domain::errors::{ViewerError, ViewerResult};
use crate::domain::logging::{LogComponent, LogEntry, LogLevel, emit};
use crate::domain::market_data::{RECORD_SIZE, Record, RecordSource};
use crate::log_info;
use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only, memory-mapped store of fixed-width records.
///
/// Dropping the store unmaps the file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    mmap: Option<Mmap>,
    count: u64,
    trailing_bytes: u64,
}

impl RecordStore {
    /// Open a store, ignoring a trailing partial record with a warning.
    pub fn open(path: impl AsRef<Path>) -> ViewerResult<Self> {
        Self::open_with(path.as_ref(), false)
    }

    /// Open a store, rejecting files whose length is not a whole number of
    /// records.
    pub fn open_strict(path: impl AsRef<Path>) -> ViewerResult<Self> {
        Self::open_with(path.as_ref(), true)
    }

    fn open_with(path: &Path, strict: bool) -> ViewerResult<Self> {
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ViewerError::StoreNotFound(path.to_path_buf()),
            _ => ViewerError::Io(err),
        })?;

        let file_len = file.metadata()?.len();
        let count = file_len / RECORD_SIZE as u64;
        let trailing_bytes = file_len % RECORD_SIZE as u64;

        if trailing_bytes != 0 {
            if strict {
                return Err(ViewerError::StoreSizeMismatch { file_len, record_size: RECORD_SIZE });
            }
            emit(LogLevel::Warn, || {
                LogEntry::new(LogLevel::Warn, LogComponent::Infrastructure("RecordStore"), "partial trailing record ignored")
                    .with_field("path", path.display())
                    .with_field("trailing_bytes", trailing_bytes)
                    .with_field("file_len", file_len)
            });
        }

        // Empty files cannot be mapped on every platform.
        let mmap = if count == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and the store is append-only;
            // writers never truncate or rewrite bytes that are already mapped.
            Some(unsafe { Mmap::map(&file)? })
        };

        log_info!(
            LogComponent::Infrastructure("RecordStore"),
            "opened {} with {} records",
            path.display(),
            count
        );

        Ok(Self { path: path.to_path_buf(), mmap, count, trailing_bytes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes past the last whole record.
    pub fn trailing_bytes(&self) -> u64 {
        self.trailing_bytes
    }

    fn record_bytes(&self, index: u64) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let offset = usize::try_from(index).ok()?.checked_mul(RECORD_SIZE)?;
        self.mmap.as_ref()?.get(offset..offset + RECORD_SIZE)
    }
}

impl RecordSource for RecordStore {
    fn count(&self) -> u64 {
        self.count
    }

    fn read_at(&self, index: u64) -> Option<Record> {
        decode_record(self.record_bytes(index)?)
    }

    fn timestamp_at(&self, index: u64) -> Option<i64> {
        decode_timestamp(self.record_bytes(index)?)
    }
}
