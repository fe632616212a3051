use super::value_objects::Record;

/// Positional, read-only access to a sequence of fixed-width records.
///
/// Indices outside `[0, count)` yield `None` rather than an error.
pub trait RecordSource {
    fn count(&self) -> u64;
    fn read_at(&self, index: u64) -> Option<Record>;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Raw timestamp at `index`, regardless of record validity.
    fn timestamp_at(&self, index: u64) -> Option<i64> {
        self.read_at(index).map(|record| record.timestamp_ns)
    }
}

impl RecordSource for [Record] {
    fn count(&self) -> u64 {
        self.len() as u64
    }

    fn read_at(&self, index: u64) -> Option<Record> {
        usize::try_from(index).ok().and_then(|i| self.get(i)).copied()
    }
}

impl RecordSource for Vec<Record> {
    fn count(&self) -> u64 {
        self.as_slice().count()
    }

    fn read_at(&self, index: u64) -> Option<Record> {
        self.as_slice().read_at(index)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn count(&self) -> u64 {
        (**self).count()
    }

    fn read_at(&self, index: u64) -> Option<Record> {
        (**self).read_at(index)
    }

    fn timestamp_at(&self, index: u64) -> Option<i64> {
        (**self).timestamp_at(index)
    }
}
