//! Snapshots of the transaction record source.
//!
//! The live record source pushes a complete, date-descending list on every
//! change. A [`Snapshot`] models one such delivery: callers build a new one
//! per update and re-run the engine over it.

mod file;

pub use file::SnapshotFile;

use core::cmp::Ordering;
use std::io::Read;

use crate::error::Result;
use crate::models::{TransactionId, TransactionRecord};

/// An immutable, date-descending list of transaction records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Records, newest first; undated records last.
    records: Vec<TransactionRecord>,
}

impl Snapshot {
    /// Creates a snapshot, ordering the records newest first.
    ///
    /// The sort is stable: records with equal timestamps keep their
    /// relative order, and undated records go last.
    #[must_use]
    pub fn from_records(mut records: Vec<TransactionRecord>) -> Self {
        records.sort_by(newest_first);
        Self { records }
    }

    /// Decodes a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON array of objects with an
    /// `id`. Malformed amounts and timestamps do not fail decoding.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<TransactionRecord> = serde_json::from_str(json)?;
        tracing::debug!(records = records.len(), "decoded snapshot");
        Ok(Self::from_records(records))
    }

    /// Decodes a JSON array of records from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content is not a JSON
    /// array of records.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<TransactionRecord> = serde_json::from_reader(reader)?;
        tracing::debug!(records = records.len(), "decoded snapshot");
        Ok(Self::from_records(records))
    }

    /// Returns the records, newest first.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the snapshot holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a record by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: &TransactionId) -> Option<&TransactionRecord> {
        self.records.iter().find(|record| record.id == *id)
    }

    /// Returns the next snapshot with `record` added.
    #[must_use]
    pub fn with_record(self, record: TransactionRecord) -> Self {
        let mut records = self.records;
        records.push(record);
        Self::from_records(records)
    }

    /// Returns the next snapshot without the record `id`, and whether it
    /// was present.
    #[must_use]
    pub fn without_record(self, id: &TransactionId) -> (Self, bool) {
        let mut records = self.records;
        let before = records.len();
        records.retain(|record| record.id != *id);
        let removed = records.len() != before;
        (Self { records }, removed)
    }

    /// Consumes the snapshot and returns its records.
    #[inline]
    #[must_use]
    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }
}

/// Orders by timestamp descending, undated last.
fn newest_first(left: &TransactionRecord, right: &TransactionRecord) -> Ordering {
    match (left.occurred_at, right.occurred_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
