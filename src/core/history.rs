//! Ordered audit histories.
//!
//! A [`History`] is an immutable, timestamp-ordered sequence of audit
//! records (state transitions or process traces) belonging to one entity.

use crate::clock::Timestamp;
use std::time::Duration;

/// An immutable entry of the audit trail.
///
/// Records are written once and back-reference their owning entity by id.
pub trait AuditRecord: Clone {
    /// Unique id of the record itself.
    fn record_id(&self) -> &str;

    /// Id of the machine or batch the record belongs to.
    fn owner_id(&self) -> &str;

    /// Millisecond timestamp at which the record was written.
    fn timestamp(&self) -> Timestamp;
}

/// Timestamp-ordered audit records of a single entity.
///
/// Construction sorts ascending by timestamp, breaking ties by record id,
/// so two histories built from the same records are always identical.
#[derive(Clone, Debug, PartialEq)]
pub struct History<R: AuditRecord> {
    records: Vec<R>,
}

impl<R: AuditRecord> Default for History<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AuditRecord> History<R> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build a history from records in arbitrary (storage) order.
    pub fn from_records(mut records: Vec<R>) -> Self {
        records.sort_by(|a, b| {
            a.timestamp()
                .cmp(&b.timestamp())
                .then_with(|| a.record_id().cmp(b.record_id()))
        });
        Self { records }
    }

    /// Append a record, returning a new history.
    ///
    /// The receiver is left untouched.
    pub fn record(&self, record: R) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self::from_records(records)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&R> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&R> {
        self.records.last()
    }

    /// Time between the first and the last record.
    ///
    /// Returns `None` for an empty history.
    pub fn span(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        let millis = last.timestamp().saturating_sub(first.timestamp());
        Some(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R: AuditRecord> IntoIterator for History<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
