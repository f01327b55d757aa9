//! In-memory reference substrate.

use super::{Ledger, LedgerError, LedgerEvent, RangeScan, WriteOp, WriteSet};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, Vec<u8>>,
    events: Vec<LedgerEvent>,
}

/// Ordered in-memory ledger.
///
/// Commits are applied under a single write lock, so a write set is
/// atomic with respect to every other reader and writer. Range scans copy
/// the matching entries under a read lock: a scan observes a consistent
/// snapshot as of the moment it was opened, never a half-applied commit.
///
/// Emitted events are retained in order and can be inspected with
/// [`events`](Self::events) or drained with [`take_events`](Self::take_events).
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<Inner>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries,
                events: Vec::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, LedgerError> {
        self.inner
            .read()
            .map_err(|e| LedgerError::Unavailable(format!("ledger lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, LedgerError> {
        self.inner
            .write()
            .map_err(|e| LedgerError::Unavailable(format!("ledger lock poisoned: {e}")))
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self.read()?.events.clone())
    }

    /// Drain the emitted events.
    pub fn take_events(&self) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(std::mem::take(&mut self.write()?.events))
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.read()?.entries.is_empty())
    }

    pub(crate) fn entries(&self) -> Result<BTreeMap<String, Vec<u8>>, LedgerError> {
        Ok(self.read()?.entries.clone())
    }
}

impl Ledger for InMemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.read()?.entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.write()?.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        self.write()?.entries.remove(key);
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<RangeScan, LedgerError> {
        if !end.is_empty() && start >= end {
            return Ok(RangeScan::new(Vec::new()));
        }

        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };

        let inner = self.read()?;
        let entries = inner
            .entries
            .range::<str, _>((Bound::Included(start), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(RangeScan::new(entries))
    }

    fn emit_event(&self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError> {
        self.write()?.events.push(LedgerEvent::new(name, payload));
        Ok(())
    }

    fn commit(&self, writes: WriteSet) -> Result<(), LedgerError> {
        let (ops, events) = writes.into_parts();
        let mut inner = self.write()?;
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    inner.entries.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    inner.entries.remove(&key);
                }
            }
        }
        inner.events.extend(events);
        Ok(())
    }
}
