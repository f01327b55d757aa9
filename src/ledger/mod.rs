//! Ledger substrate contract and the typed access facade over it.
//!
//! The substrate is an external, linearizable key-value store with event
//! emission. This crate only consumes it through the [`Ledger`] trait;
//! [`InMemoryLedger`] is the reference implementation used by tests and
//! embedded deployments.
//!
//! Keys are kind-prefixed strings (`machine/M1`, `trace/B1_input_...`).
//! The substrate enforces no schema: decoding stored bytes is the caller's
//! job, see [`LedgerFacade`].

mod error;
mod facade;
mod memory;

pub use error::LedgerError;
pub use facade::LedgerFacade;
pub use memory::InMemoryLedger;

use std::fmt;

/// A named event emitted alongside a committed write set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

impl LedgerEvent {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// A single staged mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: String, value: Vec<u8> },
    Delete { key: String },
}

/// Mutations and events that must be applied together.
///
/// An operation that updates an entity and appends its audit record stages
/// both here, plus its event, and commits once. Either everything lands or
/// nothing does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    ops: Vec<WriteOp>,
    events: Vec<LedgerEvent>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value,
        });
    }

    pub fn delete(&mut self, key: impl Into<String>) {
        self.ops.push(WriteOp::Delete { key: key.into() });
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.events.is_empty()
    }

    pub fn into_parts(self) -> (Vec<WriteOp>, Vec<LedgerEvent>) {
        (self.ops, self.events)
    }
}

type Entries = Box<dyn Iterator<Item = (String, Vec<u8>)> + Send>;
type CloseHook = Box<dyn FnOnce() + Send>;

/// Iterator over `(key, value)` pairs returned by [`Ledger::range_scan`].
///
/// A substrate may stream entries lazily and attach a hook with
/// [`on_close`](Self::on_close) to release its cursor. Callers close the
/// scan with [`close`](Self::close) once done; a scan dropped without
/// closing runs the hook on drop.
pub struct RangeScan {
    entries: Entries,
    on_close: Option<CloseHook>,
}

impl RangeScan {
    /// A scan over entries already collected in key order.
    pub fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        Self::streaming(entries.into_iter())
    }

    /// A scan pulling entries from `entries` as the caller advances.
    pub fn streaming<I>(entries: I) -> Self
    where
        I: Iterator<Item = (String, Vec<u8>)> + Send + 'static,
    {
        Self {
            entries: Box::new(entries),
            on_close: None,
        }
    }

    /// Run `hook` exactly once when the scan is released.
    pub fn on_close(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    /// Release the scan. Remaining entries are discarded.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }
}

impl Drop for RangeScan {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for RangeScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeScan")
            .field("open", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

impl Iterator for RangeScan {
    type Item = (String, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// The key-value substrate the engine runs on.
///
/// Implementations must apply each [`commit`](Ledger::commit) atomically:
/// all staged puts, deletes and events, or none of them. Concurrent commits
/// touching the same key resolve last-writer-wins.
pub trait Ledger: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    fn delete(&self, key: &str) -> Result<(), LedgerError>;

    /// Entries with `start <= key < end` in key order.
    ///
    /// An empty `end` means unbounded, so `range_scan("", "")` walks the
    /// whole keyspace.
    fn range_scan(&self, start: &str, end: &str) -> Result<RangeScan, LedgerError>;

    fn emit_event(&self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError>;

    /// Apply a write set atomically.
    fn commit(&self, writes: WriteSet) -> Result<(), LedgerError>;
}

/// Smallest key greater than every key starting with `prefix`.
///
/// Returns an empty string (unbounded) when no such key exists.
pub fn prefix_end(prefix: &str) -> String {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = char::from_u32(last as u32 + 1) {
            chars.push(next);
            return chars.into_iter().collect();
        }
    }
    String::new()
}
