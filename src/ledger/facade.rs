//! Typed access to the ledger substrate.

use super::{prefix_end, Ledger, LedgerError, WriteSet};
use crate::events::DomainEvent;
use crate::model::{Document, LedgerDocument};
use std::sync::Arc;

/// Typed wrapper over a [`Ledger`].
///
/// Encodes and decodes [`LedgerDocument`]s, stages writes and events into
/// [`WriteSet`]s, and runs prefix-scoped scans. Holds no state of its own
/// besides the shared substrate handle, so clones are cheap.
pub struct LedgerFacade<L: Ledger + ?Sized> {
    ledger: Arc<L>,
}

impl<L: Ledger + ?Sized> Clone for LedgerFacade<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: Ledger + ?Sized> LedgerFacade<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Whether a non-empty value exists for the document id.
    pub fn contains<D: Document>(&self, id: &str) -> Result<bool, LedgerError> {
        Ok(self
            .ledger
            .get(&D::KIND.key(id))?
            .is_some_and(|bytes| !bytes.is_empty()))
    }

    /// Load and decode one document.
    ///
    /// An empty value counts as absent. A value of another kind under this
    /// key is reported as malformed.
    pub fn fetch<D: Document>(&self, id: &str) -> Result<Option<D>, LedgerError> {
        let key = D::KIND.key(id);
        let Some(bytes) = self.ledger.get(&key)? else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        let doc = decode(&key, &bytes)?;
        let found = doc.kind();
        D::from_document(doc).map(Some).ok_or_else(|| LedgerError::Malformed {
            key,
            reason: format!("expected {} document, found {}", D::KIND, found),
        })
    }

    /// Every document of kind `D`, in key order.
    ///
    /// Values that fail to decode, or decode to another kind, are skipped.
    /// The underlying scan is closed before returning.
    pub fn scan<D: Document>(&self) -> Result<Vec<D>, LedgerError> {
        let prefix = D::KIND.prefix();
        let mut scan = self.ledger.range_scan(&prefix, &prefix_end(&prefix))?;

        let mut documents = Vec::new();
        for (key, bytes) in scan.by_ref() {
            match decode(&key, &bytes) {
                Ok(doc) => match D::from_document(doc) {
                    Some(document) => documents.push(document),
                    None => tracing::debug!(%key, kind = %D::KIND, "skipping document of another kind"),
                },
                Err(err) => tracing::debug!(%key, error = %err, "skipping undecodable ledger value"),
            }
        }
        scan.close();
        Ok(documents)
    }

    pub fn commit(&self, writes: WriteSet) -> Result<(), LedgerError> {
        self.ledger.commit(writes)
    }
}

fn decode(key: &str, bytes: &[u8]) -> Result<LedgerDocument, LedgerError> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl WriteSet {
    /// Stage a document write under its kind-prefixed key.
    pub fn put_document<D: Document>(&mut self, document: &D) -> Result<(), LedgerError> {
        let key = document.key();
        let bytes = serde_json::to_vec(&document.clone().into_document())?;
        self.put(key, bytes);
        Ok(())
    }

    /// Stage a domain event.
    pub fn emit_domain(&mut self, event: &DomainEvent) -> Result<(), LedgerError> {
        self.emit(event.to_ledger_event()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::ledger::RangeScan;
    use crate::model::{Batch, Machine, ProcessTrace};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn facade() -> LedgerFacade<InMemoryLedger> {
        LedgerFacade::new(Arc::new(InMemoryLedger::new()))
    }

    #[test]
    fn put_then_fetch_roundtrips() {
        let facade = facade();
        let batch = Batch::new("B1", "steel", "S", 100, 1);

        let mut writes = WriteSet::new();
        writes.put_document(&batch).unwrap();
        facade.commit(writes).unwrap();

        assert!(facade.contains::<Batch>("B1").unwrap());
        assert_eq!(facade.fetch::<Batch>("B1").unwrap(), Some(batch));
        assert_eq!(facade.fetch::<Batch>("B2").unwrap(), None);
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let facade = facade();
        facade.ledger().put("batch/B1", Vec::new()).unwrap();

        assert!(!facade.contains::<Batch>("B1").unwrap());
        assert_eq!(facade.fetch::<Batch>("B1").unwrap(), None);
    }

    #[test]
    fn fetch_reports_wrong_kind_as_malformed() {
        let facade = facade();
        let bytes =
            serde_json::to_vec(&Batch::new("M1", "steel", "S", 1, 1).into_document()).unwrap();
        facade.ledger().put("machine/M1", bytes).unwrap();

        let err = facade.fetch::<Machine>("M1").unwrap_err();
        assert!(matches!(err, LedgerError::Malformed { .. }));
    }

    #[test]
    fn scan_skips_garbage_and_stays_in_prefix() {
        let facade = facade();
        let mut writes = WriteSet::new();
        writes.put_document(&Batch::new("B1", "steel", "S", 1, 1)).unwrap();
        writes.put_document(&Batch::new("B2", "copper", "S", 2, 1)).unwrap();
        facade.commit(writes).unwrap();
        facade.ledger().put("batch/garbage", b"not json".to_vec()).unwrap();
        facade.ledger().put("batchx/B3", b"{}".to_vec()).unwrap();

        let batches = facade.scan::<Batch>().unwrap();
        let ids: Vec<&str> = batches.iter().map(|b| b.batch_id.as_str()).collect();
        assert_eq!(ids, vec!["B1", "B2"]);
        assert!(facade.scan::<ProcessTrace>().unwrap().is_empty());
    }

    /// Streams entries from an inner ledger and counts opened and closed scans.
    #[derive(Default)]
    struct CountingLedger {
        inner: InMemoryLedger,
        opened: AtomicUsize,
        closed: Arc<AtomicUsize>,
    }

    impl Ledger for CountingLedger {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
            self.inner.put(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), LedgerError> {
            self.inner.delete(key)
        }

        fn range_scan(&self, start: &str, end: &str) -> Result<RangeScan, LedgerError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            let entries: Vec<_> = self.inner.range_scan(start, end)?.collect();
            let closed = Arc::clone(&self.closed);
            Ok(RangeScan::streaming(entries.into_iter()).on_close(move || {
                closed.fetch_add(1, Ordering::SeqCst);
            }))
        }

        fn emit_event(&self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError> {
            self.inner.emit_event(name, payload)
        }

        fn commit(&self, writes: WriteSet) -> Result<(), LedgerError> {
            self.inner.commit(writes)
        }
    }

    #[test]
    fn scan_closes_every_scan_it_opens() {
        let ledger = Arc::new(CountingLedger::default());
        let facade = LedgerFacade::new(Arc::clone(&ledger));
        let mut writes = WriteSet::new();
        writes.put_document(&Batch::new("B1", "steel", "S", 1, 1)).unwrap();
        facade.commit(writes).unwrap();
        facade.ledger().put("batch/garbage", b"not json".to_vec()).unwrap();

        assert_eq!(facade.scan::<Batch>().unwrap().len(), 1);
        assert!(facade.scan::<Machine>().unwrap().is_empty());

        assert_eq!(ledger.opened.load(Ordering::SeqCst), 2);
        assert_eq!(ledger.closed.load(Ordering::SeqCst), 2);
    }
}
