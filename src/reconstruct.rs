//! Read-only history queries rebuilt from the record keyspace.

use crate::core::{AuditRecord, History};
use crate::ledger::{Ledger, LedgerError, LedgerFacade};
use crate::model::Document;

/// Rebuilds ordered histories by scanning one record kind.
///
/// Scans are bounded to the kind's key prefix. Values that do not decode
/// as that kind are skipped. Records are filtered by owner and ordered by
/// timestamp, ties broken by record id, so two reads with no write in
/// between return the same sequence.
pub struct HistoryReconstructor<L: Ledger + ?Sized> {
    facade: LedgerFacade<L>,
}

impl<L: Ledger + ?Sized> Clone for HistoryReconstructor<L> {
    fn clone(&self) -> Self {
        Self::new(self.facade.clone())
    }
}

impl<L: Ledger + ?Sized> HistoryReconstructor<L> {
    pub fn new(facade: LedgerFacade<L>) -> Self {
        Self { facade }
    }

    /// Records of kind `R` owned by `owner_id`, oldest first.
    pub fn history<R>(&self, owner_id: &str) -> Result<History<R>, LedgerError>
    where
        R: AuditRecord + Document,
    {
        let records = self
            .facade
            .scan::<R>()?
            .into_iter()
            .filter(|r| r.owner_id() == owner_id)
            .collect();
        Ok(History::from_records(records))
    }

    /// Every document of kind `D`, in key order.
    pub fn list<D: Document>(&self) -> Result<Vec<D>, LedgerError> {
        self.facade.scan::<D>()
    }
}
