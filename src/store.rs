//! Existence-checked persistence for machines and batches.

use crate::error::{Result, TrackError};
use crate::ledger::{Ledger, LedgerFacade, WriteSet};
use crate::model::Document;
use std::marker::PhantomData;

/// Keyed store for one entity kind.
///
/// `create` refuses to overwrite, `load` refuses to invent, `save`
/// overwrites unconditionally (last-writer-wins). The `stage_*` variants
/// add the write to a [`WriteSet`] instead of committing it, so an engine
/// can persist the entity together with its audit record and event.
pub struct EntityStore<E: Document, L: Ledger + ?Sized> {
    facade: LedgerFacade<L>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Document, L: Ledger + ?Sized> Clone for EntityStore<E, L> {
    fn clone(&self) -> Self {
        Self::new(self.facade.clone())
    }
}

impl<E: Document, L: Ledger + ?Sized> EntityStore<E, L> {
    pub fn new(facade: LedgerFacade<L>) -> Self {
        Self {
            facade,
            _entity: PhantomData,
        }
    }

    fn kind() -> &'static str {
        E::KIND.label()
    }

    pub fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.facade.contains::<E>(id)?)
    }

    pub fn load(&self, id: &str) -> Result<E> {
        self.facade
            .fetch::<E>(id)?
            .ok_or_else(|| TrackError::NotFound {
                kind: Self::kind(),
                id: id.to_string(),
            })
    }

    pub fn create(&self, entity: &E) -> Result<()> {
        let mut writes = WriteSet::new();
        self.stage_create(&mut writes, entity)?;
        Ok(self.facade.commit(writes)?)
    }

    /// Check that the id is free and stage the initial write.
    pub fn stage_create(&self, writes: &mut WriteSet, entity: &E) -> Result<()> {
        let id = entity.document_id();
        if self.exists(id)? {
            return Err(TrackError::AlreadyExists {
                kind: Self::kind(),
                id: id.to_string(),
            });
        }
        Ok(writes.put_document(entity)?)
    }

    pub fn save(&self, entity: &E) -> Result<()> {
        let mut writes = WriteSet::new();
        self.stage_save(&mut writes, entity)?;
        Ok(self.facade.commit(writes)?)
    }

    pub fn stage_save(&self, writes: &mut WriteSet, entity: &E) -> Result<()> {
        Ok(writes.put_document(entity)?)
    }

    /// Every stored entity of this kind, in key order.
    pub fn list(&self) -> Result<Vec<E>> {
        Ok(self.facade.scan::<E>()?)
    }
}
