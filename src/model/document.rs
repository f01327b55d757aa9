//! Tagged ledger documents and their key layout.
//!
//! Every value written to the ledger is a [`LedgerDocument`]: JSON with an
//! explicit `docType` discriminant. Each kind also lives under its own key
//! prefix, so scans are prefix-bounded and decoding never guesses a shape.

use super::batch::{Batch, ProcessTrace};
use super::machine::{Machine, MaintenanceSchedule, StateTransition};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Machine,
    Transition,
    Maintenance,
    Batch,
    Trace,
}

impl DocumentKind {
    /// Label used in messages and as the key namespace.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Machine => "machine",
            Self::Transition => "transition",
            Self::Maintenance => "maintenance",
            Self::Batch => "batch",
            Self::Trace => "trace",
        }
    }

    /// Key prefix shared by every document of this kind.
    pub fn prefix(&self) -> String {
        format!("{}/", self.label())
    }

    /// Ledger key of the document with the given id.
    pub fn key(&self, id: &str) -> String {
        format!("{}/{}", self.label(), id)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Envelope for everything persisted on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "docType", rename_all = "snake_case")]
pub enum LedgerDocument {
    Machine(Machine),
    Transition(StateTransition),
    Maintenance(MaintenanceSchedule),
    Batch(Batch),
    Trace(ProcessTrace),
}

impl LedgerDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Machine(_) => DocumentKind::Machine,
            Self::Transition(_) => DocumentKind::Transition,
            Self::Maintenance(_) => DocumentKind::Maintenance,
            Self::Batch(_) => DocumentKind::Batch,
            Self::Trace(_) => DocumentKind::Trace,
        }
    }
}

/// A type that can be stored as one kind of [`LedgerDocument`].
pub trait Document: Clone {
    const KIND: DocumentKind;

    fn document_id(&self) -> &str;

    fn into_document(self) -> LedgerDocument;

    /// The inner value if `doc` is of this kind.
    fn from_document(doc: LedgerDocument) -> Option<Self>;

    fn key(&self) -> String {
        Self::KIND.key(self.document_id())
    }
}

macro_rules! impl_document {
    ($ty:ty, $variant:ident, $id:ident) => {
        impl Document for $ty {
            const KIND: DocumentKind = DocumentKind::$variant;

            fn document_id(&self) -> &str {
                &self.$id
            }

            fn into_document(self) -> LedgerDocument {
                LedgerDocument::$variant(self)
            }

            fn from_document(doc: LedgerDocument) -> Option<Self> {
                match doc {
                    LedgerDocument::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_document!(Machine, Machine, machine_id);
impl_document!(StateTransition, Transition, transition_id);
impl_document!(MaintenanceSchedule, Maintenance, maintenance_id);
impl_document!(Batch, Batch, batch_id);
impl_document!(ProcessTrace, Trace, trace_id);
