//! Errors surfaced by entity stores and lifecycle engines.

use crate::ledger::LedgerError;
use crate::model::BatchStatus;
use thiserror::Error;

/// Failure of a lifecycle operation.
///
/// Every variant names the offending entity. Nothing is retried
/// internally, and a failed operation leaves the ledger untouched.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Creation of an id that is already present.
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: String },

    /// Lookup of an id that is absent.
    #[error("{kind} {id} does not exist")]
    NotFound { kind: &'static str, id: String },

    /// A lifecycle guard rejected the requested transition.
    #[error("{kind} {id} {reason}")]
    Conflict {
        kind: &'static str,
        id: String,
        reason: String,
    },

    /// An output asked for more material than the batch holds.
    #[error("insufficient quantity in batch {batch_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        batch_id: String,
        requested: u64,
        available: u64,
    },

    /// The batch is not `active`.
    #[error("batch {batch_id} is not active (status: {status})")]
    InvalidState { batch_id: String, status: BatchStatus },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl TrackError {
    /// Whether the error stems from the caller's request rather than the substrate.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Ledger(_))
    }
}

pub type Result<T, E = TrackError> = std::result::Result<T, E>;
