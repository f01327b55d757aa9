//! Snapshot and restore for the in-memory ledger.
//!
//! A checkpoint captures every key and value at one instant, so a test
//! fixture or a replay can be rebuilt without re-running the operations
//! that produced it. Emitted events are not part of a checkpoint.

use crate::ledger::InMemoryLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable copy of a ledger's keyspace.
///
/// # Example
///
/// ```rust
/// use plantledger::checkpoint::LedgerCheckpoint;
/// use plantledger::ledger::{InMemoryLedger, Ledger};
///
/// let ledger = InMemoryLedger::new();
/// ledger.put("batch/B1", b"{}".to_vec()).unwrap();
///
/// let bytes = ledger.checkpoint().unwrap().to_bytes().unwrap();
/// let restored = InMemoryLedger::restore(LedgerCheckpoint::from_bytes(&bytes).unwrap()).unwrap();
/// assert_eq!(restored.get("batch/B1").unwrap(), Some(b"{}".to_vec()));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub taken_at: DateTime<Utc>,

    pub entries: BTreeMap<String, Vec<u8>>,
}

impl LedgerCheckpoint {
    pub fn new(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(raw)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version == CHECKPOINT_VERSION {
            Ok(())
        } else {
            Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            })
        }
    }
}

impl InMemoryLedger {
    /// Copy the current keyspace into a checkpoint.
    pub fn checkpoint(&self) -> Result<LedgerCheckpoint, CheckpointError> {
        let checkpoint = LedgerCheckpoint::new(self.entries()?);
        tracing::debug!(id = %checkpoint.id, entries = checkpoint.entries.len(), "ledger checkpoint taken");
        Ok(checkpoint)
    }

    /// Build a ledger holding exactly the checkpoint's entries.
    pub fn restore(checkpoint: LedgerCheckpoint) -> Result<Self, CheckpointError> {
        checkpoint.check_version()?;
        tracing::debug!(id = %checkpoint.id, entries = checkpoint.entries.len(), "ledger restored");
        Ok(Self::from_entries(checkpoint.entries))
    }
}
