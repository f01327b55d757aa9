//! Substrate and codec errors.

use thiserror::Error;

/// Errors raised by a [`Ledger`](super::Ledger) implementation or while
/// encoding and decoding ledger documents.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The substrate could not serve the request (connection, lock, I/O).
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A value stored under `key` could not be decoded as the expected document.
    #[error("malformed value at key {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// A document or event payload could not be encoded.
    #[error("failed to encode ledger value: {0}")]
    Encode(#[from] serde_json::Error),
}
