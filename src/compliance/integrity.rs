//! Content hashes binding a trace's fields together.
//!
//! The digest is SHA-256 over the plain concatenation of batch id,
//! operation, quantity, source location, destination location and
//! timestamp (decimal, no separators), rendered as lowercase hex.

use crate::clock::Timestamp;
use crate::model::{ProcessTrace, TraceOperation};
use sha2::{Digest, Sha256};

/// Compute the integrity hash for a trace's fields.
///
/// # Example
///
/// ```rust
/// use plantledger::compliance::integrity::trace_hash;
/// use plantledger::model::TraceOperation;
///
/// let hash = trace_hash("B1", TraceOperation::Input, 500, "Store1", "Plant1", 1_700_000_000_000);
/// assert_eq!(hash.len(), 64);
/// ```
pub fn trace_hash(
    batch_id: &str,
    operation: TraceOperation,
    quantity: u64,
    from_location: &str,
    to_location: &str,
    timestamp: Timestamp,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(batch_id.as_bytes());
    hasher.update(operation.as_str().as_bytes());
    hasher.update(quantity.to_string().as_bytes());
    hasher.update(from_location.as_bytes());
    hasher.update(to_location.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Recompute the hash from a trace's stored fields.
pub fn recompute(trace: &ProcessTrace) -> String {
    trace_hash(
        &trace.batch_id,
        trace.operation,
        trace.quantity,
        &trace.from_location,
        &trace.to_location,
        trace.timestamp,
    )
}

/// Whether the stored hash still matches the stored fields.
pub fn verify(trace: &ProcessTrace) -> bool {
    recompute(trace) == trace.trace_hash
}

/// Traces whose stored hash no longer matches their fields.
pub fn tampered<'a>(traces: impl IntoIterator<Item = &'a ProcessTrace>) -> Vec<&'a ProcessTrace> {
    traces.into_iter().filter(|t| !verify(t)).collect()
}
