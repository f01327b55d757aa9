//! Quantity conservation for batches.

use crate::error::{Result, TrackError};
use crate::model::Batch;

/// Result of taking material out of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    pub remaining: u64,
    /// The batch is now empty and completes.
    pub exhausted: bool,
}

/// Reject operations on batches that are not `active`.
pub fn ensure_active(batch: &Batch) -> Result<()> {
    if batch.is_active() {
        Ok(())
    } else {
        Err(TrackError::InvalidState {
            batch_id: batch.batch_id.clone(),
            status: batch.status,
        })
    }
}

/// Plan an output of `quantity` from `batch`.
///
/// Fails with `InvalidState` for inactive batches and with
/// `InsufficientQuantity` when the batch holds less than requested.
pub fn withdraw(batch: &Batch, quantity: u64) -> Result<Withdrawal> {
    ensure_active(batch)?;

    let remaining = batch
        .current_quantity
        .checked_sub(quantity)
        .ok_or_else(|| TrackError::InsufficientQuantity {
            batch_id: batch.batch_id.clone(),
            requested: quantity,
            available: batch.current_quantity,
        })?;

    Ok(Withdrawal {
        remaining,
        exhausted: remaining == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BatchStatus;

    fn batch(current: u64) -> Batch {
        let mut batch = Batch::new("B1", "steel", "S", 1_000, 0);
        batch.current_quantity = current;
        batch
    }

    #[test]
    fn partial_withdrawal_keeps_batch_open() {
        let w = withdraw(&batch(1_000), 300).unwrap();
        assert_eq!(w, Withdrawal { remaining: 700, exhausted: false });
    }

    #[test]
    fn exact_withdrawal_exhausts() {
        let w = withdraw(&batch(250), 250).unwrap();
        assert!(w.exhausted);
        assert_eq!(w.remaining, 0);
    }

    #[test]
    fn overdraw_is_insufficient_quantity() {
        let err = withdraw(&batch(1_000), 1_200).unwrap_err();
        assert!(matches!(
            err,
            TrackError::InsufficientQuantity {
                requested: 1_200,
                available: 1_000,
                ..
            }
        ));
    }

    #[test]
    fn inactive_batch_is_checked_before_quantity() {
        let mut b = batch(0);
        b.status = BatchStatus::Completed;

        let err = withdraw(&b, 10).unwrap_err();
        assert!(matches!(err, TrackError::InvalidState { status: BatchStatus::Completed, .. }));
    }
}
