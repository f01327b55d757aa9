//! Lifecycle state trait shared by machine and batch statuses.
//!
//! Entity statuses are plain values; inspecting them never touches the ledger.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A status an entity can be in.
///
/// Implemented by [`MachineStatus`](crate::model::MachineStatus) and
/// [`BatchStatus`](crate::model::BatchStatus). The `name` is the wire form
/// written to the ledger and used in error messages.
///
/// # Example
///
/// ```rust
/// use plantledger::core::State;
/// use plantledger::model::{BatchStatus, MachineStatus};
///
/// assert_eq!(MachineStatus::Running.name(), "running");
/// assert!(MachineStatus::Error.is_error());
/// assert!(BatchStatus::Completed.is_final());
/// assert!(!BatchStatus::Active.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Wire name of the status.
    fn name(&self) -> &str;

    /// Whether no further lifecycle operation is accepted from this status.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether this status represents a fault.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
