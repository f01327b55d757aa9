//! Lifecycle engines over the ledger.
//!
//! [`MachineCoordinator`] runs the machine state machine and SLA
//! derivation; [`ProcessTracer`] runs batch provenance. Both read through
//! the entity store, validate, and commit entity, audit record and event
//! as one write set.

mod batch;
pub mod ids;
mod lifecycle;
mod machine;

pub use batch::{ProcessTracer, QUALITY_CONTROL_PROCESS};
pub use lifecycle::{Lifecycle, LifecycleRule, MachineAction, ModeChange, TransitionPlan};
pub use machine::MachineCoordinator;
