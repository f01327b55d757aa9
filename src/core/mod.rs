//! Pure lifecycle core.
//!
//! This module contains the side-effect free building blocks:
//! - Status definitions via the `State` trait
//! - Guard predicates for transition control
//! - Immutable, ordered audit histories
//!
//! Nothing here reads or writes the ledger.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{AuditRecord, History};
pub use state::State;
