//! Derived record ids.
//!
//! Ids embed the owning entity, the action and the mutation timestamp,
//! followed by eight hex characters of a random UUID so that two records
//! created in the same millisecond never share a key.

use crate::clock::Timestamp;
use uuid::Uuid;

fn suffix() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(8);
    simple
}

pub fn transition_id(machine_id: &str, action: &str, at: Timestamp) -> String {
    format!("{machine_id}_{action}_{at}_{}", suffix())
}

pub fn maintenance_id(machine_id: &str, at: Timestamp) -> String {
    format!("maintenance_{machine_id}_{at}_{}", suffix())
}

pub fn trace_id(batch_id: &str, operation: &str, at: Timestamp) -> String {
    format!("{batch_id}_{operation}_{at}_{}", suffix())
}
