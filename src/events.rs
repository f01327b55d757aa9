//! Domain events emitted with committed write sets.

use crate::clock::Timestamp;
use crate::compliance::SlaBreach;
use crate::ledger::LedgerEvent;
use crate::model::{
    MachineMode, MaintenancePriority, MaintenanceType, PerformanceMetrics, TraceOperation,
};
use serde::Serialize;

/// Events published by the engines.
///
/// The payload is the variant's fields as camelCase JSON; the event name
/// is carried separately, see [`DomainEvent::name`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum DomainEvent {
    MachineRegistered {
        machine_id: String,
        name: String,
        #[serde(rename = "type")]
        machine_type: String,
        location: String,
        timestamp: Timestamp,
    },
    MachineStarted {
        machine_id: String,
        operator: String,
        mode: MachineMode,
        timestamp: Timestamp,
    },
    MachinePaused {
        machine_id: String,
        operator: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        timestamp: Timestamp,
    },
    MachineResumed {
        machine_id: String,
        operator: String,
        timestamp: Timestamp,
    },
    MachineStopped {
        machine_id: String,
        operator: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        timestamp: Timestamp,
    },
    SlaViolation {
        machine_id: String,
        violation_type: String,
        metrics: PerformanceMetrics,
        breaches: Vec<SlaBreach>,
        timestamp: Timestamp,
    },
    MaintenanceScheduled {
        machine_id: String,
        maintenance_type: MaintenanceType,
        scheduled_date: Timestamp,
        assigned_technician: String,
        priority: MaintenancePriority,
        timestamp: Timestamp,
    },
    TraceRecorded {
        trace_id: String,
        batch_id: String,
        operation: TraceOperation,
        timestamp: Timestamp,
        trace_hash: String,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MachineRegistered { .. } => "MachineRegistered",
            Self::MachineStarted { .. } => "MachineStarted",
            Self::MachinePaused { .. } => "MachinePaused",
            Self::MachineResumed { .. } => "MachineResumed",
            Self::MachineStopped { .. } => "MachineStopped",
            Self::SlaViolation { .. } => "SLAViolation",
            Self::MaintenanceScheduled { .. } => "MaintenanceScheduled",
            Self::TraceRecorded { .. } => "TraceRecorded",
        }
    }

    pub fn to_ledger_event(&self) -> Result<LedgerEvent, serde_json::Error> {
        Ok(LedgerEvent::new(self.name(), serde_json::to_vec(self)?))
    }
}
