//! Entities, audit records and request types stored on the ledger.

mod batch;
mod document;
mod machine;

pub use batch::{
    Batch, BatchStatus, MaterialMovement, ProcessTrace, QualityData, QualityInspection,
    TraceOperation,
};
pub use document::{Document, DocumentKind, LedgerDocument};
pub use machine::{
    Machine, MachineMode, MachineRegistration, MachineStatus, MaintenancePriority,
    MaintenanceRequest, MaintenanceSchedule, MaintenanceStatus, MaintenanceType,
    MetricsReading, PerformanceMetrics, SlaCompliance, StateTransition,
};
