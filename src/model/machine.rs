//! Machine-track ledger documents.

use crate::clock::Timestamp;
use crate::core::{AuditRecord, State};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Stopped,
    Running,
    Paused,
    Maintenance,
    Error,
}

impl State for MachineStatus {
    fn name(&self) -> &str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Maintenance => "maintenance",
            Self::Error => "error",
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control mode of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineMode {
    Manual,
    Automatic,
    Emergency,
}

impl MachineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for MachineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-level targets and the running violation tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaCompliance {
    /// Target uptime, percent.
    pub uptime_target: f64,
    pub current_uptime: f64,
    /// Target response time, milliseconds.
    pub response_time_target: f64,
    pub current_response_time: f64,
    #[serde(rename = "lastSLAUpdate")]
    pub last_update: Timestamp,
    /// Never decreases.
    #[serde(rename = "slaViolations")]
    pub violation_count: u64,
    /// Zero until the first violation.
    #[serde(rename = "lastViolation")]
    pub last_violation_at: Timestamp,
}

impl SlaCompliance {
    pub fn new(uptime_target: f64, response_time_target: f64, now: Timestamp) -> Self {
        Self {
            uptime_target,
            current_uptime: 0.0,
            response_time_target,
            current_response_time: 0.0,
            last_update: now,
            violation_count: 0,
            last_violation_at: 0,
        }
    }
}

/// Latest sensor snapshot of a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
    /// Percent.
    pub efficiency: f64,
    /// kWh.
    pub power_consumption: f64,
    /// Units per hour.
    pub throughput: f64,
    #[serde(rename = "lastMetricsUpdate")]
    pub last_update: Timestamp,
}

impl PerformanceMetrics {
    pub fn zeroed(now: Timestamp) -> Self {
        Self::from_reading(&MetricsReading::default(), now)
    }

    pub fn from_reading(reading: &MetricsReading, now: Timestamp) -> Self {
        Self {
            temperature: reading.temperature,
            pressure: reading.pressure,
            vibration: reading.vibration,
            efficiency: reading.efficiency,
            power_consumption: reading.power_consumption,
            throughput: reading.throughput,
            last_update: now,
        }
    }
}

/// Raw metrics as supplied by the sensor bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReading {
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
    pub efficiency: f64,
    pub power_consumption: f64,
    pub throughput: f64,
}

/// Registration details for a new machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRegistration {
    pub machine_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: String,
    pub location: String,
    pub operator: String,
    pub uptime_target: f64,
    pub response_time_target: f64,
}

/// A tracked machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub machine_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: String,
    pub location: String,
    pub status: MachineStatus,
    #[serde(rename = "currentMode")]
    pub mode: MachineMode,
    pub operator: String,
    pub last_state_change: Timestamp,
    pub total_operating_hours: f64,
    pub last_maintenance: Timestamp,
    pub next_maintenance_due: Timestamp,
    pub sla_compliance: SlaCompliance,
    pub performance_metrics: PerformanceMetrics,
}

impl Machine {
    /// A freshly registered machine: stopped, manual, zeroed metrics.
    pub fn register(reg: MachineRegistration, now: Timestamp, maintenance_interval_ms: i64) -> Self {
        Self {
            machine_id: reg.machine_id,
            name: reg.name,
            machine_type: reg.machine_type,
            location: reg.location,
            status: MachineStatus::Stopped,
            mode: MachineMode::Manual,
            operator: reg.operator,
            last_state_change: now,
            total_operating_hours: 0.0,
            last_maintenance: now,
            next_maintenance_due: now.saturating_add(maintenance_interval_ms),
            sla_compliance: SlaCompliance::new(reg.uptime_target, reg.response_time_target, now),
            performance_metrics: PerformanceMetrics::zeroed(now),
        }
    }
}

/// Immutable record of one accepted lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTransition {
    pub transition_id: String,
    pub machine_id: String,
    pub from_status: MachineStatus,
    pub to_status: MachineStatus,
    pub from_mode: MachineMode,
    pub to_mode: MachineMode,
    pub operator: String,
    pub timestamp: Timestamp,
    pub reason: String,
    pub sla_impact: bool,
}

impl AuditRecord for StateTransition {
    fn record_id(&self) -> &str {
        &self.transition_id
    }

    fn owner_id(&self) -> &str {
        &self.machine_id
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenancePriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Request to plan a maintenance window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: Timestamp,
    /// Minutes.
    pub estimated_duration: u32,
    pub assigned_technician: String,
    pub priority: MaintenancePriority,
    pub description: String,
}

/// A planned maintenance window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub maintenance_id: String,
    pub machine_id: String,
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: Timestamp,
    pub estimated_duration: u32,
    pub assigned_technician: String,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
