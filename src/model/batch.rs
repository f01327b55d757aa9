//! Batch-track ledger documents.

use crate::clock::Timestamp;
use crate::core::{AuditRecord, State};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Active,
    Completed,
    Cancelled,
}

impl State for BatchStatus {
    fn name(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A material batch moving through production.
///
/// `current_quantity` never exceeds `total_quantity` and only decreases,
/// through recorded outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch_id: String,
    pub material_type: String,
    pub supplier: String,
    pub total_quantity: u64,
    pub current_quantity: u64,
    pub status: BatchStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Batch {
    pub fn new(
        batch_id: impl Into<String>,
        material_type: impl Into<String>,
        supplier: impl Into<String>,
        total_quantity: u64,
        now: Timestamp,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            material_type: material_type.into(),
            supplier: supplier.into(),
            total_quantity,
            current_quantity: total_quantity,
            status: BatchStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BatchStatus::Active
    }
}

/// Kind of operation a trace records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOperation {
    Input,
    Output,
    Transfer,
    QualityCheck,
}

impl TraceOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Transfer => "transfer",
            Self::QualityCheck => "quality_check",
        }
    }
}

impl fmt::Display for TraceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environmental readings captured by a quality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityData {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub quality_status: String,
}

/// Immutable record of one operation on a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTrace {
    pub trace_id: String,
    pub batch_id: String,
    pub operation: TraceOperation,
    pub quantity: u64,
    pub from_location: String,
    pub to_location: String,
    pub process_id: String,
    pub operator: String,
    pub timestamp: Timestamp,
    /// SHA-256 hex over the hashed fields, see [`crate::compliance::integrity`].
    pub trace_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_data: Option<QualityData>,
}

impl AuditRecord for ProcessTrace {
    fn record_id(&self) -> &str {
        &self.trace_id
    }

    fn owner_id(&self) -> &str {
        &self.batch_id
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// A physical movement of material: input, output or transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialMovement {
    pub quantity: u64,
    pub from_location: String,
    pub to_location: String,
    pub process_id: String,
    pub operator: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MaterialMovement {
    pub fn new(
        quantity: u64,
        from_location: impl Into<String>,
        to_location: impl Into<String>,
        process_id: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            quantity,
            from_location: from_location.into(),
            to_location: to_location.into(),
            process_id: process_id.into(),
            operator: operator.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Readings and verdict of a quality inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityInspection {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub quality_status: String,
    pub operator: String,
    #[serde(default)]
    pub notes: Option<String>,
}
