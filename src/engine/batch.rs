//! Material provenance engine.

use super::ids;
use crate::clock::{Clock, SystemClock, Timestamp};
use crate::compliance::{integrity, quantity};
use crate::core::History;
use crate::error::Result;
use crate::events::DomainEvent;
use crate::ledger::{Ledger, LedgerFacade, WriteSet};
use crate::model::{
    Batch, BatchStatus, MaterialMovement, ProcessTrace, QualityData, QualityInspection,
    TraceOperation,
};
use crate::reconstruct::HistoryReconstructor;
use crate::store::EntityStore;
use std::sync::Arc;
use tracing::info;

/// Process id stamped on quality-check traces.
pub const QUALITY_CONTROL_PROCESS: &str = "quality_control";

/// Creates batches and records what happens to them.
///
/// Every recorded operation appends a hashed [`ProcessTrace`] and emits
/// `TraceRecorded`. Only outputs change the batch quantity; an output that
/// empties the batch completes it.
///
/// # Example
///
/// ```rust
/// use plantledger::compliance::integrity;
/// use plantledger::engine::ProcessTracer;
/// use plantledger::ledger::InMemoryLedger;
/// use plantledger::model::{BatchStatus, MaterialMovement};
/// use std::sync::Arc;
///
/// let tracer = ProcessTracer::new(Arc::new(InMemoryLedger::new()));
/// tracer.create_batch("B1", "steel", "Supplier1", 100)?;
///
/// let trace = tracer.record_output("B1", MaterialMovement::new(100, "Line1", "Store2", "P1", "op1"))?;
/// assert!(integrity::verify(&trace));
/// assert_eq!(tracer.batch("B1")?.status, BatchStatus::Completed);
/// # Ok::<(), plantledger::TrackError>(())
/// ```
pub struct ProcessTracer<L: Ledger + ?Sized> {
    facade: LedgerFacade<L>,
    batches: EntityStore<Batch, L>,
    history: HistoryReconstructor<L>,
    clock: Arc<dyn Clock>,
}

impl<L: Ledger + ?Sized> ProcessTracer<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        let facade = LedgerFacade::new(ledger);
        Self {
            batches: EntityStore::new(facade.clone()),
            history: HistoryReconstructor::new(facade.clone()),
            facade,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create an active batch holding its full quantity. Emits no event.
    pub fn create_batch(
        &self,
        batch_id: &str,
        material_type: &str,
        supplier: &str,
        total_quantity: u64,
    ) -> Result<Batch> {
        let now = self.clock.now_millis();
        let batch = Batch::new(batch_id, material_type, supplier, total_quantity, now);
        self.batches.create(&batch)?;

        info!(batch_id, material_type, supplier, total_quantity, "batch created");
        Ok(batch)
    }

    /// Record material entering the process. The quantity is kept as observed.
    pub fn record_input(&self, batch_id: &str, movement: MaterialMovement) -> Result<ProcessTrace> {
        self.record_movement(batch_id, TraceOperation::Input, movement)
    }

    /// Record material leaving the batch.
    ///
    /// Fails with `InsufficientQuantity` when the batch holds less than
    /// requested. Reaching exactly zero completes the batch.
    pub fn record_output(&self, batch_id: &str, movement: MaterialMovement) -> Result<ProcessTrace> {
        self.record_movement(batch_id, TraceOperation::Output, movement)
    }

    pub fn record_transfer(
        &self,
        batch_id: &str,
        movement: MaterialMovement,
    ) -> Result<ProcessTrace> {
        self.record_movement(batch_id, TraceOperation::Transfer, movement)
    }

    /// Record an inspection. Hashed with zero quantity and no locations.
    pub fn record_quality_check(
        &self,
        batch_id: &str,
        inspection: QualityInspection,
    ) -> Result<ProcessTrace> {
        let batch = self.batches.load(batch_id)?;
        quantity::ensure_active(&batch)?;

        let now = self.clock.now_millis();
        let trace = new_trace(
            batch_id,
            TraceOperation::QualityCheck,
            0,
            String::new(),
            String::new(),
            QUALITY_CONTROL_PROCESS.to_string(),
            inspection.operator,
            now,
            inspection.notes,
            Some(QualityData {
                temperature: inspection.temperature,
                humidity: inspection.humidity,
                pressure: inspection.pressure,
                quality_status: inspection.quality_status,
            }),
        );

        let mut writes = WriteSet::new();
        stage_trace(&mut writes, &trace)?;
        self.facade.commit(writes)?;

        log_trace(&trace);
        Ok(trace)
    }

    fn record_movement(
        &self,
        batch_id: &str,
        operation: TraceOperation,
        movement: MaterialMovement,
    ) -> Result<ProcessTrace> {
        let mut batch = self.batches.load(batch_id)?;
        let withdrawal = match operation {
            TraceOperation::Output => Some(quantity::withdraw(&batch, movement.quantity)?),
            _ => {
                quantity::ensure_active(&batch)?;
                None
            }
        };

        let now = self.clock.now_millis();
        let trace = new_trace(
            batch_id,
            operation,
            movement.quantity,
            movement.from_location,
            movement.to_location,
            movement.process_id,
            movement.operator,
            now,
            movement.notes,
            None,
        );

        let mut writes = WriteSet::new();
        if let Some(withdrawal) = withdrawal {
            batch.current_quantity = withdrawal.remaining;
            if withdrawal.exhausted {
                batch.status = BatchStatus::Completed;
            }
            batch.updated_at = now;
            self.batches.stage_save(&mut writes, &batch)?;
        }
        stage_trace(&mut writes, &trace)?;
        self.facade.commit(writes)?;

        log_trace(&trace);
        if batch.status == BatchStatus::Completed {
            info!(batch_id, "batch completed");
        }
        Ok(trace)
    }

    pub fn batch(&self, batch_id: &str) -> Result<Batch> {
        self.batches.load(batch_id)
    }

    pub fn batches(&self) -> Result<Vec<Batch>> {
        self.batches.list()
    }

    pub fn batch_exists(&self, batch_id: &str) -> Result<bool> {
        self.batches.exists(batch_id)
    }

    /// Traces of one batch, oldest first.
    pub fn trace_history(&self, batch_id: &str) -> Result<History<ProcessTrace>> {
        Ok(self.history.history::<ProcessTrace>(batch_id)?)
    }
}

#[allow(clippy::too_many_arguments)]
fn new_trace(
    batch_id: &str,
    operation: TraceOperation,
    quantity: u64,
    from_location: String,
    to_location: String,
    process_id: String,
    operator: String,
    timestamp: Timestamp,
    notes: Option<String>,
    quality_data: Option<QualityData>,
) -> ProcessTrace {
    let trace_hash = integrity::trace_hash(
        batch_id,
        operation,
        quantity,
        &from_location,
        &to_location,
        timestamp,
    );
    ProcessTrace {
        trace_id: ids::trace_id(batch_id, operation.as_str(), timestamp),
        batch_id: batch_id.to_string(),
        operation,
        quantity,
        from_location,
        to_location,
        process_id,
        operator,
        timestamp,
        trace_hash,
        notes,
        quality_data,
    }
}

fn stage_trace(writes: &mut WriteSet, trace: &ProcessTrace) -> Result<()> {
    writes.put_document(trace)?;
    writes.emit_domain(&DomainEvent::TraceRecorded {
        trace_id: trace.trace_id.clone(),
        batch_id: trace.batch_id.clone(),
        operation: trace.operation,
        timestamp: trace.timestamp,
        trace_hash: trace.trace_hash.clone(),
    })?;
    Ok(())
}

fn log_trace(trace: &ProcessTrace) {
    info!(
        batch_id = %trace.batch_id,
        trace_id = %trace.trace_id,
        operation = %trace.operation,
        quantity = trace.quantity,
        "trace recorded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::TrackError;
    use crate::ledger::InMemoryLedger;

    fn setup() -> (Arc<InMemoryLedger>, ProcessTracer<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let tracer = ProcessTracer::new(Arc::clone(&ledger))
            .with_clock(Arc::new(ManualClock::ticking(1_000, 10)));
        (ledger, tracer)
    }

    fn movement(quantity: u64) -> MaterialMovement {
        MaterialMovement::new(quantity, "Store1", "Line1", "PROC001", "op1")
    }

    #[test]
    fn create_batch_emits_nothing() {
        let (ledger, tracer) = setup();
        let batch = tracer.create_batch("B1", "steel", "S1", 1_000).unwrap();

        assert_eq!(batch.current_quantity, 1_000);
        assert!(tracer.batch_exists("B1").unwrap());
        assert!(ledger.events().unwrap().is_empty());
    }

    #[test]
    fn duplicate_batch_is_rejected() {
        let (_, tracer) = setup();
        tracer.create_batch("B1", "steel", "S1", 1_000).unwrap();
        let err = tracer.create_batch("B1", "steel", "S1", 5).unwrap_err();
        assert!(matches!(err, TrackError::AlreadyExists { kind: "batch", .. }));
    }

    #[test]
    fn input_and_transfer_keep_quantity() {
        let (_, tracer) = setup();
        tracer.create_batch("B1", "steel", "S1", 1_000).unwrap();

        tracer.record_input("B1", movement(400)).unwrap();
        tracer.record_transfer("B1", movement(250)).unwrap();

        let batch = tracer.batch("B1").unwrap();
        assert_eq!(batch.current_quantity, 1_000);
        assert_eq!(batch.updated_at, batch.created_at);
    }

    #[test]
    fn output_to_zero_completes_and_blocks_further_operations() {
        let (_, tracer) = setup();
        tracer.create_batch("B1", "steel", "S1", 500).unwrap();
        tracer.record_output("B1", movement(500)).unwrap();

        let batch = tracer.batch("B1").unwrap();
        assert_eq!(batch.current_quantity, 0);
        assert_eq!(batch.status, BatchStatus::Completed);

        for err in [
            tracer.record_output("B1", movement(1)).unwrap_err(),
            tracer.record_input("B1", movement(1)).unwrap_err(),
        ] {
            assert!(matches!(err, TrackError::InvalidState { .. }));
        }
    }

    #[test]
    fn failed_output_writes_nothing() {
        let (ledger, tracer) = setup();
        tracer.create_batch("B1", "steel", "S1", 100).unwrap();
        let before = ledger.len().unwrap();

        tracer.record_output("B1", movement(101)).unwrap_err();
        assert_eq!(ledger.len().unwrap(), before);
        assert!(ledger.events().unwrap().is_empty());
    }

    #[test]
    fn quality_check_is_hashed_without_quantity() {
        let (ledger, tracer) = setup();
        tracer.create_batch("B1", "steel", "S1", 100).unwrap();

        let trace = tracer
            .record_quality_check(
                "B1",
                QualityInspection {
                    temperature: 21.5,
                    humidity: 40.0,
                    pressure: 1.0,
                    quality_status: "passed".to_string(),
                    operator: "qa1".to_string(),
                    notes: Some("visual ok".to_string()),
                },
            )
            .unwrap();

        assert_eq!(trace.quantity, 0);
        assert_eq!(trace.process_id, QUALITY_CONTROL_PROCESS);
        assert_eq!(
            trace.trace_hash,
            integrity::trace_hash("B1", TraceOperation::QualityCheck, 0, "", "", trace.timestamp)
        );
        assert_eq!(trace.quality_data.unwrap().quality_status, "passed");
        assert_eq!(ledger.events().unwrap()[0].name, "TraceRecorded");
    }

    #[test]
    fn traces_keep_notes_and_verify() {
        let (_, tracer) = setup();
        tracer.create_batch("B1", "steel", "S1", 100).unwrap();
        let trace = tracer
            .record_input("B1", movement(10).with_notes("pallet 3"))
            .unwrap();

        assert_eq!(trace.notes.as_deref(), Some("pallet 3"));
        assert!(trace.trace_id.starts_with("B1_input_"));
        assert!(integrity::verify(&trace));
    }

    #[test]
    fn missing_batch_is_not_found() {
        let (_, tracer) = setup();
        let err = tracer.record_input("nope", movement(1)).unwrap_err();
        assert!(matches!(err, TrackError::NotFound { kind: "batch", .. }));
    }
}
