//! Batch Provenance
//!
//! This example records the movements of a material batch and audits them.
//!
//! Key concepts:
//! - Every trace is stamped with a SHA-256 integrity hash
//! - Outputs withdraw quantity; a batch that reaches zero is completed
//! - Overdrawing fails without writing anything
//! - Editing a stored trace is caught by recomputing its hash
//!
//! Run with: cargo run --example batch_provenance

use plantledger::clock::ManualClock;
use plantledger::compliance::integrity;
use plantledger::ledger::{InMemoryLedger, Ledger, WriteSet};
use plantledger::model::{MaterialMovement, ProcessTrace, QualityInspection};
use plantledger::ProcessTracer;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Batch Provenance Example ===\n");

    let ledger = Arc::new(InMemoryLedger::new());
    let tracer = ProcessTracer::new(Arc::clone(&ledger))
        .with_clock(Arc::new(ManualClock::ticking(1_700_000_000_000, 1)));

    let batch = tracer.create_batch("STEEL-042", "steel coil", "Northern Mills", 1000)?;
    println!(
        "Created batch {} with {} units of {}\n",
        batch.batch_id, batch.total_quantity, batch.material_type
    );

    tracer.record_input(
        "STEEL-042",
        MaterialMovement::new(1000, "Dock 3", "Warehouse", "RECEIVING", "carol"),
    )?;
    tracer.record_transfer(
        "STEEL-042",
        MaterialMovement::new(1000, "Warehouse", "Line 1", "STAGING", "carol"),
    )?;
    tracer.record_quality_check(
        "STEEL-042",
        QualityInspection {
            temperature: 21.5,
            humidity: 40.0,
            pressure: 1.01,
            quality_status: "passed".to_string(),
            operator: "qa-dave".to_string(),
            notes: Some("surface clean".to_string()),
        },
    )?;
    tracer.record_output(
        "STEEL-042",
        MaterialMovement::new(600, "Line 1", "Press", "STAMPING", "erin"),
    )?;

    if let Err(err) = tracer.record_output(
        "STEEL-042",
        MaterialMovement::new(500, "Line 1", "Press", "STAMPING", "erin"),
    ) {
        println!("Overdraw rejected: {err}");
    }

    let remaining = tracer.batch("STEEL-042")?;
    println!(
        "Remaining: {}/{} ({})\n",
        remaining.current_quantity, remaining.total_quantity, remaining.status
    );

    let history = tracer.trace_history("STEEL-042")?;
    println!("Trace history:");
    for trace in history.records() {
        println!(
            "  {} {} {} -> {} [{}...]",
            trace.operation,
            trace.quantity,
            trace.from_location,
            trace.to_location,
            &trace.trace_hash[..12]
        );
    }
    println!(
        "  Tampered traces: {}\n",
        integrity::tampered(history.records()).len()
    );

    // Rewrite one stored trace behind the engine's back
    let original = &history.records()[3];
    let forged = ProcessTrace {
        quantity: 6,
        ..original.clone()
    };
    let mut writes = WriteSet::new();
    writes.put_document(&forged)?;
    ledger.commit(writes)?;

    let history = tracer.trace_history("STEEL-042")?;
    for trace in integrity::tampered(history.records()) {
        println!(
            "Tampered: {} (stored {}, recomputed {})",
            trace.trace_id,
            &trace.trace_hash[..12],
            &integrity::recompute(trace)[..12]
        );
    }

    Ok(())
}
