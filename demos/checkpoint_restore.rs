//! Checkpoint and Restore
//!
//! This example snapshots a working ledger and resumes work on a restored copy.
//!
//! Key concepts:
//! - A checkpoint captures every key and value at one instant
//! - JSON for readability, binary for compactness
//! - Checkpoints carry a format version that is checked on load
//! - Engines run unchanged on top of a restored ledger
//!
//! Run with: cargo run --example checkpoint_restore

use plantledger::checkpoint::LedgerCheckpoint;
use plantledger::ledger::InMemoryLedger;
use plantledger::model::MaterialMovement;
use plantledger::ProcessTracer;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint and Restore Example ===\n");

    let ledger = Arc::new(InMemoryLedger::new());
    let tracer = ProcessTracer::new(Arc::clone(&ledger));

    tracer.create_batch("RESIN-7", "epoxy resin", "ChemCo", 200)?;
    tracer.record_output(
        "RESIN-7",
        MaterialMovement::new(50, "Tank 1", "Mixer", "MIXING", "gina"),
    )?;

    let checkpoint = ledger.checkpoint()?;
    let json = checkpoint.to_json()?;
    let bytes = checkpoint.to_bytes()?;
    println!(
        "Checkpoint {} (version {}): {} entries",
        checkpoint.id,
        checkpoint.version,
        checkpoint.entries.len()
    );
    println!("  JSON size:   {} bytes", json.len());
    println!("  Binary size: {} bytes\n", bytes.len());

    // Simulate a restart: rebuild from the binary snapshot
    let restored = Arc::new(InMemoryLedger::restore(LedgerCheckpoint::from_bytes(
        &bytes,
    )?)?);
    let resumed = ProcessTracer::new(Arc::clone(&restored));

    let batch = resumed.batch("RESIN-7")?;
    println!(
        "Resumed batch {}: {}/{} remaining",
        batch.batch_id, batch.current_quantity, batch.total_quantity
    );

    resumed.record_output(
        "RESIN-7",
        MaterialMovement::new(150, "Tank 1", "Mixer", "MIXING", "gina"),
    )?;
    let batch = resumed.batch("RESIN-7")?;
    println!(
        "After final output: {} remaining ({})",
        batch.current_quantity, batch.status
    );
    println!(
        "Traces on restored ledger: {}",
        resumed.trace_history("RESIN-7")?.len()
    );
    println!(
        "Traces on original ledger: {}",
        tracer.trace_history("RESIN-7")?.len()
    );

    // A checkpoint from a newer format is refused
    let mut future = checkpoint.clone();
    future.version += 1;
    if let Err(err) = LedgerCheckpoint::from_json(&future.to_json()?) {
        println!("\nLoading future checkpoint failed: {err}");
    }

    Ok(())
}
