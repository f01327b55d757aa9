//! Machine Lifecycle
//!
//! This example drives one machine through the full operating cycle.
//!
//! Key concepts:
//! - Registration creates a stopped machine in manual mode
//! - Start, pause, resume and stop are checked against the transition table
//! - A rejected action writes nothing to the ledger
//! - The transition history is rebuilt from the ledger, ordered by time
//!
//! Run with: cargo run --example machine_lifecycle

use plantledger::clock::ManualClock;
use plantledger::ledger::InMemoryLedger;
use plantledger::model::{MachineMode, MachineRegistration};
use plantledger::MachineCoordinator;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Machine Lifecycle Example ===\n");

    let ledger = Arc::new(InMemoryLedger::new());
    let clock = Arc::new(ManualClock::ticking(1_700_000_000_000, 1));
    let coordinator = MachineCoordinator::new(Arc::clone(&ledger)).with_clock(clock.clone());

    let machine = coordinator.register(MachineRegistration {
        machine_id: "PRESS-01".to_string(),
        name: "Hydraulic press".to_string(),
        machine_type: "press".to_string(),
        location: "Hall A".to_string(),
        operator: "alice".to_string(),
        uptime_target: 95.0,
        response_time_target: 1000.0,
    })?;
    println!(
        "Registered {} ({}, {})",
        machine.machine_id, machine.status, machine.mode
    );
    println!(
        "  Allowed actions: {:?}\n",
        coordinator.allowed_actions("PRESS-01")?
    );

    coordinator.start("PRESS-01", "alice", Some(MachineMode::Automatic))?;
    clock.advance(2 * 3_600_000);
    coordinator.pause("PRESS-01", "alice", Some("die change"))?;

    coordinator.resume("PRESS-01", "bob")?;

    // Already running: the guard table rejects a second start
    if let Err(err) = coordinator.start("PRESS-01", "bob", None) {
        println!("Start rejected: {err}");
    }

    clock.advance(3_600_000);
    coordinator.stop("PRESS-01", "bob", None)?;

    println!("\nTransition history:");
    for transition in coordinator.transition_history("PRESS-01")?.records() {
        println!(
            "  {} -> {} ({} -> {}) by {}: {}",
            transition.from_status,
            transition.to_status,
            transition.from_mode,
            transition.to_mode,
            transition.operator,
            transition.reason
        );
    }

    let machine = coordinator.machine("PRESS-01")?;
    println!(
        "\nFinal status: {}, operating hours: {:.2}",
        machine.status, machine.total_operating_hours
    );

    println!("\nEvents emitted:");
    for event in ledger.events()? {
        println!("  {}", event.name);
    }

    Ok(())
}
