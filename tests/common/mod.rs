//! Shared fixtures for integration tests.

#![allow(dead_code)]

use plantledger::clock::ManualClock;
use plantledger::ledger::InMemoryLedger;
use plantledger::model::MachineRegistration;
use plantledger::{MachineCoordinator, ProcessTracer};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per test binary. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_test_writer();

    // Later calls find a subscriber already set.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

pub struct Plant {
    pub ledger: Arc<InMemoryLedger>,
    pub clock: Arc<ManualClock>,
    pub machines: MachineCoordinator<InMemoryLedger>,
    pub batches: ProcessTracer<InMemoryLedger>,
}

/// Both engines over one ledger, with a clock that ticks 1 ms per read.
pub fn plant() -> Plant {
    init_tracing();

    let ledger = Arc::new(InMemoryLedger::new());
    let clock = Arc::new(ManualClock::ticking(1_700_000_000_000, 1));
    let machines = MachineCoordinator::new(Arc::clone(&ledger)).with_clock(clock.clone());
    let batches = ProcessTracer::new(Arc::clone(&ledger)).with_clock(clock.clone());

    Plant {
        ledger,
        clock,
        machines,
        batches,
    }
}

pub fn registration(machine_id: &str) -> MachineRegistration {
    MachineRegistration {
        machine_id: machine_id.to_string(),
        name: "Conveyor".to_string(),
        machine_type: "conveyor".to_string(),
        location: "Plant A".to_string(),
        operator: "op1".to_string(),
        uptime_target: 95.0,
        response_time_target: 1000.0,
    }
}

pub fn event_names(ledger: &InMemoryLedger) -> Vec<String> {
    ledger
        .events()
        .unwrap()
        .into_iter()
        .map(|event| event.name)
        .collect()
}
