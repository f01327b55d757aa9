//! SLA Policy
//!
//! This example builds an SLA policy with custom rules and feeds metrics to it.
//!
//! Key concepts:
//! - Validation accumulates every tripped rule instead of stopping at the first
//! - Built-in thresholds can be tightened through the builder
//! - Custom predicates sit alongside the built-in rules
//! - A configuration swaps thresholds but keeps custom rules
//!
//! Run with: cargo run --example sla_policy

use plantledger::compliance::{SlaBreach, SlaPolicyBuilder};
use plantledger::config::EngineConfig;
use plantledger::ledger::InMemoryLedger;
use plantledger::model::{MachineRegistration, MetricsReading, PerformanceMetrics};
use plantledger::MachineCoordinator;
use std::sync::Arc;
use stillwater::validation::Validation;

fn reading(efficiency: f64, temperature: f64, vibration: f64, throughput: f64) -> MetricsReading {
    MetricsReading {
        temperature,
        pressure: 1.2,
        vibration,
        efficiency,
        power_consumption: 18.0,
        throughput,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== SLA Policy Example ===\n");

    // Example 1: Tightened thresholds plus custom rules
    println!("Example 1: Custom SLA policy");
    let policy = SlaPolicyBuilder::new()
        .min_efficiency(85.0)
        .max_vibration(8.0)
        .require_pred(
            |m| m.throughput >= 200.0,
            "throughput below 200 units/h".to_string(),
        )
        .require(|m: &PerformanceMetrics| {
            if m.power_consumption / m.throughput.max(1.0) <= 0.1 {
                Validation::success(())
            } else {
                Validation::fail(SlaBreach::Custom {
                    message: format!("energy per unit too high at {:.3}", m.power_consumption),
                })
            }
        })
        .build();

    let metrics = PerformanceMetrics::from_reading(&reading(82.0, 70.0, 9.0, 150.0), 0);
    let decision = policy.decide(&metrics);
    println!("  Violation: {}", decision.is_violation());
    for breach in decision.breaches() {
        println!("    - {breach}");
    }
    println!();

    // Example 2: The policy inside a coordinator
    println!("Example 2: Coordinator with config and custom rules");
    let coordinator = MachineCoordinator::new(Arc::new(InMemoryLedger::new()))
        .with_policy(policy)
        .with_config(EngineConfig::from_json(
            r#"{ "sla": { "maxTemperature": 75.0 }, "violationType": "thermal" }"#,
        )?)?;

    coordinator.register(MachineRegistration {
        machine_id: "OVEN-2".to_string(),
        name: "Curing oven".to_string(),
        machine_type: "oven".to_string(),
        location: "Hall B".to_string(),
        operator: "frank".to_string(),
        uptime_target: 98.0,
        response_time_target: 500.0,
    })?;

    for sample in [
        reading(92.0, 65.0, 2.0, 400.0),
        reading(92.0, 78.0, 2.0, 120.0),
    ] {
        let decision = coordinator.update_performance_metrics("OVEN-2", sample)?;
        println!("  Breaches: {:?}", decision.breaches());
    }

    let machine = coordinator.machine("OVEN-2")?;
    println!(
        "  Violation count: {}",
        machine.sla_compliance.violation_count
    );

    Ok(())
}
