//! Property-based tests for lifecycle, integrity and conservation rules.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use plantledger::clock::ManualClock;
use plantledger::compliance::{integrity, SlaPolicy};
use plantledger::core::{History, State};
use plantledger::engine::{Lifecycle, MachineAction, ProcessTracer};
use plantledger::ledger::InMemoryLedger;
use plantledger::model::{
    BatchStatus, MachineMode, MachineStatus, MaterialMovement, PerformanceMetrics, ProcessTrace,
    StateTransition, TraceOperation,
};
use plantledger::TrackError;
use proptest::prelude::*;
use std::sync::Arc;

prop_compose! {
    fn arbitrary_status()(variant in 0..5u8) -> MachineStatus {
        match variant {
            0 => MachineStatus::Stopped,
            1 => MachineStatus::Running,
            2 => MachineStatus::Paused,
            3 => MachineStatus::Maintenance,
            _ => MachineStatus::Error,
        }
    }
}

prop_compose! {
    fn arbitrary_mode()(variant in 0..3u8) -> MachineMode {
        match variant {
            0 => MachineMode::Manual,
            1 => MachineMode::Automatic,
            _ => MachineMode::Emergency,
        }
    }
}

prop_compose! {
    fn arbitrary_action()(variant in 0..4usize) -> MachineAction {
        MachineAction::ALL[variant]
    }
}

prop_compose! {
    fn arbitrary_operation()(variant in 0..4u8) -> TraceOperation {
        match variant {
            0 => TraceOperation::Input,
            1 => TraceOperation::Output,
            2 => TraceOperation::Transfer,
            _ => TraceOperation::QualityCheck,
        }
    }
}

fn transition(index: usize, timestamp: i64) -> StateTransition {
    StateTransition {
        transition_id: format!("M1_start_{timestamp}_{index:08x}"),
        machine_id: "M1".to_string(),
        from_status: MachineStatus::Stopped,
        to_status: MachineStatus::Running,
        from_mode: MachineMode::Manual,
        to_mode: MachineMode::Automatic,
        operator: "op".to_string(),
        timestamp,
        reason: "operation started".to_string(),
        sla_impact: true,
    }
}

proptest! {
    #[test]
    fn lifecycle_planning_is_deterministic(
        action in arbitrary_action(),
        status in arbitrary_status(),
        mode in arbitrary_mode(),
    ) {
        let lifecycle = Lifecycle::standard();
        let first = lifecycle.plan(action, status, mode, None).map_err(str::to_string);
        let second = lifecycle.plan(action, status, mode, None).map_err(str::to_string);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn plan_succeeds_exactly_for_allowed_actions(
        action in arbitrary_action(),
        status in arbitrary_status(),
        mode in arbitrary_mode(),
    ) {
        let lifecycle = Lifecycle::standard();
        let allowed = lifecycle.allowed_actions(status).contains(&action);
        prop_assert_eq!(lifecycle.plan(action, status, mode, None).is_ok(), allowed);
    }

    #[test]
    fn accepted_plans_change_status(
        action in arbitrary_action(),
        status in arbitrary_status(),
        mode in arbitrary_mode(),
    ) {
        if let Ok(plan) = Lifecycle::standard().plan(action, status, mode, None) {
            prop_assert_eq!(plan.from_status, status);
            prop_assert_ne!(plan.to_status, status);
            prop_assert!(!plan.to_status.is_error());
        }
    }

    #[test]
    fn sla_decision_is_pure(
        efficiency in 0.0f64..100.0,
        temperature in 0.0f64..150.0,
        vibration in 0.0f64..20.0,
    ) {
        let policy = SlaPolicy::default();
        let mut metrics = PerformanceMetrics::zeroed(0);
        metrics.efficiency = efficiency;
        metrics.temperature = temperature;
        metrics.vibration = vibration;

        let decision = policy.decide(&metrics);
        prop_assert_eq!(&decision, &policy.decide(&metrics));

        let expected = efficiency < 80.0 || temperature > 90.0 || vibration > 10.0;
        prop_assert_eq!(decision.is_violation(), expected);
    }

    #[test]
    fn recomputed_hash_matches_stored_hash(
        batch_id in "[A-Z0-9]{1,8}",
        operation in arbitrary_operation(),
        quantity in 0u64..1_000_000,
        from_location in "[a-zA-Z ]{0,12}",
        to_location in "[a-zA-Z ]{0,12}",
        timestamp in 0i64..4_000_000_000_000,
    ) {
        let trace_hash = integrity::trace_hash(
            &batch_id, operation, quantity, &from_location, &to_location, timestamp,
        );
        let mut trace = ProcessTrace {
            trace_id: format!("{batch_id}_{operation}_{timestamp}_00000000"),
            batch_id,
            operation,
            quantity,
            from_location,
            to_location,
            process_id: "P".to_string(),
            operator: "op".to_string(),
            timestamp,
            trace_hash,
            notes: None,
            quality_data: None,
        };

        prop_assert!(integrity::verify(&trace));
        prop_assert_eq!(trace.trace_hash.len(), 64);

        trace.quantity += 1;
        prop_assert!(!integrity::verify(&trace));
    }

    #[test]
    fn history_is_ordered_and_stable(timestamps in prop::collection::vec(0i64..1_000, 0..30)) {
        let records: Vec<StateTransition> = timestamps
            .iter()
            .enumerate()
            .map(|(i, ts)| transition(i, *ts))
            .collect();

        let mut reversed = records.clone();
        reversed.reverse();

        let history = History::from_records(records);
        let again = History::from_records(reversed);

        prop_assert_eq!(history.len(), timestamps.len());
        prop_assert!(history
            .records()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
        prop_assert_eq!(history.records(), again.records());
    }

    #[test]
    fn batch_quantity_is_conserved(
        total in 1u64..10_000,
        outputs in prop::collection::vec(0u64..4_000, 1..12),
    ) {
        let tracer = ProcessTracer::new(Arc::new(InMemoryLedger::new()))
            .with_clock(Arc::new(ManualClock::ticking(1, 1)));
        tracer.create_batch("B1", "steel", "S", total).unwrap();

        let mut withdrawn = 0u64;
        for quantity in outputs {
            let movement = MaterialMovement::new(quantity, "a", "b", "P", "op");
            match tracer.record_output("B1", movement) {
                Ok(_) => withdrawn += quantity,
                Err(TrackError::InsufficientQuantity { requested, available, .. }) => {
                    prop_assert!(requested > available);
                }
                Err(TrackError::InvalidState { status, .. }) => {
                    prop_assert_eq!(status, BatchStatus::Completed);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }

            let batch = tracer.batch("B1").unwrap();
            prop_assert_eq!(batch.current_quantity + withdrawn, total);
            prop_assert_eq!(batch.status == BatchStatus::Completed, batch.current_quantity == 0);
        }
    }
}
