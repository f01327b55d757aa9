//! Machine lifecycle scenarios against the in-memory ledger.

mod common;

use common::{event_names, plant, registration};
use plantledger::compliance::SlaBreach;
use plantledger::ledger::{Ledger, WriteSet};
use plantledger::model::{MachineMode, MachineStatus, MetricsReading};
use plantledger::TrackError;

#[test]
fn start_after_register_records_one_transition() {
    let plant = plant();
    let machine = plant.machines.register(registration("M1")).unwrap();
    assert_eq!(machine.status, MachineStatus::Stopped);
    assert_eq!(machine.mode, MachineMode::Manual);
    assert_eq!(machine.sla_compliance.uptime_target, 95.0);
    assert_eq!(machine.sla_compliance.response_time_target, 1000.0);

    let transition = plant.machines.start("M1", "op1", None).unwrap();
    assert_eq!(transition.from_status, MachineStatus::Stopped);
    assert_eq!(transition.to_status, MachineStatus::Running);
    assert_eq!(transition.to_mode, MachineMode::Automatic);
    assert_eq!(transition.reason, "operation started");
    assert!(transition.sla_impact);

    let stored = plant.machines.machine("M1").unwrap();
    assert_eq!(stored.status, MachineStatus::Running);
    assert_eq!(stored.last_state_change, transition.timestamp);

    let history = plant.machines.transition_history("M1").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0], transition);
    assert_eq!(event_names(&plant.ledger), vec!["MachineRegistered", "MachineStarted"]);
}

#[test]
fn starting_a_running_machine_conflicts() {
    let plant = plant();
    plant.machines.register(registration("M1")).unwrap();
    plant.machines.start("M1", "op1", None).unwrap();

    let err = plant.machines.start("M1", "op2", None).unwrap_err();
    assert!(matches!(err, TrackError::Conflict { .. }));
    assert!(err.to_string().contains("already running"));

    assert_eq!(plant.machines.transition_history("M1").unwrap().len(), 1);
    assert_eq!(plant.machines.machine("M1").unwrap().operator, "op1");
}

#[test]
fn low_efficiency_raises_sla_violation() {
    let plant = plant();
    plant.machines.register(registration("M1")).unwrap();

    let decision = plant
        .machines
        .update_performance_metrics(
            "M1",
            MetricsReading {
                temperature: 85.0,
                pressure: 1.2,
                vibration: 3.0,
                efficiency: 75.0,
                power_consumption: 12.0,
                throughput: 300.0,
            },
        )
        .unwrap();

    assert!(decision.is_violation());
    assert!(matches!(
        decision.breaches(),
        [SlaBreach::LowEfficiency { .. }]
    ));

    let machine = plant.machines.machine("M1").unwrap();
    assert_eq!(machine.sla_compliance.violation_count, 1);
    assert_eq!(
        machine.sla_compliance.last_violation_at,
        machine.sla_compliance.last_update
    );
    assert_eq!(machine.performance_metrics.efficiency, 75.0);

    let event = plant.ledger.events().unwrap().pop().unwrap();
    assert_eq!(event.name, "SLAViolation");
    let payload: serde_json::Value = serde_json::from_slice(&event.payload).unwrap();
    assert_eq!(payload["machineId"], "M1");
    assert_eq!(payload["violationType"], "performance");
    assert_eq!(payload["metrics"]["efficiency"], 75.0);
}

#[test]
fn full_cycle_orders_history_by_time() {
    let plant = plant();
    plant.machines.register(registration("M1")).unwrap();

    plant.machines.start("M1", "op1", Some(MachineMode::Manual)).unwrap();
    plant.machines.pause("M1", "op1", Some("material change")).unwrap();
    plant.machines.resume("M1", "op2").unwrap();
    plant.machines.stop("M1", "op2", None).unwrap();

    let history = plant.machines.transition_history("M1").unwrap();
    let path: Vec<(MachineStatus, MachineStatus)> = history
        .records()
        .iter()
        .map(|t| (t.from_status, t.to_status))
        .collect();
    assert_eq!(
        path,
        vec![
            (MachineStatus::Stopped, MachineStatus::Running),
            (MachineStatus::Running, MachineStatus::Paused),
            (MachineStatus::Paused, MachineStatus::Running),
            (MachineStatus::Running, MachineStatus::Stopped),
        ]
    );
    assert_eq!(history.records()[1].reason, "material change");
    assert_eq!(history.records()[2].reason, "operation resumed");

    // two reads with no writes in between
    assert_eq!(
        history.records(),
        plant.machines.transition_history("M1").unwrap().records()
    );
}

#[test]
fn histories_do_not_mix_machines() {
    let plant = plant();
    plant.machines.register(registration("M1")).unwrap();
    plant.machines.register(registration("M10")).unwrap();
    plant.machines.start("M1", "op1", None).unwrap();
    plant.machines.start("M10", "op1", None).unwrap();
    plant.machines.stop("M10", "op1", Some("shift end")).unwrap();

    assert_eq!(plant.machines.transition_history("M1").unwrap().len(), 1);
    assert_eq!(plant.machines.transition_history("M10").unwrap().len(), 2);
    assert_eq!(plant.machines.machines().unwrap().len(), 2);
}

#[test]
fn operations_on_unknown_machines_fail() {
    let plant = plant();

    assert!(!plant.machines.machine_exists("ghost").unwrap());
    for err in [
        plant.machines.start("ghost", "op1", None).unwrap_err(),
        plant.machines.stop("ghost", "op1", None).unwrap_err(),
        plant
            .machines
            .update_performance_metrics("ghost", MetricsReading::default())
            .unwrap_err(),
    ] {
        assert!(matches!(err, TrackError::NotFound { kind: "machine", .. }));
    }
    assert!(plant.ledger.is_empty().unwrap());
}

#[test]
fn paused_time_does_not_count_as_operating_time() {
    let plant = plant();
    plant.machines.register(registration("M1")).unwrap();
    plant.machines.start("M1", "op1", None).unwrap();
    plant.clock.advance(3_600_000);
    plant.machines.pause("M1", "op1", None).unwrap();
    plant.clock.advance(10 * 3_600_000);
    plant.machines.stop("M1", "op1", None).unwrap();

    let hours = plant.machines.machine("M1").unwrap().total_operating_hours;
    assert!(hours >= 1.0 && hours < 1.001, "unexpected hours {hours}");
}

#[test]
fn machines_in_maintenance_or_error_cannot_start() {
    let plant = plant();

    for (machine_id, status, reason) in [
        ("M1", MachineStatus::Maintenance, "is in maintenance"),
        ("M2", MachineStatus::Error, "has an error and cannot be started"),
    ] {
        let mut machine = plant.machines.register(registration(machine_id)).unwrap();
        machine.status = status;
        let mut writes = WriteSet::new();
        writes.put_document(&machine).unwrap();
        plant.ledger.commit(writes).unwrap();

        let entries = plant.ledger.len().unwrap();
        let events = plant.ledger.events().unwrap().len();

        let err = plant.machines.start(machine_id, "op1", None).unwrap_err();
        assert!(matches!(err, TrackError::Conflict { .. }));
        assert_eq!(err.to_string(), format!("machine {machine_id} {reason}"));

        assert_eq!(plant.ledger.len().unwrap(), entries);
        assert_eq!(plant.ledger.events().unwrap().len(), events);
        assert_eq!(plant.machines.machine(machine_id).unwrap().status, status);
        assert!(plant.machines.transition_history(machine_id).unwrap().is_empty());
    }
}
