//! Machine lifecycle engine.

use super::ids;
use super::lifecycle::{Lifecycle, MachineAction, TransitionPlan};
use crate::clock::{Clock, SystemClock, Timestamp};
use crate::compliance::{SlaPolicy, ViolationDecision};
use crate::config::{ConfigError, EngineConfig};
use crate::core::History;
use crate::error::{Result, TrackError};
use crate::events::DomainEvent;
use crate::ledger::{Ledger, LedgerFacade, WriteSet};
use crate::model::{
    Machine, MachineMode, MachineRegistration, MaintenanceRequest, MaintenanceSchedule,
    MaintenanceStatus, MetricsReading, PerformanceMetrics, StateTransition,
};
use crate::reconstruct::HistoryReconstructor;
use crate::store::EntityStore;
use std::sync::Arc;
use tracing::{info, warn};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Registers machines and drives them through their lifecycle.
///
/// Every mutating call reads the machine, checks the lifecycle guards and
/// commits the updated machine, its audit record and the domain event as
/// one write set. A rejected call writes nothing.
///
/// # Example
///
/// ```rust
/// use plantledger::clock::ManualClock;
/// use plantledger::engine::MachineCoordinator;
/// use plantledger::ledger::InMemoryLedger;
/// use plantledger::model::{MachineRegistration, MachineStatus};
/// use std::sync::Arc;
///
/// let coordinator = MachineCoordinator::new(Arc::new(InMemoryLedger::new()))
///     .with_clock(Arc::new(ManualClock::ticking(1_000, 1)));
///
/// coordinator.register(MachineRegistration {
///     machine_id: "M1".to_string(),
///     name: "Press".to_string(),
///     machine_type: "press".to_string(),
///     location: "Hall 1".to_string(),
///     operator: "op1".to_string(),
///     uptime_target: 95.0,
///     response_time_target: 1000.0,
/// })?;
///
/// let transition = coordinator.start("M1", "op1", None)?;
/// assert_eq!(transition.to_status, MachineStatus::Running);
/// assert!(coordinator.start("M1", "op1", None).is_err());
/// # Ok::<(), plantledger::TrackError>(())
/// ```
pub struct MachineCoordinator<L: Ledger + ?Sized> {
    facade: LedgerFacade<L>,
    machines: EntityStore<Machine, L>,
    history: HistoryReconstructor<L>,
    lifecycle: Lifecycle,
    policy: SlaPolicy,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl<L: Ledger + ?Sized> MachineCoordinator<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        let facade = LedgerFacade::new(ledger);
        let config = EngineConfig::default();
        Self {
            machines: EntityStore::new(facade.clone()),
            history: HistoryReconstructor::new(facade.clone()),
            facade,
            lifecycle: Lifecycle::standard(),
            policy: SlaPolicy::from_thresholds(config.sla.clone()),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Apply a validated configuration.
    ///
    /// The policy's thresholds are replaced by the configured ones; custom
    /// checks installed with [`with_policy`](Self::with_policy) are kept.
    pub fn with_config(
        mut self,
        config: EngineConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        self.policy.thresholds = config.sla.clone();
        self.config = config;
        Ok(self)
    }

    /// Replace the SLA policy, e.g. one with custom rules.
    pub fn with_policy(mut self, policy: SlaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Create a stopped, manual machine.
    ///
    /// Fails with `AlreadyExists` if the id is taken.
    pub fn register(&self, registration: MachineRegistration) -> Result<Machine> {
        let now = self.clock.now_millis();
        let machine = Machine::register(registration, now, self.config.maintenance_interval_ms());

        let mut writes = WriteSet::new();
        self.machines.stage_create(&mut writes, &machine)?;
        writes.emit_domain(&DomainEvent::MachineRegistered {
            machine_id: machine.machine_id.clone(),
            name: machine.name.clone(),
            machine_type: machine.machine_type.clone(),
            location: machine.location.clone(),
            timestamp: now,
        })?;
        self.facade.commit(writes)?;

        info!(
            machine_id = %machine.machine_id,
            machine_type = %machine.machine_type,
            location = %machine.location,
            "machine registered"
        );
        Ok(machine)
    }

    /// Start the machine in `mode`, automatic when `None`.
    pub fn start(
        &self,
        machine_id: &str,
        operator: &str,
        mode: Option<MachineMode>,
    ) -> Result<StateTransition> {
        self.apply(machine_id, MachineAction::Start, operator, mode, None)
    }

    pub fn pause(
        &self,
        machine_id: &str,
        operator: &str,
        reason: Option<&str>,
    ) -> Result<StateTransition> {
        self.apply(machine_id, MachineAction::Pause, operator, None, reason)
    }

    pub fn resume(&self, machine_id: &str, operator: &str) -> Result<StateTransition> {
        self.apply(machine_id, MachineAction::Resume, operator, None, None)
    }

    /// Stop the machine; the mode falls back to manual.
    pub fn stop(
        &self,
        machine_id: &str,
        operator: &str,
        reason: Option<&str>,
    ) -> Result<StateTransition> {
        self.apply(machine_id, MachineAction::Stop, operator, None, reason)
    }

    fn apply(
        &self,
        machine_id: &str,
        action: MachineAction,
        operator: &str,
        requested_mode: Option<MachineMode>,
        reason: Option<&str>,
    ) -> Result<StateTransition> {
        let mut machine = self.machines.load(machine_id)?;

        let plan = self
            .lifecycle
            .plan(action, machine.status, machine.mode, requested_mode)
            .map_err(|rejection| {
                warn!(
                    machine_id,
                    action = %action,
                    status = %machine.status,
                    reason = rejection,
                    "transition rejected"
                );
                TrackError::Conflict {
                    kind: "machine",
                    id: machine_id.to_string(),
                    reason: rejection.to_string(),
                }
            })?;

        let now = self.clock.now_millis();
        let transition = StateTransition {
            transition_id: ids::transition_id(machine_id, action.as_str(), now),
            machine_id: machine_id.to_string(),
            from_status: plan.from_status,
            to_status: plan.to_status,
            from_mode: plan.from_mode,
            to_mode: plan.to_mode,
            operator: operator.to_string(),
            timestamp: now,
            reason: reason.unwrap_or(action.default_reason()).to_string(),
            sla_impact: true,
        };

        apply_plan(&mut machine, &plan, operator, now);

        let mut writes = WriteSet::new();
        self.machines.stage_save(&mut writes, &machine)?;
        writes.put_document(&transition)?;
        writes.emit_domain(&lifecycle_event(&plan, machine_id, operator, reason, now))?;
        self.facade.commit(writes)?;

        info!(
            machine_id,
            transition_id = %transition.transition_id,
            from = %plan.from_status,
            to = %plan.to_status,
            mode = %plan.to_mode,
            operator,
            "machine transition recorded"
        );
        Ok(transition)
    }

    /// Replace the metrics snapshot and evaluate the SLA rules against it.
    ///
    /// A violation bumps the violation count and emits `SLAViolation`; the
    /// machine is persisted once either way.
    pub fn update_performance_metrics(
        &self,
        machine_id: &str,
        reading: MetricsReading,
    ) -> Result<ViolationDecision> {
        let mut machine = self.machines.load(machine_id)?;
        let now = self.clock.now_millis();

        machine.performance_metrics = PerformanceMetrics::from_reading(&reading, now);
        let decision = self.policy.decide(&machine.performance_metrics);

        let mut writes = WriteSet::new();
        if let ViolationDecision::Violated(breaches) = &decision {
            let sla = &mut machine.sla_compliance;
            sla.violation_count += 1;
            sla.last_violation_at = now;

            writes.emit_domain(&DomainEvent::SlaViolation {
                machine_id: machine_id.to_string(),
                violation_type: self.config.violation_type.clone(),
                metrics: machine.performance_metrics.clone(),
                breaches: breaches.clone(),
                timestamp: now,
            })?;

            warn!(
                machine_id,
                violations = sla.violation_count,
                breaches = breaches.len(),
                efficiency = machine.performance_metrics.efficiency,
                temperature = machine.performance_metrics.temperature,
                vibration = machine.performance_metrics.vibration,
                "SLA violation detected"
            );
        }
        machine.sla_compliance.last_update = now;

        self.machines.stage_save(&mut writes, &machine)?;
        self.facade.commit(writes)?;
        Ok(decision)
    }

    /// Plan a maintenance window for an existing machine.
    pub fn schedule_maintenance(
        &self,
        machine_id: &str,
        request: MaintenanceRequest,
    ) -> Result<MaintenanceSchedule> {
        if !self.machines.exists(machine_id)? {
            return Err(TrackError::NotFound {
                kind: "machine",
                id: machine_id.to_string(),
            });
        }

        let now = self.clock.now_millis();
        let schedule = MaintenanceSchedule {
            maintenance_id: ids::maintenance_id(machine_id, now),
            machine_id: machine_id.to_string(),
            maintenance_type: request.maintenance_type,
            scheduled_date: request.scheduled_date,
            estimated_duration: request.estimated_duration,
            assigned_technician: request.assigned_technician,
            priority: request.priority,
            status: MaintenanceStatus::Scheduled,
            description: request.description,
            created_at: now,
            updated_at: now,
        };

        let mut writes = WriteSet::new();
        writes.put_document(&schedule)?;
        writes.emit_domain(&DomainEvent::MaintenanceScheduled {
            machine_id: machine_id.to_string(),
            maintenance_type: schedule.maintenance_type,
            scheduled_date: schedule.scheduled_date,
            assigned_technician: schedule.assigned_technician.clone(),
            priority: schedule.priority,
            timestamp: now,
        })?;
        self.facade.commit(writes)?;

        info!(
            machine_id,
            maintenance_id = %schedule.maintenance_id,
            scheduled_date = schedule.scheduled_date,
            "maintenance scheduled"
        );
        Ok(schedule)
    }

    pub fn machine(&self, machine_id: &str) -> Result<Machine> {
        self.machines.load(machine_id)
    }

    pub fn machines(&self) -> Result<Vec<Machine>> {
        self.machines.list()
    }

    pub fn machine_exists(&self, machine_id: &str) -> Result<bool> {
        self.machines.exists(machine_id)
    }

    /// Actions the machine currently accepts.
    pub fn allowed_actions(&self, machine_id: &str) -> Result<Vec<MachineAction>> {
        let machine = self.machines.load(machine_id)?;
        Ok(self.lifecycle.allowed_actions(machine.status))
    }

    /// Transitions of one machine, oldest first.
    pub fn transition_history(&self, machine_id: &str) -> Result<History<StateTransition>> {
        Ok(self.history.history::<StateTransition>(machine_id)?)
    }

    /// Maintenance schedules of one machine, by scheduled date.
    pub fn maintenance_schedules(&self, machine_id: &str) -> Result<Vec<MaintenanceSchedule>> {
        let mut schedules: Vec<MaintenanceSchedule> = self
            .history
            .list::<MaintenanceSchedule>()?
            .into_iter()
            .filter(|s| s.machine_id == machine_id)
            .collect();
        schedules.sort_by(|a, b| {
            a.scheduled_date
                .cmp(&b.scheduled_date)
                .then_with(|| a.maintenance_id.cmp(&b.maintenance_id))
        });
        Ok(schedules)
    }
}

fn apply_plan(machine: &mut Machine, plan: &TransitionPlan, operator: &str, now: Timestamp) {
    if plan.leaves_running() {
        let elapsed = now.saturating_sub(machine.last_state_change).max(0);
        machine.total_operating_hours += elapsed as f64 / MILLIS_PER_HOUR;
    }
    machine.status = plan.to_status;
    machine.mode = plan.to_mode;
    machine.operator = operator.to_string();
    machine.last_state_change = now;
}

fn lifecycle_event(
    plan: &TransitionPlan,
    machine_id: &str,
    operator: &str,
    reason: Option<&str>,
    timestamp: Timestamp,
) -> DomainEvent {
    let machine_id = machine_id.to_string();
    let operator = operator.to_string();
    let reason = reason.map(str::to_string);
    match plan.action {
        MachineAction::Start => DomainEvent::MachineStarted {
            machine_id,
            operator,
            mode: plan.to_mode,
            timestamp,
        },
        MachineAction::Pause => DomainEvent::MachinePaused {
            machine_id,
            operator,
            reason,
            timestamp,
        },
        MachineAction::Resume => DomainEvent::MachineResumed {
            machine_id,
            operator,
            timestamp,
        },
        MachineAction::Stop => DomainEvent::MachineStopped {
            machine_id,
            operator,
            reason,
            timestamp,
        },
    }
}
