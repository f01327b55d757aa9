//! Machine lifecycle transition table.
//!
//! Each action has one rule: a target status, a mode rule and the guards
//! that must all hold on the current status. Planning is pure; the
//! coordinator persists the plan.

use crate::core::Guard;
use crate::model::{MachineMode, MachineStatus};
use std::fmt;

/// Operator-initiated lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineAction {
    Start,
    Pause,
    Resume,
    Stop,
}

impl MachineAction {
    pub const ALL: [MachineAction; 4] = [Self::Start, Self::Pause, Self::Resume, Self::Stop];

    /// Lowercase name used in transition ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        }
    }

    /// Reason recorded when the caller gives none.
    pub fn default_reason(&self) -> &'static str {
        match self {
            Self::Start => "operation started",
            Self::Pause => "manual pause",
            Self::Resume => "operation resumed",
            Self::Stop => "manual stop",
        }
    }
}

impl fmt::Display for MachineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an action affects the control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Keep,
    /// Use the caller's mode, or the fallback when none is given.
    Requested { fallback: MachineMode },
    Reset(MachineMode),
}

impl ModeChange {
    fn apply(self, current: MachineMode, requested: Option<MachineMode>) -> MachineMode {
        match self {
            Self::Keep => current,
            Self::Requested { fallback } => requested.unwrap_or(fallback),
            Self::Reset(mode) => mode,
        }
    }
}

#[derive(Debug)]
pub struct LifecycleRule {
    pub action: MachineAction,
    pub target: MachineStatus,
    pub mode: ModeChange,
    pub guards: Vec<Guard<MachineStatus>>,
}

impl LifecycleRule {
    /// First guard that rejects `status`, if any.
    pub fn check(&self, status: &MachineStatus) -> Result<(), &str> {
        self.guards.iter().try_for_each(|g| g.evaluate(status))
    }
}

/// Accepted transition, ready to be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub action: MachineAction,
    pub from_status: MachineStatus,
    pub to_status: MachineStatus,
    pub from_mode: MachineMode,
    pub to_mode: MachineMode,
}

impl TransitionPlan {
    /// Whether the machine stops accruing operating hours.
    pub fn leaves_running(&self) -> bool {
        self.from_status == MachineStatus::Running && self.to_status != MachineStatus::Running
    }
}

/// The machine transition table.
///
/// # Example
///
/// ```rust
/// use plantledger::engine::{Lifecycle, MachineAction};
/// use plantledger::model::{MachineMode, MachineStatus};
///
/// let lifecycle = Lifecycle::standard();
/// let plan = lifecycle
///     .plan(MachineAction::Start, MachineStatus::Stopped, MachineMode::Manual, None)
///     .unwrap();
/// assert_eq!(plan.to_status, MachineStatus::Running);
/// assert_eq!(plan.to_mode, MachineMode::Automatic);
///
/// let rejected = lifecycle.plan(MachineAction::Start, MachineStatus::Running, MachineMode::Automatic, None);
/// assert_eq!(rejected.unwrap_err(), "is already running");
/// ```
#[derive(Debug)]
pub struct Lifecycle {
    rules: Vec<LifecycleRule>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::standard()
    }
}

impl Lifecycle {
    pub fn standard() -> Self {
        use crate::model::MachineStatus::*;

        let rules = vec![
            LifecycleRule {
                action: MachineAction::Start,
                target: Running,
                mode: ModeChange::Requested {
                    fallback: MachineMode::Automatic,
                },
                guards: vec![
                    Guard::not_in(Running, "is already running"),
                    Guard::not_in(Maintenance, "is in maintenance"),
                    Guard::not_in(Error, "has an error and cannot be started"),
                ],
            },
            LifecycleRule {
                action: MachineAction::Pause,
                target: Paused,
                mode: ModeChange::Keep,
                guards: vec![Guard::only_in(Running, "is not running")],
            },
            LifecycleRule {
                action: MachineAction::Resume,
                target: Running,
                mode: ModeChange::Keep,
                guards: vec![Guard::only_in(Paused, "is not paused")],
            },
            LifecycleRule {
                action: MachineAction::Stop,
                target: Stopped,
                mode: ModeChange::Reset(MachineMode::Manual),
                guards: vec![Guard::not_in(Stopped, "is already stopped")],
            },
        ];

        Self { rules }
    }

    pub fn rule(&self, action: MachineAction) -> Option<&LifecycleRule> {
        self.rules.iter().find(|r| r.action == action)
    }

    /// Plan `action` from the current status and mode.
    ///
    /// Returns the rejecting guard's reason when the action is not allowed.
    pub fn plan(
        &self,
        action: MachineAction,
        status: MachineStatus,
        mode: MachineMode,
        requested_mode: Option<MachineMode>,
    ) -> Result<TransitionPlan, &str> {
        let rule = self.rule(action).ok_or("has no rule for this action")?;
        rule.check(&status)?;

        Ok(TransitionPlan {
            action,
            from_status: status,
            to_status: rule.target,
            from_mode: mode,
            to_mode: rule.mode.apply(mode, requested_mode),
        })
    }

    /// Actions whose guards all pass from `status`.
    pub fn allowed_actions(&self, status: MachineStatus) -> Vec<MachineAction> {
        self.rules
            .iter()
            .filter(|r| r.check(&status).is_ok())
            .map(|r| r.action)
            .collect()
    }
}
