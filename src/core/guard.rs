//! Guard predicates for lifecycle transitions.
//!
//! A guard is a pure precondition on the current status. When it does not
//! hold, the transition is rejected with the guard's reason before anything
//! is written.

use super::state::State;
use std::marker::PhantomData;

/// Pure predicate over a status, paired with the reason reported on rejection.
///
/// # Example
///
/// ```rust
/// use plantledger::core::Guard;
/// use plantledger::model::MachineStatus;
///
/// let not_running = Guard::new(
///     |s: &MachineStatus| *s != MachineStatus::Running,
///     "is already running",
/// );
///
/// assert!(not_running.check(&MachineStatus::Stopped));
/// assert_eq!(
///     not_running.evaluate(&MachineStatus::Running),
///     Err("is already running")
/// );
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    reason: String,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate and its rejection reason.
    ///
    /// The reason is phrased to follow the entity label and id, e.g.
    /// `"machine M1 " + reason`.
    pub fn new<F>(predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            reason: reason.into(),
            _phantom: PhantomData,
        }
    }

    /// Guard that holds only while the status differs from `forbidden`.
    pub fn not_in(forbidden: S, reason: impl Into<String>) -> Self
    where
        S: 'static,
    {
        Self::new(move |s: &S| *s != forbidden, reason)
    }

    /// Guard that holds only in `required`.
    pub fn only_in(required: S, reason: impl Into<String>) -> Self
    where
        S: 'static,
    {
        Self::new(move |s: &S| *s == required, reason)
    }

    /// Check if the guard allows a transition from this status.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }

    /// Like [`check`](Self::check), but yields the rejection reason.
    pub fn evaluate(&self, state: &S) -> Result<(), &str> {
        if self.check(state) {
            Ok(())
        } else {
            Err(&self.reason)
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl<S: State> std::fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").field("reason", &self.reason).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineStatus;

    #[test]
    fn guard_allows_matching_states() {
        let guard = Guard::only_in(MachineStatus::Paused, "is not paused");

        assert!(guard.check(&MachineStatus::Paused));
        assert!(!guard.check(&MachineStatus::Running));
    }

    #[test]
    fn not_in_rejects_only_the_forbidden_status() {
        let guard = Guard::not_in(MachineStatus::Stopped, "is already stopped");

        assert!(guard.check(&MachineStatus::Running));
        assert!(guard.check(&MachineStatus::Error));
        assert_eq!(
            guard.evaluate(&MachineStatus::Stopped),
            Err("is already stopped")
        );
    }

    #[test]
    fn guard_checks_non_error_states() {
        let guard = Guard::new(|s: &MachineStatus| !s.is_error(), "has an error");

        assert!(guard.check(&MachineStatus::Stopped));
        assert!(guard.check(&MachineStatus::Maintenance));
        assert!(!guard.check(&MachineStatus::Error));
    }

    #[test]
    fn guard_is_deterministic() {
        let state = MachineStatus::Running;
        let guard = Guard::not_in(MachineStatus::Running, "is already running");

        assert_eq!(guard.check(&state), guard.check(&state));
    }

    #[test]
    fn evaluate_passes_when_predicate_holds() {
        let guard = Guard::new(
            |s: &MachineStatus| matches!(s, MachineStatus::Stopped | MachineStatus::Paused),
            "cannot start",
        );

        assert_eq!(guard.evaluate(&MachineStatus::Paused), Ok(()));
        assert_eq!(guard.reason(), "cannot start");
    }
}
