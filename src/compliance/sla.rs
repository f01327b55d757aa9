//! SLA violation derivation.
//!
//! Rules are evaluated independently over the latest metrics snapshot and
//! accumulated with `Validation`: every tripped rule is reported, not just
//! the first one. The decision holds no memory of earlier snapshots.

use crate::config::SlaThresholds;
use crate::model::PerformanceMetrics;
use serde::Serialize;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// One tripped compliance rule.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SlaBreach {
    #[error("efficiency {observed}% below minimum {minimum}%")]
    LowEfficiency { observed: f64, minimum: f64 },

    #[error("temperature {observed} above maximum {maximum}")]
    HighTemperature { observed: f64, maximum: f64 },

    #[error("vibration {observed} above maximum {maximum}")]
    HighVibration { observed: f64, maximum: f64 },

    #[error("custom rule failed: {message}")]
    Custom { message: String },
}

/// Type alias for custom SLA rule functions.
pub type SlaCheck =
    Box<dyn Fn(&PerformanceMetrics) -> Validation<(), NonEmptyVec<SlaBreach>> + Send + Sync>;

/// Outcome of evaluating a metrics snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationDecision {
    Compliant,
    Violated(Vec<SlaBreach>),
}

impl ViolationDecision {
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violated(_))
    }

    pub fn breaches(&self) -> &[SlaBreach] {
        match self {
            Self::Compliant => &[],
            Self::Violated(breaches) => breaches,
        }
    }
}

/// Threshold rules plus any custom checks.
///
/// Built with [`SlaPolicyBuilder`](super::SlaPolicyBuilder) or
/// [`SlaPolicy::from_thresholds`].
pub struct SlaPolicy {
    pub(crate) thresholds: SlaThresholds,
    pub(crate) custom_checks: Vec<SlaCheck>,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self::from_thresholds(SlaThresholds::default())
    }
}

impl SlaPolicy {
    pub fn from_thresholds(thresholds: SlaThresholds) -> Self {
        Self {
            thresholds,
            custom_checks: Vec::new(),
        }
    }

    pub fn thresholds(&self) -> &SlaThresholds {
        &self.thresholds
    }

    /// Evaluate every rule, accumulating ALL breaches.
    pub fn evaluate(&self, metrics: &PerformanceMetrics) -> Validation<(), NonEmptyVec<SlaBreach>> {
        let limits = &self.thresholds;
        let mut checks: Vec<Validation<(), NonEmptyVec<SlaBreach>>> = vec![
            rule(
                metrics.efficiency < limits.min_efficiency,
                SlaBreach::LowEfficiency {
                    observed: metrics.efficiency,
                    minimum: limits.min_efficiency,
                },
            ),
            rule(
                metrics.temperature > limits.max_temperature,
                SlaBreach::HighTemperature {
                    observed: metrics.temperature,
                    maximum: limits.max_temperature,
                },
            ),
            rule(
                metrics.vibration > limits.max_vibration,
                SlaBreach::HighVibration {
                    observed: metrics.vibration,
                    maximum: limits.max_vibration,
                },
            ),
        ];

        for check_fn in &self.custom_checks {
            checks.push(check_fn(metrics));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Collapse [`evaluate`](Self::evaluate) into a plain decision.
    pub fn decide(&self, metrics: &PerformanceMetrics) -> ViolationDecision {
        match self.evaluate(metrics) {
            Validation::Success(_) => ViolationDecision::Compliant,
            Validation::Failure(breaches) => {
                ViolationDecision::Violated(breaches.iter().cloned().collect())
            }
        }
    }
}

fn rule(tripped: bool, breach: SlaBreach) -> Validation<(), NonEmptyVec<SlaBreach>> {
    if tripped {
        Validation::fail(breach)
    } else {
        Validation::success(())
    }
}
