//! Builder API for SLA policies.

use crate::compliance::sla::{SlaBreach, SlaCheck, SlaPolicy};
use crate::config::SlaThresholds;
use crate::model::PerformanceMetrics;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating SLA policies
pub struct SlaPolicyBuilder {
    thresholds: SlaThresholds,
    custom_checks: Vec<SlaCheck>,
}

impl SlaPolicyBuilder {
    pub fn new() -> Self {
        Self {
            thresholds: SlaThresholds::default(),
            custom_checks: Vec::new(),
        }
    }

    /// Replace all built-in thresholds at once
    pub fn thresholds(mut self, thresholds: SlaThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn min_efficiency(mut self, percent: f64) -> Self {
        self.thresholds.min_efficiency = percent;
        self
    }

    pub fn max_temperature(mut self, limit: f64) -> Self {
        self.thresholds.max_temperature = limit;
        self
    }

    pub fn max_vibration(mut self, limit: f64) -> Self {
        self.thresholds.max_vibration = limit;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&PerformanceMetrics) -> Validation<(), NonEmptyVec<SlaBreach>>
            + Send
            + Sync
            + 'static,
    {
        self.custom_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&PerformanceMetrics) -> bool + Send + Sync + 'static,
    {
        let check = move |metrics: &PerformanceMetrics| {
            if predicate(metrics) {
                Validation::success(())
            } else {
                Validation::fail(SlaBreach::Custom {
                    message: error_msg.clone(),
                })
            }
        };
        self.custom_checks.push(Box::new(check));
        self
    }

    pub fn build(self) -> SlaPolicy {
        SlaPolicy {
            thresholds: self.thresholds,
            custom_checks: self.custom_checks,
        }
    }
}

impl Default for SlaPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_override_defaults() {
        let policy = SlaPolicyBuilder::new()
            .min_efficiency(60.0)
            .max_temperature(120.0)
            .max_vibration(4.0)
            .build();

        assert_eq!(policy.thresholds().min_efficiency, 60.0);
        assert_eq!(policy.thresholds().max_temperature, 120.0);
        assert_eq!(policy.thresholds().max_vibration, 4.0);
    }

    #[test]
    fn custom_validation_check_works() {
        let policy = SlaPolicyBuilder::new()
            .require(|m: &PerformanceMetrics| {
                if m.pressure <= 8.0 {
                    Validation::success(())
                } else {
                    Validation::fail(SlaBreach::Custom {
                        message: "pressure above 8 bar".to_string(),
                    })
                }
            })
            .build();

        let mut metrics = PerformanceMetrics::zeroed(0);
        metrics.efficiency = 99.0;
        assert!(policy.evaluate(&metrics).is_success());

        metrics.pressure = 9.0;
        assert!(policy.evaluate(&metrics).is_failure());
    }
}
