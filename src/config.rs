//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Limits for the built-in SLA rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlaThresholds {
    /// Efficiency below this percentage is a violation.
    pub min_efficiency: f64,
    /// Temperature above this is a violation.
    pub max_temperature: f64,
    /// Vibration above this is a violation.
    pub max_vibration: f64,
}

impl Default for SlaThresholds {
    fn default() -> Self {
        Self {
            min_efficiency: 80.0,
            max_temperature: 90.0,
            max_vibration: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub sla: SlaThresholds,
    /// Days from registration until maintenance is due.
    pub maintenance_interval_days: u32,
    /// Label carried by `SLAViolation` events.
    pub violation_type: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sla: SlaThresholds::default(),
            maintenance_interval_days: 30,
            violation_type: "performance".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sla = &self.sla;
        if !(sla.min_efficiency.is_finite()
            && sla.max_temperature.is_finite()
            && sla.max_vibration.is_finite())
        {
            return Err(ConfigError::Invalid(
                "SLA thresholds must be finite numbers".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&sla.min_efficiency) {
            return Err(ConfigError::Invalid(format!(
                "minEfficiency must be a percentage, got {}",
                sla.min_efficiency
            )));
        }
        if self.maintenance_interval_days == 0 {
            return Err(ConfigError::Invalid(
                "maintenanceIntervalDays must be positive".to_string(),
            ));
        }
        if self.violation_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "violationType must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn maintenance_interval_ms(&self) -> i64 {
        Duration::days(i64::from(self.maintenance_interval_days)).num_milliseconds()
    }
}
