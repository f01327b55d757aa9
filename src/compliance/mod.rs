//! Compliance and integrity derivations.
//!
//! - SLA violation detection over machine metrics, using Stillwater's
//!   `Validation` to accumulate every tripped rule instead of stopping at
//!   the first one.
//! - Integrity hashes stamped on every process trace.
//! - Quantity conservation for batch outputs.
//!
//! Everything here is a pure function of its inputs; the engines decide
//! what to persist.
//!
//! # Example
//!
//! ```rust
//! use plantledger::compliance::{SlaPolicyBuilder, ViolationDecision};
//! use plantledger::model::{MetricsReading, PerformanceMetrics};
//!
//! let policy = SlaPolicyBuilder::new().max_temperature(85.0).build();
//! let reading = MetricsReading {
//!     temperature: 88.0,
//!     efficiency: 92.0,
//!     ..MetricsReading::default()
//! };
//!
//! let decision = policy.decide(&PerformanceMetrics::from_reading(&reading, 0));
//! assert!(decision.is_violation());
//! assert_ne!(decision, ViolationDecision::Compliant);
//! ```

pub mod builder;
pub mod integrity;
pub mod quantity;
pub mod sla;

pub use builder::SlaPolicyBuilder;
pub use quantity::Withdrawal;
pub use sla::{SlaBreach, SlaCheck, SlaPolicy, ViolationDecision};
