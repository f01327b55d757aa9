//! Plantledger: ledger-backed lifecycle tracking for industrial entities.
//!
//! Machines and material batches live on an append-only, key-addressable
//! ledger. Every accepted operation commits the updated entity, an
//! immutable audit record and a domain event together, and compliance
//! signals are derived from the recorded data:
//!
//! - **Machines** move through a guarded lifecycle (stopped, running,
//!   paused) and raise SLA violations when a metrics update breaks the
//!   configured thresholds.
//! - **Batches** record inputs, outputs, transfers and quality checks as
//!   process traces stamped with a SHA-256 integrity hash; outputs conserve
//!   quantity and complete the batch when it runs empty.
//!
//! Histories are rebuilt on demand by scanning the record keyspace.
//!
//! # Core Concepts
//!
//! - **State / Guard / History**: pure lifecycle building blocks in [`core`]
//! - **Ledger**: the substrate contract and the [`InMemoryLedger`] reference
//! - **Engines**: [`MachineCoordinator`] and [`ProcessTracer`]
//! - **Compliance**: SLA policy, integrity hashing, quantity conservation
//!
//! # Example
//!
//! ```rust
//! use plantledger::clock::ManualClock;
//! use plantledger::compliance::integrity;
//! use plantledger::{InMemoryLedger, MachineCoordinator, ProcessTracer};
//! use plantledger::model::{MachineRegistration, MaterialMovement, MetricsReading};
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let clock = Arc::new(ManualClock::ticking(1_700_000_000_000, 1));
//!
//! let machines = MachineCoordinator::new(Arc::clone(&ledger)).with_clock(clock.clone());
//! machines.register(MachineRegistration {
//!     machine_id: "M1".to_string(),
//!     name: "Extruder".to_string(),
//!     machine_type: "extruder".to_string(),
//!     location: "Plant A".to_string(),
//!     operator: "op1".to_string(),
//!     uptime_target: 95.0,
//!     response_time_target: 1000.0,
//! })?;
//! machines.start("M1", "op1", None)?;
//!
//! let decision = machines.update_performance_metrics("M1", MetricsReading {
//!     efficiency: 75.0,
//!     temperature: 85.0,
//!     vibration: 3.0,
//!     ..MetricsReading::default()
//! })?;
//! assert!(decision.is_violation());
//!
//! let batches = ProcessTracer::new(Arc::clone(&ledger)).with_clock(clock);
//! batches.create_batch("B1", "steel", "Supplier1", 1000)?;
//! batches.record_output("B1", MaterialMovement::new(300, "Store1", "Line1", "P1", "op1"))?;
//!
//! let history = batches.trace_history("B1")?;
//! assert!(history.records().iter().all(integrity::verify));
//! assert_eq!(batches.batch("B1")?.current_quantity, 700);
//! # Ok::<(), plantledger::TrackError>(())
//! ```

pub mod checkpoint;
pub mod clock;
pub mod compliance;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod model;
pub mod reconstruct;
pub mod store;

// Re-export commonly used types
pub use crate::core::{AuditRecord, Guard, History, State};
pub use config::EngineConfig;
pub use engine::{MachineCoordinator, ProcessTracer};
pub use error::{Result, TrackError};
pub use events::DomainEvent;
pub use ledger::{InMemoryLedger, Ledger};
