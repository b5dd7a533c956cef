//! Airport Simulator Core - Rust Engine
//!
//! Discrete-event simulation of passengers flowing through airport service
//! zones, with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Virtual clock and continuation scheduler
//! - **models**: Domain types (Resource, Zone, Airport, Passenger, Event)
//! - **arrivals**: Poisson passenger generator and class routing
//! - **orchestrator**: Config, main event loop, itinerary process, results
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG)
//! 2. Continuations resume in `(time, scheduling order)` order
//! 3. A zone never serves more than `capacity` passengers at once
//! 4. FFI boundary is minimal and safe
//!
//! # Example
//!
//! ```rust
//! use airport_simulator_core_rs::{SimulationConfig, SimulationEngine};
//!
//! let config = SimulationConfig::default().with_seed(7);
//! let mut engine = SimulationEngine::new(config).unwrap();
//! let result = engine.run().unwrap();
//!
//! assert_eq!(result.zones.len(), 8);
//! assert!(result.passengers.missed_flight_rate <= 1.0);
//! ```

// Module declarations
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use arrivals::{ClassDistribution, DeadlineWindow, PassengerFlow, RoutingTable};
pub use core::time::{Scheduler, SchedulerError};
pub use models::{
    airport::Airport,
    event::{Event, EventLog},
    passenger::{Passenger, PassengerClass, PassengerId, PassengerState},
    zone::{Zone, ZoneConfig, ZoneStatistics, ZoneType},
};
pub use orchestrator::{
    compute_config_hash, ConfigError, PassengerStatistics, RunFailure, SimulationConfig,
    SimulationEngine, SimulationError, SimulationResult, StopHandle,
};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn airport_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engine::PySimulation>()?;
    m.add_function(wrap_pyfunction!(ffi::engine::default_config, m)?)?;
    Ok(())
}
