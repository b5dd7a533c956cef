//! Orchestrator - configuration, event loop and results
//!
//! See `engine.rs` for the main loop and `itinerary.rs` for the passenger
//! process it resumes.

pub mod config;
pub mod context;
pub mod engine;
pub mod fingerprint;
pub mod itinerary;
pub mod result;

// Re-export main types for convenience
pub use config::{default_zones, ConfigError, SimulationConfig, DEFAULT_SEED};
pub use context::{SimContext, SimEvent};
pub use engine::{RunFailure, SimulationEngine, SimulationError, StopHandle};
pub use fingerprint::compute_config_hash;
pub use result::{PassengerStatistics, SimulationResult};
