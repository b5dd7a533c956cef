//! Aggregate outcome of a run

use crate::models::zone::ZoneStatistics;
use serde::{Deserialize, Serialize};

/// Passenger-level aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerStatistics {
    /// Every passenger generated, whatever their final state
    pub total_passengers: u64,
    pub completed_passengers: u64,
    /// Still in the terminal when the run ended
    pub abandoned_passengers: u64,
    /// Completed passengers who finished after their flight deadline
    pub missed_flights: u64,
    /// `missed_flights / completed_passengers`, 0 when nobody completed
    pub missed_flight_rate: f64,
    /// Mean over completed passengers, 0 when nobody completed
    pub avg_time_in_airport: f64,
}

/// Everything a caller gets back from a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Per-zone statistics in configuration order
    pub zones: Vec<ZoneStatistics>,
    pub passengers: PassengerStatistics,
    /// Virtual time at which the run ended
    pub simulation_time: f64,
    /// The run was cut short by a stop request
    pub stopped_early: bool,
    /// SHA-256 of the canonical config JSON
    pub config_hash: String,
}

impl SimulationResult {
    pub fn zone(&self, name: &str) -> Option<&ZoneStatistics> {
        self.zones.iter().find(|z| z.zone_name == name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
