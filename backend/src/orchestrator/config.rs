//! Simulation configuration and validation
//!
//! `SimulationConfig` is the structured request the core accepts. It
//! deserializes from JSON with sensible defaults for every optional field,
//! and is validated in one fail-fast pass before any state is built.

use crate::arrivals::{ClassDistribution, DeadlineWindow, RoutingTable};
use crate::models::passenger::PassengerClass;
use crate::models::zone::{ZoneConfig, ZoneType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Seed used when the config does not name one
pub const DEFAULT_SEED: u64 = 12345;

/// Configuration validation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("arrival_rate must be finite and >= 0, got {0}")]
    InvalidArrivalRate(f64),

    #[error("duration must be finite and > 0, got {0}")]
    InvalidDuration(f64),

    #[error("zone name must not be empty")]
    EmptyZoneName,

    #[error("zone '{zone}': capacity must be >= 1, got {capacity}")]
    InvalidCapacity { zone: String, capacity: usize },

    #[error("zone '{zone}': service_time_mean must be finite and > 0, got {mean}")]
    InvalidServiceMean { zone: String, mean: f64 },

    #[error("zone '{zone}': service_time_std must be finite and >= 0, got {std}")]
    InvalidServiceStd { zone: String, std: f64 },

    #[error("duplicate zone name: {0}")]
    DuplicateZone(String),

    #[error("probability for {class:?} must be finite and >= 0, got {probability}")]
    InvalidClassProbability {
        class: PassengerClass,
        probability: f64,
    },

    #[error("class probabilities sum to {0}, must be <= 1.0")]
    ClassProbabilitiesExceedOne(f64),

    #[error("deadline window must satisfy 0 <= min <= max (finite), got [{min}, {max}]")]
    InvalidDeadlineWindow { min: f64, max: f64 },
}

/// Complete simulation configuration
///
/// # Example
///
/// ```rust
/// use airport_simulator_core_rs::SimulationConfig;
///
/// let json = r#"{
///     "arrival_rate": 1.0,
///     "duration": 60.0,
///     "zones": [
///         {"name": "Check-In", "capacity": 4, "service_time_mean": 3.0, "service_time_std": 1.0}
///     ]
/// }"#;
/// let config: SimulationConfig = serde_json::from_str(json).unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed, 12345);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Mean passenger arrivals per minute (Poisson rate)
    pub arrival_rate: f64,

    /// Simulation horizon in minutes; arrivals stop here too
    pub duration: f64,

    /// Service zones, in reporting order
    pub zones: Vec<ZoneConfig>,

    /// Probability of each passenger class
    #[serde(default)]
    pub class_distribution: ClassDistribution,

    /// Zone sequence per class
    #[serde(default)]
    pub routes: RoutingTable,

    /// Flight deadline offset from arrival (minutes)
    #[serde(default)]
    pub deadline_window: DeadlineWindow,

    /// RNG seed for deterministic simulation
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Keep a full event log of the run
    #[serde(default)]
    pub record_events: bool,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for SimulationConfig {
    /// The reference airport: 2 passengers/min over an 8-hour window
    fn default() -> Self {
        Self {
            arrival_rate: 2.0,
            duration: 480.0,
            zones: default_zones(),
            class_distribution: ClassDistribution::default(),
            routes: RoutingTable::default(),
            deadline_window: DeadlineWindow::default(),
            seed: DEFAULT_SEED,
            record_events: false,
        }
    }
}

/// Zones of the reference airport, matching [`RoutingTable::default`]
pub fn default_zones() -> Vec<ZoneConfig> {
    vec![
        // Economy
        ZoneConfig::new("Check-In", 8, 3.0, 1.0).with_type(ZoneType::CheckIn),
        ZoneConfig::new("Security", 4, 2.0, 0.5).with_type(ZoneType::Security),
        ZoneConfig::new("Passport Control", 6, 1.5, 0.3).with_type(ZoneType::PassportControl),
        ZoneConfig::new("Gate", 20, 0.5, 0.1).with_type(ZoneType::Gate),
        ZoneConfig::new("Boarding", 2, 1.0, 0.2).with_type(ZoneType::Boarding),
        // Business
        ZoneConfig::new("Check-In Business", 2, 2.0, 0.5).with_type(ZoneType::CheckIn),
        // VIP
        ZoneConfig::new("Check-In VIP", 1, 1.5, 0.3).with_type(ZoneType::CheckIn),
        ZoneConfig::new("Security VIP", 1, 1.0, 0.2).with_type(ZoneType::Security),
    ]
}

impl SimulationConfig {
    /// Config with the given arrival process and zones; everything else default
    pub fn new(arrival_rate: f64, duration: f64, zones: Vec<ZoneConfig>) -> Self {
        Self {
            arrival_rate,
            duration,
            zones,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_routes(mut self, routes: RoutingTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_class_distribution(mut self, classes: ClassDistribution) -> Self {
        self.class_distribution = classes;
        self
    }

    pub fn with_event_log(mut self, record: bool) -> Self {
        self.record_events = record;
        self
    }

    /// Check every field; first violation wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.arrival_rate.is_finite() || self.arrival_rate < 0.0 {
            return Err(ConfigError::InvalidArrivalRate(self.arrival_rate));
        }

        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration));
        }

        let mut names = HashSet::new();
        for zone in &self.zones {
            validate_zone(zone)?;
            if !names.insert(zone.name.as_str()) {
                return Err(ConfigError::DuplicateZone(zone.name.clone()));
            }
        }

        self.class_distribution.validate()?;
        self.deadline_window.validate()?;

        Ok(())
    }

    /// Route targets that no configured zone provides
    ///
    /// Not an error: passengers skip these steps at run time.
    pub fn unknown_route_targets(&self) -> Vec<String> {
        let known: HashSet<&str> = self.zones.iter().map(|z| z.name.as_str()).collect();
        self.routes
            .referenced_zones()
            .into_iter()
            .filter(|name| !known.contains(name))
            .map(str::to_string)
            .collect()
    }
}

pub(crate) fn validate_zone(zone: &ZoneConfig) -> Result<(), ConfigError> {
    if zone.name.trim().is_empty() {
        return Err(ConfigError::EmptyZoneName);
    }
    if zone.capacity < 1 {
        return Err(ConfigError::InvalidCapacity {
            zone: zone.name.clone(),
            capacity: zone.capacity,
        });
    }
    if !zone.service_time_mean.is_finite() || zone.service_time_mean <= 0.0 {
        return Err(ConfigError::InvalidServiceMean {
            zone: zone.name.clone(),
            mean: zone.service_time_mean,
        });
    }
    if !zone.service_time_std.is_finite() || zone.service_time_std < 0.0 {
        return Err(ConfigError::InvalidServiceStd {
            zone: zone.name.clone(),
            std: zone.service_time_std,
        });
    }
    Ok(())
}
