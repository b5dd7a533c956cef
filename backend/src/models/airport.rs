//! Airport: registry of zones, looked up by name
//!
//! Zones keep their configuration order, which is also the order of the
//! per-zone statistics in the result.

use crate::models::zone::{Zone, ZoneConfig, ZoneId, ZoneStatistics};
use crate::orchestrator::config::{validate_zone, ConfigError};
use std::collections::HashMap;

/// All zones of one simulated airport
///
/// # Example
///
/// ```rust
/// use airport_simulator_core_rs::models::{Airport, ZoneConfig};
///
/// let airport = Airport::new(vec![
///     ZoneConfig::new("Check-In", 8, 3.0, 1.0),
///     ZoneConfig::new("Security", 4, 2.0, 0.5),
/// ])
/// .unwrap();
/// assert_eq!(airport.num_zones(), 2);
/// assert!(airport.zone_by_name("Security").is_some());
/// assert!(airport.zone_by_name("Lounge").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Airport {
    zones: Vec<Zone>,
    index: HashMap<String, ZoneId>,
}

impl Airport {
    /// Build one zone per config
    ///
    /// # Errors
    ///
    /// The first invalid zone config, or `ConfigError::DuplicateZone` when
    /// two zones share a name.
    pub fn new(configs: Vec<ZoneConfig>) -> Result<Self, ConfigError> {
        let mut zones = Vec::with_capacity(configs.len());
        let mut index = HashMap::with_capacity(configs.len());
        for (i, config) in configs.into_iter().enumerate() {
            validate_zone(&config)?;
            let id = ZoneId(i);
            if index.insert(config.name.clone(), id).is_some() {
                return Err(ConfigError::DuplicateZone(config.name));
            }
            let (name, capacity) = (config.name.clone(), config.capacity);
            let zone = Zone::new(id, config)
                .map_err(|_| ConfigError::InvalidCapacity { zone: name, capacity })?;
            zones.push(zone);
        }
        Ok(Self { zones, index })
    }

    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    /// Resolve a zone name
    pub fn lookup(&self, name: &str) -> Option<ZoneId> {
        self.index.get(name).copied()
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.0)
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(id.0)
    }

    pub fn zone_by_name(&self, name: &str) -> Option<&Zone> {
        self.lookup(name).and_then(|id| self.zone(id))
    }

    /// Zones in configuration order
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Statistics of every zone, in configuration order
    pub fn statistics(&self, elapsed: f64) -> Vec<ZoneStatistics> {
        self.zones.iter().map(|z| z.statistics(elapsed)).collect()
    }
}
