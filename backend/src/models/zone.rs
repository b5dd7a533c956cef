//! Service zones
//!
//! A zone is one station of the airport (a check-in hall, a security lane
//! group, ...). It owns a [`Resource`] of `capacity` parallel servers, draws
//! service durations from a clamped normal distribution and accumulates the
//! statistics reported at the end of a run.
//!
//! Serving a passenger spans two suspension points, so the zone exposes the
//! operation in three parts:
//!
//! ```text
//! arrive()         sample queue length, acquire a slot (may queue)
//! start_service()  slot granted: compute wait, draw duration, schedule timeout
//! finish_service() timeout fired: release slot, record stats, hand slot on
//! ```

use crate::models::passenger::{PassengerId, ZoneVisit};
use crate::models::resource::{Admission, Resource, ResourceError};
use crate::orchestrator::context::{SimContext, SimEvent};
use crate::core::time::SchedulerError;
use serde::{Deserialize, Serialize};

/// Service durations never drop below this many minutes
pub const MIN_SERVICE_TIME: f64 = 0.1;

/// Index of a zone inside the [`crate::models::Airport`] registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

/// Kind of station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    CheckIn,
    Security,
    PassportControl,
    Gate,
    Boarding,
}

/// Static configuration of one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Unique zone name; routes refer to zones by this name
    pub name: String,

    /// Number of parallel servers
    pub capacity: usize,

    /// Mean service time (minutes)
    pub service_time_mean: f64,

    /// Standard deviation of service time (minutes)
    pub service_time_std: f64,

    #[serde(default)]
    pub zone_type: Option<ZoneType>,
}

impl ZoneConfig {
    pub fn new(name: &str, capacity: usize, service_time_mean: f64, service_time_std: f64) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            service_time_mean,
            service_time_std,
            zone_type: None,
        }
    }

    pub fn with_type(mut self, zone_type: ZoneType) -> Self {
        self.zone_type = Some(zone_type);
        self
    }
}

/// End-of-run statistics for one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub zone_name: String,
    pub zone_type: Option<ZoneType>,
    pub capacity: usize,
    pub total_served: u64,
    pub avg_wait_time: f64,
    pub avg_service_time: f64,
    /// Unweighted mean of the queue lengths seen by arriving passengers.
    /// Not a time-average of queue occupancy.
    pub avg_queue_length: f64,
    /// Busy server-time over available server-time, computed from the
    /// post-hoc mean service time. Can exceed 1.0.
    pub utilization: f64,
}

/// A service station with its accumulators
#[derive(Debug, Clone)]
pub struct Zone {
    id: ZoneId,
    config: ZoneConfig,
    resource: Resource,
    total_served: u64,
    total_wait_time: f64,
    service_times: Vec<f64>,
    /// (timestamp, waiting queue length) at each arrival
    queue_samples: Vec<(f64, usize)>,
}

impl Zone {
    /// # Errors
    ///
    /// `ResourceError::ZeroCapacity` if the config asks for no servers.
    pub fn new(id: ZoneId, config: ZoneConfig) -> Result<Self, ResourceError> {
        let resource = Resource::new(config.capacity)?;
        Ok(Self {
            id,
            config,
            resource,
            total_served: 0,
            total_wait_time: 0.0,
            service_times: Vec::new(),
            queue_samples: Vec::new(),
        })
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn total_served(&self) -> u64 {
        self.total_served
    }

    pub fn total_wait_time(&self) -> f64 {
        self.total_wait_time
    }

    pub fn service_times(&self) -> &[f64] {
        &self.service_times
    }

    pub fn queue_samples(&self) -> &[(f64, usize)] {
        &self.queue_samples
    }

    /// Passengers currently holding a slot
    pub fn in_service(&self) -> usize {
        self.resource.held()
    }

    /// Passengers currently waiting for a slot
    pub fn queue_len(&self) -> usize {
        self.resource.queue_len()
    }

    /// A passenger reaches the zone
    ///
    /// Records the waiting-queue length as seen on arrival, before any grant,
    /// then requests a slot.
    pub fn arrive(&mut self, ctx: &SimContext<'_>, passenger: PassengerId) -> Admission {
        self.queue_samples
            .push((ctx.now(), self.resource.queue_len()));
        self.resource.acquire(passenger)
    }

    /// The passenger holds a slot; begin serving it
    ///
    /// Returns `(wait_time, service_time)` and schedules the matching
    /// `ServiceComplete` continuation.
    pub fn start_service(
        &mut self,
        ctx: &mut SimContext<'_>,
        passenger: PassengerId,
        queued_at: f64,
    ) -> Result<(f64, f64), SchedulerError> {
        let wait_time = (ctx.now() - queued_at).max(0.0);
        let service_time = self.sample_service_time(ctx);
        ctx.scheduler.schedule_after(
            service_time,
            SimEvent::ServiceComplete {
                passenger,
                zone: self.id,
            },
        )?;
        Ok((wait_time, service_time))
    }

    /// The service timeout fired
    ///
    /// Releases the slot and records the visit. Returns the waiter that was
    /// handed the slot, if any.
    pub fn finish_service(&mut self, visit: &ZoneVisit) -> Result<Option<PassengerId>, ResourceError> {
        let next = self.resource.release()?;
        self.total_served += 1;
        self.total_wait_time += visit.wait_time;
        self.service_times.push(visit.service_time);
        Ok(next)
    }

    fn sample_service_time(&self, ctx: &mut SimContext<'_>) -> f64 {
        let raw = ctx
            .rng
            .normal(self.config.service_time_mean, self.config.service_time_std);
        raw.max(MIN_SERVICE_TIME)
    }

    /// Summarize the run so far
    ///
    /// `elapsed` is the simulated time over which utilization is measured.
    /// Every ratio falls back to 0 when its denominator is 0.
    pub fn statistics(&self, elapsed: f64) -> ZoneStatistics {
        let avg_wait_time = if self.total_served > 0 {
            self.total_wait_time / self.total_served as f64
        } else {
            0.0
        };
        let avg_service_time = mean(self.service_times.iter().copied());
        let avg_queue_length = mean(self.queue_samples.iter().map(|&(_, len)| len as f64));
        let utilization = if elapsed > 0.0 {
            self.total_served as f64 * avg_service_time / (elapsed * self.config.capacity as f64)
        } else {
            0.0
        };

        ZoneStatistics {
            zone_name: self.config.name.clone(),
            zone_type: self.config.zone_type,
            capacity: self.config.capacity,
            total_served: self.total_served,
            avg_wait_time,
            avg_service_time,
            avg_queue_length,
            utilization,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(wait: f64, service: f64) -> ZoneVisit {
        ZoneVisit {
            zone: "Desk".to_string(),
            queued_at: 0.0,
            wait_time: wait,
            service_time: service,
        }
    }

    #[test]
    fn test_empty_zone_statistics_are_zero() {
        let zone = Zone::new(ZoneId(0), ZoneConfig::new("Desk", 2, 1.0, 0.0)).unwrap();
        let stats = zone.statistics(0.0);
        assert_eq!(stats.total_served, 0);
        assert_eq!(stats.avg_wait_time, 0.0);
        assert_eq!(stats.avg_service_time, 0.0);
        assert_eq!(stats.avg_queue_length, 0.0);
        assert_eq!(stats.utilization, 0.0);
    }

    #[test]
    fn test_finish_service_accumulates() {
        let mut zone = Zone::new(ZoneId(0), ZoneConfig::new("Desk", 1, 1.0, 0.0)).unwrap();
        zone.resource.acquire(PassengerId(1));
        zone.resource.acquire(PassengerId(2));

        let next = zone.finish_service(&visit(0.0, 2.0)).unwrap();
        assert_eq!(next, Some(PassengerId(2)));
        let next = zone.finish_service(&visit(2.0, 4.0)).unwrap();
        assert_eq!(next, None);

        let stats = zone.statistics(10.0);
        assert_eq!(stats.total_served, 2);
        assert_eq!(stats.avg_wait_time, 1.0);
        assert_eq!(stats.avg_service_time, 3.0);
        // 2 * 3.0 / (10 * 1)
        assert!((stats.utilization - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_finish_without_holder_is_an_error() {
        let mut zone = Zone::new(ZoneId(0), ZoneConfig::new("Desk", 1, 1.0, 0.0)).unwrap();
        assert_eq!(
            zone.finish_service(&visit(0.0, 1.0)),
            Err(ResourceError::NotHeld)
        );
        assert_eq!(zone.total_served(), 0);
    }

    #[test]
    fn test_utilization_may_exceed_one() {
        let mut zone = Zone::new(ZoneId(0), ZoneConfig::new("Desk", 1, 1.0, 0.0)).unwrap();
        for _ in 0..3 {
            zone.resource.acquire(PassengerId(1));
            zone.finish_service(&visit(0.0, 5.0)).unwrap();
        }
        // 3 * 5.0 over 10 minutes of a single server
        assert!(zone.statistics(10.0).utilization > 1.0);
    }
}
