//! Passenger arrival generation
//!
//! The arrival generator is a Poisson process: gaps between passengers are
//! independent exponential draws with rate `arrival_rate` (passengers per
//! minute). Each arrival gets a class, a flight deadline and its class's
//! route, then its itinerary is spawned without blocking the generator.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **Bounded window**: No new passenger is generated once `now >= duration`;
//!    itineraries already spawned keep running
//! 3. **Degenerate rate**: `arrival_rate == 0` generates nobody

pub mod routing;

pub use routing::RoutingTable;

use crate::core::time::SchedulerError;
use crate::models::event::Event;
use crate::models::passenger::{Passenger, PassengerClass, PassengerId};
use crate::orchestrator::config::ConfigError;
use crate::orchestrator::context::{SimContext, SimEvent};
use crate::orchestrator::result::PassengerStatistics;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Tolerance for the class-probability sum check
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Categorical distribution over passenger classes
///
/// Sampling walks the classes in declaration order (Economy, Business,
/// First) accumulating probability, and picks the first class whose
/// cumulative probability reaches the uniform draw. If rounding (or a sum
/// below 1.0) leaves no match, the passenger is Economy.
///
/// # Example
/// ```
/// use airport_simulator_core_rs::arrivals::ClassDistribution;
/// use airport_simulator_core_rs::models::PassengerClass;
///
/// let classes = ClassDistribution::default();
/// assert_eq!(classes.pick(0.10), PassengerClass::Economy);
/// assert_eq!(classes.pick(0.80), PassengerClass::Business);
/// assert_eq!(classes.pick(0.97), PassengerClass::First);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassDistribution(BTreeMap<PassengerClass, f64>);

impl Default for ClassDistribution {
    fn default() -> Self {
        Self::new([
            (PassengerClass::Economy, 0.7),
            (PassengerClass::Business, 0.25),
            (PassengerClass::First, 0.05),
        ])
    }
}

impl ClassDistribution {
    pub fn new(weights: impl IntoIterator<Item = (PassengerClass, f64)>) -> Self {
        Self(weights.into_iter().collect())
    }

    /// Every passenger gets the same class
    pub fn only(class: PassengerClass) -> Self {
        Self::new([(class, 1.0)])
    }

    pub fn probability(&self, class: PassengerClass) -> f64 {
        self.0.get(&class).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&class, &probability) in &self.0 {
            if !probability.is_finite() || probability < 0.0 {
                return Err(ConfigError::InvalidClassProbability { class, probability });
            }
        }
        let total = self.total();
        if total > 1.0 + PROBABILITY_EPSILON {
            return Err(ConfigError::ClassProbabilitiesExceedOne(total));
        }
        Ok(())
    }

    /// Map a uniform draw `u` in [0, 1) to a class
    pub fn pick(&self, u: f64) -> PassengerClass {
        let mut cumulative = 0.0;
        for (&class, &probability) in &self.0 {
            cumulative += probability;
            if u <= cumulative {
                return class;
            }
        }
        PassengerClass::Economy
    }

    pub fn sample(&self, rng: &mut RngManager) -> PassengerClass {
        self.pick(rng.next_f64())
    }
}

/// Flight deadline offset window, relative to arrival (minutes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadlineWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for DeadlineWindow {
    fn default() -> Self {
        Self {
            min: 60.0,
            max: 180.0,
        }
    }
}

impl DeadlineWindow {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidDeadlineWindow {
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn sample(&self, rng: &mut RngManager) -> f64 {
        rng.uniform(self.min, self.max)
    }
}

/// Arrival generator and owner of every passenger record
#[derive(Debug, Clone)]
pub struct PassengerFlow {
    arrival_rate: f64,
    duration: f64,
    classes: ClassDistribution,
    deadline_window: DeadlineWindow,
    routes: RoutingTable,
    passengers: Vec<Passenger>,
}

impl PassengerFlow {
    pub fn new(
        arrival_rate: f64,
        duration: f64,
        classes: ClassDistribution,
        deadline_window: DeadlineWindow,
        routes: RoutingTable,
    ) -> Self {
        Self {
            arrival_rate,
            duration,
            classes,
            deadline_window,
            routes,
            passengers: Vec::new(),
        }
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Suspend the generator until the next arrival
    ///
    /// Draws an exponential gap and schedules `NextArrival`. Returns `false`
    /// (scheduling nothing) once the arrival window is closed or the rate is
    /// zero.
    pub fn schedule_next(&self, ctx: &mut SimContext<'_>) -> Result<bool, SchedulerError> {
        if self.arrival_rate <= 0.0 || ctx.now() >= self.duration {
            return Ok(false);
        }
        let gap = ctx.rng.exponential(self.arrival_rate);
        ctx.scheduler.schedule_after(gap, SimEvent::NextArrival)?;
        Ok(true)
    }

    /// The generator resumed: create the arriving passenger
    ///
    /// The caller is responsible for spawning the itinerary.
    pub fn on_arrival(&mut self, ctx: &mut SimContext<'_>) -> PassengerId {
        let now = ctx.now();
        let class = self.classes.sample(ctx.rng);
        let flight_deadline = now + self.deadline_window.sample(ctx.rng);
        let id = PassengerId(self.passengers.len() as u64 + 1);
        let route = self.routes.route_for(class).to_vec();

        debug!(passenger = %id, ?class, time = now, flight_deadline, "passenger arrived");
        ctx.log.log(Event::PassengerArrived {
            time: now,
            passenger: id,
            class,
            flight_deadline,
        });

        self.passengers
            .push(Passenger::new(id, class, now, flight_deadline, route));
        id
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        index_of(id).and_then(|i| self.passengers.get(i))
    }

    pub fn passenger_mut(&mut self, id: PassengerId) -> Option<&mut Passenger> {
        index_of(id).and_then(move |i| self.passengers.get_mut(i))
    }

    /// Mark every passenger still in the terminal as abandoned
    ///
    /// Returns how many were abandoned.
    pub fn abandon_in_flight(&mut self, ctx: &mut SimContext<'_>) -> usize {
        let now = ctx.now();
        let mut abandoned = 0;
        for passenger in self.passengers.iter_mut().filter(|p| !p.state().is_terminal()) {
            ctx.log.log(Event::PassengerAbandoned {
                time: now,
                passenger: passenger.id(),
                last_state: passenger.state().name().to_string(),
            });
            passenger.abandon();
            abandoned += 1;
        }
        abandoned
    }

    /// Aggregate statistics
    ///
    /// Missed flights and time in airport cover completed passengers only;
    /// abandoned passengers are counted in `total_passengers` and
    /// `abandoned_passengers`.
    pub fn statistics(&self) -> PassengerStatistics {
        let total_passengers = self.passengers.len() as u64;
        let completed: Vec<&Passenger> = self.passengers.iter().filter(|p| p.is_completed()).collect();
        let completed_passengers = completed.len() as u64;
        let abandoned_passengers = self.passengers.iter().filter(|p| p.is_abandoned()).count() as u64;
        let missed_flights = completed.iter().filter(|p| p.missed_flight()).count() as u64;

        let (missed_flight_rate, avg_time_in_airport) = if completed_passengers > 0 {
            let n = completed_passengers as f64;
            let total_time: f64 = completed.iter().map(|p| p.total_time_in_airport()).sum();
            (missed_flights as f64 / n, total_time / n)
        } else {
            (0.0, 0.0)
        };

        PassengerStatistics {
            total_passengers,
            completed_passengers,
            abandoned_passengers,
            missed_flights,
            missed_flight_rate,
            avg_time_in_airport,
        }
    }
}

fn index_of(id: PassengerId) -> Option<usize> {
    (id.0 as usize).checked_sub(1)
}
