//! Passenger records and lifecycle
//!
//! A passenger is created by the arrival generator, walked through its route
//! by the itinerary process, and kept afterwards for aggregate statistics.
//!
//! ```text
//! Created → (Waiting(zone) ⇄ InService(zone))* → Completed
//!                         ↘ Abandoned (horizon reached or run stopped)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential passenger identifier (starts at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassengerId(pub u64);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pax_{:06}", self.0)
    }
}

/// Ticket class. Declaration order is the sampling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PassengerClass {
    Economy,
    Business,
    First,
}

impl PassengerClass {
    pub const ALL: [PassengerClass; 3] = [
        PassengerClass::Economy,
        PassengerClass::Business,
        PassengerClass::First,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerClass::Economy => "Economy",
            PassengerClass::Business => "Business",
            PassengerClass::First => "First",
        }
    }
}

/// Where a passenger is in its itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PassengerState {
    Created,
    /// Queued for a slot at the zone
    Waiting { zone: String, queued_at: f64 },
    /// Holding a slot at the zone
    InService {
        zone: String,
        queued_at: f64,
        wait_time: f64,
        service_time: f64,
    },
    Completed,
    Abandoned,
}

impl PassengerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PassengerState::Completed | PassengerState::Abandoned)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PassengerState::Created => "Created",
            PassengerState::Waiting { .. } => "Waiting",
            PassengerState::InService { .. } => "InService",
            PassengerState::Completed => "Completed",
            PassengerState::Abandoned => "Abandoned",
        }
    }
}

/// One completed pass through a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneVisit {
    pub zone: String,
    /// Time the passenger reached the zone's queue
    pub queued_at: f64,
    pub wait_time: f64,
    pub service_time: f64,
}

/// A single passenger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    id: PassengerId,
    class: PassengerClass,
    arrival_time: f64,
    flight_deadline: f64,
    /// Zone names to walk, in order
    route: Vec<String>,
    /// Index of the next route step
    next_step: usize,
    visits: Vec<ZoneVisit>,
    total_time_in_airport: f64,
    missed_flight: bool,
    state: PassengerState,
}

impl Passenger {
    /// Create a passenger that has just arrived
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::models::{Passenger, PassengerClass, PassengerId};
    ///
    /// let pax = Passenger::new(
    ///     PassengerId(1),
    ///     PassengerClass::Business,
    ///     12.5,
    ///     100.0,
    ///     vec!["Check-In Business".to_string(), "Security".to_string()],
    /// );
    /// assert_eq!(pax.remaining_route(), ["Check-In Business", "Security"]);
    /// assert!(pax.zones_visited().is_empty());
    /// ```
    pub fn new(
        id: PassengerId,
        class: PassengerClass,
        arrival_time: f64,
        flight_deadline: f64,
        route: Vec<String>,
    ) -> Self {
        Self {
            id,
            class,
            arrival_time,
            flight_deadline,
            route,
            next_step: 0,
            visits: Vec::new(),
            total_time_in_airport: 0.0,
            missed_flight: false,
            state: PassengerState::Created,
        }
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn class(&self) -> PassengerClass {
        self.class
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn flight_deadline(&self) -> f64 {
        self.flight_deadline
    }

    pub fn route(&self) -> &[String] {
        &self.route
    }

    /// Route steps not yet attempted
    pub fn remaining_route(&self) -> &[String] {
        &self.route[self.next_step.min(self.route.len())..]
    }

    /// Timed record of every zone actually served
    pub fn visits(&self) -> &[ZoneVisit] {
        &self.visits
    }

    /// Names of zones actually served, in order
    pub fn zones_visited(&self) -> Vec<&str> {
        self.visits.iter().map(|v| v.zone.as_str()).collect()
    }

    /// Time from arrival to finishing the last zone (0 unless completed)
    pub fn total_time_in_airport(&self) -> f64 {
        self.total_time_in_airport
    }

    pub fn missed_flight(&self) -> bool {
        self.missed_flight
    }

    pub fn state(&self) -> &PassengerState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == PassengerState::Completed
    }

    pub fn is_abandoned(&self) -> bool {
        self.state == PassengerState::Abandoned
    }

    /// Take the next route step, if any, advancing past it
    pub(crate) fn take_next_step(&mut self) -> Option<String> {
        let step = self.route.get(self.next_step).cloned();
        if step.is_some() {
            self.next_step += 1;
        }
        step
    }

    pub(crate) fn set_state(&mut self, state: PassengerState) {
        self.state = state;
    }

    pub(crate) fn record_visit(&mut self, visit: ZoneVisit) {
        self.visits.push(visit);
    }

    /// Close out the itinerary at time `now`
    pub(crate) fn complete(&mut self, now: f64) {
        self.total_time_in_airport = now - self.arrival_time;
        self.missed_flight = now > self.flight_deadline;
        self.state = PassengerState::Completed;
    }

    pub(crate) fn abandon(&mut self) {
        self.state = PassengerState::Abandoned;
    }
}
