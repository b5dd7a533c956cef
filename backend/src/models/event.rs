//! Event logging for replay and auditing
//!
//! Every passenger-visible state change can be recorded as an [`Event`].
//! The log is optional (`SimulationConfig::record_events`) and never feeds
//! back into the simulation.
//!
//! # Example
//!
//! ```rust
//! use airport_simulator_core_rs::models::{Event, EventLog, PassengerId};
//!
//! let mut log = EventLog::new();
//! log.log(Event::ZoneSkipped {
//!     time: 4.2,
//!     passenger: PassengerId(3),
//!     zone: "Lounge".to_string(),
//! });
//! assert_eq!(log.events_of_type("ZoneSkipped").len(), 1);
//! assert_eq!(log.events()[0].time(), 4.2);
//! ```

use crate::models::passenger::{PassengerClass, PassengerId};
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change
///
/// Events are logged in the order their continuations run, so the log is
/// ordered by `time` with ties in scheduling order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// New passenger entered the terminal
    PassengerArrived {
        time: f64,
        passenger: PassengerId,
        class: PassengerClass,
        flight_deadline: f64,
    },

    /// Passenger reached a zone and found `queue_length` people waiting,
    /// whether or not a slot was free
    ZoneEntered {
        time: f64,
        passenger: PassengerId,
        zone: String,
        queue_length: usize,
    },

    /// Passenger was given a slot
    ServiceStarted {
        time: f64,
        passenger: PassengerId,
        zone: String,
        wait_time: f64,
        service_time: f64,
    },

    /// Passenger left the zone
    ServiceCompleted {
        time: f64,
        passenger: PassengerId,
        zone: String,
    },

    /// Route named a zone the airport does not have
    ZoneSkipped {
        time: f64,
        passenger: PassengerId,
        zone: String,
    },

    /// Passenger finished the whole itinerary
    PassengerCompleted {
        time: f64,
        passenger: PassengerId,
        total_time: f64,
        missed_flight: bool,
    },

    /// Run ended while the passenger was still in the terminal
    PassengerAbandoned {
        time: f64,
        passenger: PassengerId,
        /// `Created`, `Waiting` or `InService`
        last_state: String,
    },
}

impl Event {
    /// Virtual time at which the event happened
    pub fn time(&self) -> f64 {
        match self {
            Event::PassengerArrived { time, .. }
            | Event::ZoneEntered { time, .. }
            | Event::ServiceStarted { time, .. }
            | Event::ServiceCompleted { time, .. }
            | Event::ZoneSkipped { time, .. }
            | Event::PassengerCompleted { time, .. }
            | Event::PassengerAbandoned { time, .. } => *time,
        }
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PassengerArrived { .. } => "PassengerArrived",
            Event::ZoneEntered { .. } => "ZoneEntered",
            Event::ServiceStarted { .. } => "ServiceStarted",
            Event::ServiceCompleted { .. } => "ServiceCompleted",
            Event::ZoneSkipped { .. } => "ZoneSkipped",
            Event::PassengerCompleted { .. } => "PassengerCompleted",
            Event::PassengerAbandoned { .. } => "PassengerAbandoned",
        }
    }

    pub fn passenger(&self) -> PassengerId {
        match self {
            Event::PassengerArrived { passenger, .. }
            | Event::ZoneEntered { passenger, .. }
            | Event::ServiceStarted { passenger, .. }
            | Event::ServiceCompleted { passenger, .. }
            | Event::ZoneSkipped { passenger, .. }
            | Event::PassengerCompleted { passenger, .. }
            | Event::PassengerAbandoned { passenger, .. } => *passenger,
        }
    }

    /// Zone name if the event concerns a specific zone
    pub fn zone(&self) -> Option<&str> {
        match self {
            Event::ZoneEntered { zone, .. }
            | Event::ServiceStarted { zone, .. }
            | Event::ServiceCompleted { zone, .. }
            | Event::ZoneSkipped { zone, .. } => Some(zone),
            _ => None,
        }
    }
}

/// Append-only store of simulation events
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<Event>,
    enabled: bool,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Create a new empty, recording event log
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// A log that drops everything handed to it
    pub fn disabled() -> Self {
        Self {
            events: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific passenger
    pub fn events_for_passenger(&self, passenger: PassengerId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.passenger() == passenger)
            .collect()
    }

    /// Get events for a specific zone
    pub fn events_for_zone(&self, zone: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.zone() == Some(zone))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entered(time: f64, pax: u64, zone: &str) -> Event {
        Event::ZoneEntered {
            time,
            passenger: PassengerId(pax),
            zone: zone.to_string(),
            queue_length: 0,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = Event::ServiceStarted {
            time: 3.5,
            passenger: PassengerId(9),
            zone: "Security".to_string(),
            wait_time: 1.0,
            service_time: 2.0,
        };
        assert_eq!(event.time(), 3.5);
        assert_eq!(event.event_type(), "ServiceStarted");
        assert_eq!(event.passenger(), PassengerId(9));
        assert_eq!(event.zone(), Some("Security"));
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        log.log(entered(1.0, 1, "Check-In"));
        log.log(entered(1.5, 2, "Check-In"));
        log.log(entered(2.0, 1, "Security"));
        log.log(Event::PassengerCompleted {
            time: 9.0,
            passenger: PassengerId(1),
            total_time: 8.0,
            missed_flight: false,
        });

        assert_eq!(log.len(), 4);
        assert_eq!(log.events_for_passenger(PassengerId(1)).len(), 3);
        assert_eq!(log.events_for_zone("Check-In").len(), 2);
        assert_eq!(log.events_of_type("ZoneEntered").len(), 3);
    }

    #[test]
    fn test_disabled_log_records_nothing() {
        let mut log = EventLog::disabled();
        log.log(entered(1.0, 1, "Gate"));
        assert!(log.is_empty());
        assert!(!log.is_enabled());
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = EventLog::new();
        log.log(entered(1.0, 1, "Gate"));
        log.clear();
        assert!(log.is_empty());
    }
}
