//! Continuations and the shared handle passed to process steps
//!
//! Every suspended process (the arrival generator, each passenger's
//! itinerary) is represented by one pending [`SimEvent`]. Resuming a process
//! means dispatching its event; the step handlers reach the clock, the RNG
//! and the event log through a [`SimContext`].

use crate::core::time::Scheduler;
use crate::models::event::EventLog;
use crate::models::passenger::PassengerId;
use crate::models::zone::ZoneId;
use crate::rng::RngManager;

/// A suspended process waiting to resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// The arrival generator's inter-arrival gap elapsed
    NextArrival,

    /// Run the passenger's itinerary from where it stopped
    ///
    /// Scheduled with zero delay when a passenger is spawned.
    Advance { passenger: PassengerId },

    /// A released slot was handed to this waiting passenger
    ServiceStart { passenger: PassengerId, zone: ZoneId },

    /// The passenger's service timeout fired
    ServiceComplete { passenger: PassengerId, zone: ZoneId },
}

impl SimEvent {
    pub fn passenger(&self) -> Option<PassengerId> {
        match self {
            SimEvent::NextArrival => None,
            SimEvent::Advance { passenger }
            | SimEvent::ServiceStart { passenger, .. }
            | SimEvent::ServiceComplete { passenger, .. } => Some(*passenger),
        }
    }
}

/// Mutable view of the engine's shared machinery
pub struct SimContext<'a> {
    pub scheduler: &'a mut Scheduler<SimEvent>,
    pub rng: &'a mut RngManager,
    pub log: &'a mut EventLog,
}

impl<'a> SimContext<'a> {
    pub fn new(
        scheduler: &'a mut Scheduler<SimEvent>,
        rng: &'a mut RngManager,
        log: &'a mut EventLog,
    ) -> Self {
        Self { scheduler, rng, log }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }
}
