//! Domain models for the airport simulator

pub mod airport;
pub mod event;
pub mod passenger;
pub mod resource;
pub mod zone;

// Re-exports
pub use airport::Airport;
pub use event::{Event, EventLog};
pub use passenger::{Passenger, PassengerClass, PassengerId, PassengerState, ZoneVisit};
pub use resource::{Admission, Resource, ResourceError};
pub use zone::{Zone, ZoneConfig, ZoneId, ZoneStatistics, ZoneType, MIN_SERVICE_TIME};
