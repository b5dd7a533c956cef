//! Passenger itinerary process
//!
//! Walks one passenger through its route. The process suspends in two
//! places, waiting for a slot and waiting for service to finish, and each
//! function here is the code that runs when it resumes:
//!
//! ```text
//! Advance          → advance()             walk steps until suspended or done
//! ServiceStart     → on_service_start()    slot handed over after a wait
//! ServiceComplete  → on_service_complete() record visit, hand slot on, advance()
//! ```

use crate::arrivals::PassengerFlow;
use crate::models::airport::Airport;
use crate::models::event::Event;
use crate::models::passenger::{Passenger, PassengerId, PassengerState, ZoneVisit};
use crate::models::resource::Admission;
use crate::models::zone::{Zone, ZoneId};
use crate::orchestrator::context::{SimContext, SimEvent};
use crate::orchestrator::engine::SimulationError;
use tracing::{debug, warn};

/// Run the passenger's route from its next step
///
/// Unknown zones are skipped. Returns once the passenger is suspended at a
/// zone or has finished the whole route.
pub fn advance(
    airport: &mut Airport,
    flow: &mut PassengerFlow,
    ctx: &mut SimContext<'_>,
    id: PassengerId,
) -> Result<(), SimulationError> {
    let passenger = flow
        .passenger_mut(id)
        .ok_or(SimulationError::UnknownPassenger(id))?;

    loop {
        let now = ctx.now();
        let Some(step) = passenger.take_next_step() else {
            passenger.complete(now);
            debug!(
                passenger = %id,
                total_time = passenger.total_time_in_airport(),
                missed_flight = passenger.missed_flight(),
                "passenger completed"
            );
            ctx.log.log(Event::PassengerCompleted {
                time: now,
                passenger: id,
                total_time: passenger.total_time_in_airport(),
                missed_flight: passenger.missed_flight(),
            });
            return Ok(());
        };

        let Some(zone_id) = airport.lookup(&step) else {
            warn!(passenger = %id, zone = %step, "route names an unknown zone; skipping");
            ctx.log.log(Event::ZoneSkipped {
                time: now,
                passenger: id,
                zone: step,
            });
            continue;
        };
        let zone = airport
            .zone_mut(zone_id)
            .ok_or(SimulationError::UnknownZone(zone_id))?;

        ctx.log.log(Event::ZoneEntered {
            time: now,
            passenger: id,
            zone: step.clone(),
            queue_length: zone.queue_len(),
        });

        return match zone.arrive(ctx, id) {
            Admission::Granted => begin_service(zone, passenger, ctx, now),
            Admission::Queued { .. } => {
                passenger.set_state(PassengerState::Waiting {
                    zone: step,
                    queued_at: now,
                });
                Ok(())
            }
        };
    }
}

/// A released slot reached a waiting passenger
pub fn on_service_start(
    airport: &mut Airport,
    flow: &mut PassengerFlow,
    ctx: &mut SimContext<'_>,
    id: PassengerId,
    zone_id: ZoneId,
) -> Result<(), SimulationError> {
    let passenger = flow
        .passenger_mut(id)
        .ok_or(SimulationError::UnknownPassenger(id))?;
    let queued_at = match passenger.state() {
        PassengerState::Waiting { queued_at, .. } => *queued_at,
        other => {
            return Err(SimulationError::InvalidPassengerState {
                passenger: id,
                state: other.name(),
                expected: "Waiting",
            })
        }
    };
    let zone = airport
        .zone_mut(zone_id)
        .ok_or(SimulationError::UnknownZone(zone_id))?;

    begin_service(zone, passenger, ctx, queued_at)
}

/// The passenger's service timeout fired
///
/// The slot is released before the passenger moves on, and any waiter it
/// was handed to resumes at the same instant, after this passenger has
/// reached its next zone.
pub fn on_service_complete(
    airport: &mut Airport,
    flow: &mut PassengerFlow,
    ctx: &mut SimContext<'_>,
    id: PassengerId,
    zone_id: ZoneId,
) -> Result<(), SimulationError> {
    let passenger = flow
        .passenger_mut(id)
        .ok_or(SimulationError::UnknownPassenger(id))?;
    let visit = match passenger.state() {
        PassengerState::InService {
            zone,
            queued_at,
            wait_time,
            service_time,
        } => ZoneVisit {
            zone: zone.clone(),
            queued_at: *queued_at,
            wait_time: *wait_time,
            service_time: *service_time,
        },
        other => {
            return Err(SimulationError::InvalidPassengerState {
                passenger: id,
                state: other.name(),
                expected: "InService",
            })
        }
    };
    let zone = airport
        .zone_mut(zone_id)
        .ok_or(SimulationError::UnknownZone(zone_id))?;

    let next = match zone.finish_service(&visit) {
        Ok(next) => next,
        Err(source) => {
            return Err(SimulationError::Resource {
                zone: zone.name().to_string(),
                source,
            })
        }
    };

    ctx.log.log(Event::ServiceCompleted {
        time: ctx.now(),
        passenger: id,
        zone: visit.zone.clone(),
    });
    passenger.record_visit(visit);

    if let Some(waiter) = next {
        ctx.scheduler.schedule_after(
            0.0,
            SimEvent::ServiceStart {
                passenger: waiter,
                zone: zone_id,
            },
        )?;
    }

    advance(airport, flow, ctx, id)
}

fn begin_service(
    zone: &mut Zone,
    passenger: &mut Passenger,
    ctx: &mut SimContext<'_>,
    queued_at: f64,
) -> Result<(), SimulationError> {
    let (wait_time, service_time) = zone.start_service(ctx, passenger.id(), queued_at)?;
    ctx.log.log(Event::ServiceStarted {
        time: ctx.now(),
        passenger: passenger.id(),
        zone: zone.name().to_string(),
        wait_time,
        service_time,
    });
    passenger.set_state(PassengerState::InService {
        zone: zone.name().to_string(),
        queued_at,
        wait_time,
        service_time,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrivals::{ClassDistribution, DeadlineWindow, RoutingTable};
    use crate::core::time::Scheduler;
    use crate::models::event::EventLog;
    use crate::models::passenger::PassengerClass;
    use crate::models::zone::ZoneConfig;
    use crate::rng::RngManager;

    struct Harness {
        airport: Airport,
        flow: PassengerFlow,
        scheduler: Scheduler<SimEvent>,
        rng: RngManager,
        log: EventLog,
    }

    impl Harness {
        fn new(zones: Vec<ZoneConfig>, route: &[&str]) -> Self {
            Self {
                airport: Airport::new(zones).unwrap(),
                flow: PassengerFlow::new(
                    1.0,
                    100.0,
                    ClassDistribution::only(PassengerClass::Economy),
                    DeadlineWindow::default(),
                    RoutingTable::uniform(route),
                ),
                scheduler: Scheduler::new(),
                rng: RngManager::new(1),
                log: EventLog::new(),
            }
        }

        fn arrive(&mut self) -> PassengerId {
            let mut ctx = SimContext::new(&mut self.scheduler, &mut self.rng, &mut self.log);
            let id = self.flow.on_arrival(&mut ctx);
            advance(&mut self.airport, &mut self.flow, &mut ctx, id).unwrap();
            id
        }

        fn step(&mut self) -> SimEvent {
            let item = self.scheduler.pop_due(f64::INFINITY).expect("pending event");
            let mut ctx = SimContext::new(&mut self.scheduler, &mut self.rng, &mut self.log);
            match item.event {
                SimEvent::ServiceStart { passenger, zone } => {
                    on_service_start(&mut self.airport, &mut self.flow, &mut ctx, passenger, zone)
                        .unwrap()
                }
                SimEvent::ServiceComplete { passenger, zone } => {
                    on_service_complete(&mut self.airport, &mut self.flow, &mut ctx, passenger, zone)
                        .unwrap()
                }
                other => panic!("unexpected event {other:?}"),
            }
            item.event
        }
    }

    #[test]
    fn test_free_zone_starts_service_immediately() {
        let mut h = Harness::new(vec![ZoneConfig::new("Desk", 1, 2.0, 0.0)], &["Desk"]);
        let id = h.arrive();

        let pax = h.flow.passenger(id).unwrap();
        assert!(matches!(pax.state(), PassengerState::InService { wait_time, .. } if *wait_time == 0.0));
        assert_eq!(h.scheduler.pending(), 1);
        assert_eq!(h.scheduler.peek_time(), Some(2.0));
    }

    #[test]
    fn test_zone_entry_is_logged_for_granted_and_queued() {
        let mut h = Harness::new(vec![ZoneConfig::new("Desk", 1, 2.0, 0.0)], &["Desk"]);
        let first = h.arrive();
        let second = h.arrive();

        let types: Vec<&str> = h
            .log
            .events_for_passenger(first)
            .iter()
            .map(|e| e.event_type())
            .collect();
        assert_eq!(types, vec!["PassengerArrived", "ZoneEntered", "ServiceStarted"]);

        let types: Vec<&str> = h
            .log
            .events_for_passenger(second)
            .iter()
            .map(|e| e.event_type())
            .collect();
        assert_eq!(types, vec!["PassengerArrived", "ZoneEntered"]);
        assert!(matches!(
            h.log.events_of_type("ZoneEntered")[1],
            Event::ZoneEntered { queue_length: 0, .. }
        ));
    }

    #[test]
    fn test_busy_zone_queues_then_hands_over() {
        let mut h = Harness::new(vec![ZoneConfig::new("Desk", 1, 2.0, 0.0)], &["Desk"]);
        let first = h.arrive();
        let second = h.arrive();
        assert!(matches!(
            h.flow.passenger(second).unwrap().state(),
            PassengerState::Waiting { .. }
        ));

        assert!(matches!(h.step(), SimEvent::ServiceComplete { passenger, .. } if passenger == first));
        assert!(h.flow.passenger(first).unwrap().is_completed());

        assert!(matches!(h.step(), SimEvent::ServiceStart { passenger, .. } if passenger == second));
        let pax = h.flow.passenger(second).unwrap();
        assert!(matches!(pax.state(), PassengerState::InService { wait_time, .. } if *wait_time == 2.0));
    }

    #[test]
    fn test_unknown_zone_is_skipped() {
        let mut h = Harness::new(vec![ZoneConfig::new("Desk", 1, 1.0, 0.0)], &["Lounge", "Desk"]);
        let id = h.arrive();
        h.step();

        let pax = h.flow.passenger(id).unwrap();
        assert!(pax.is_completed());
        assert_eq!(pax.zones_visited(), vec!["Desk"]);
        assert_eq!(h.log.events_of_type("ZoneSkipped").len(), 1);
    }

    #[test]
    fn test_empty_route_completes_on_arrival() {
        let mut h = Harness::new(vec![], &[]);
        let id = h.arrive();
        let pax = h.flow.passenger(id).unwrap();
        assert!(pax.is_completed());
        assert_eq!(pax.total_time_in_airport(), 0.0);
    }

    #[test]
    fn test_service_start_requires_waiting_state() {
        let mut h = Harness::new(vec![ZoneConfig::new("Desk", 1, 1.0, 0.0)], &["Desk"]);
        let id = h.arrive();
        let mut ctx = SimContext::new(&mut h.scheduler, &mut h.rng, &mut h.log);
        let err = on_service_start(&mut h.airport, &mut h.flow, &mut ctx, id, ZoneId(0)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidPassengerState { expected: "Waiting", .. }));
    }
}
