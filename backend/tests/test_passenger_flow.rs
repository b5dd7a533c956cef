//! Tests for passenger generation, class sampling and routing

use airport_simulator_core_rs::models::{PassengerClass, PassengerId};
use airport_simulator_core_rs::orchestrator::{SimContext, SimEvent};
use airport_simulator_core_rs::{
    ClassDistribution, DeadlineWindow, EventLog, PassengerFlow, RngManager, RoutingTable,
    Scheduler, SimulationConfig, SimulationEngine, ZoneConfig,
};

struct Rig {
    scheduler: Scheduler<SimEvent>,
    rng: RngManager,
    log: EventLog,
}

impl Rig {
    fn new(seed: u64) -> Self {
        Self {
            scheduler: Scheduler::new(),
            rng: RngManager::new(seed),
            log: EventLog::new(),
        }
    }

    fn ctx(&mut self) -> SimContext<'_> {
        SimContext::new(&mut self.scheduler, &mut self.rng, &mut self.log)
    }
}

fn flow(rate: f64, duration: f64) -> PassengerFlow {
    PassengerFlow::new(
        rate,
        duration,
        ClassDistribution::default(),
        DeadlineWindow::default(),
        RoutingTable::default(),
    )
}

#[test]
fn test_zero_rate_schedules_nothing() {
    let mut rig = Rig::new(1);
    let generator = flow(0.0, 60.0);
    assert!(!generator.schedule_next(&mut rig.ctx()).unwrap());
    assert!(rig.scheduler.is_empty());
}

#[test]
fn test_closed_window_schedules_nothing() {
    let mut rig = Rig::new(1);
    rig.scheduler.advance_to(60.0);
    let generator = flow(5.0, 60.0);
    assert!(!generator.schedule_next(&mut rig.ctx()).unwrap());
}

#[test]
fn test_open_window_schedules_next_arrival() {
    let mut rig = Rig::new(1);
    let generator = flow(5.0, 60.0);
    assert!(generator.schedule_next(&mut rig.ctx()).unwrap());
    let next = rig.scheduler.pop_due(f64::INFINITY).unwrap();
    assert_eq!(next.event, SimEvent::NextArrival);
    assert!(next.at > 0.0);
}

#[test]
fn test_arrivals_get_sequential_ids_and_routes() {
    let mut rig = Rig::new(9);
    let mut generator = flow(1.0, 60.0);
    let ids: Vec<PassengerId> = (0..5).map(|_| generator.on_arrival(&mut rig.ctx())).collect();
    assert_eq!(ids, (1..=5).map(PassengerId).collect::<Vec<_>>());

    let routes = RoutingTable::default();
    for pax in generator.passengers() {
        assert_eq!(pax.route(), routes.route_for(pax.class()));
        let offset = pax.flight_deadline() - pax.arrival_time();
        assert!((60.0..180.0).contains(&offset));
    }
    assert_eq!(rig.log.events_of_type("PassengerArrived").len(), 5);
}

#[test]
fn test_passenger_lookup() {
    let mut rig = Rig::new(9);
    let mut generator = flow(1.0, 60.0);
    let id = generator.on_arrival(&mut rig.ctx());
    assert_eq!(generator.passenger(id).map(|p| p.id()), Some(id));
    assert!(generator.passenger(PassengerId(0)).is_none());
    assert!(generator.passenger(PassengerId(2)).is_none());
}

#[test]
fn test_class_frequencies_follow_distribution() {
    let classes = ClassDistribution::default();
    let mut rng = RngManager::new(31337);
    let n = 20_000;
    let mut counts = [0usize; 3];
    for _ in 0..n {
        let idx = match classes.sample(&mut rng) {
            PassengerClass::Economy => 0,
            PassengerClass::Business => 1,
            PassengerClass::First => 2,
        };
        counts[idx] += 1;
    }
    let freq = |i: usize| counts[i] as f64 / n as f64;
    assert!((freq(0) - 0.70).abs() < 0.02);
    assert!((freq(1) - 0.25).abs() < 0.02);
    assert!((freq(2) - 0.05).abs() < 0.01);
}

#[test]
fn test_arrival_count_matches_rate() {
    // Nobody served: a zone-less airport with empty routes
    let config = SimulationConfig::new(2.0, 500.0, Vec::<ZoneConfig>::new())
        .with_routes(RoutingTable::uniform(&[]))
        .with_seed(4);
    let mut engine = SimulationEngine::new(config).unwrap();
    let result = engine.run().unwrap();

    // Expected 1000, Poisson std ~32
    let total = result.passengers.total_passengers as f64;
    assert!((total - 1000.0).abs() < 150.0, "got {total} arrivals");
    assert_eq!(result.passengers.completed_passengers, result.passengers.total_passengers);
}

#[test]
fn test_no_arrivals_after_duration() {
    let config = SimulationConfig::new(3.0, 40.0, vec![ZoneConfig::new("Desk", 50, 30.0, 0.0)])
        .with_routes(RoutingTable::uniform(&["Desk"]))
        .with_seed(8);
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.run().unwrap();
    assert!(engine.passengers().iter().all(|p| p.arrival_time() <= 40.0));
}

#[test]
fn test_single_class_distribution() {
    let config = SimulationConfig::new(1.0, 60.0, Vec::new())
        .with_class_distribution(ClassDistribution::only(PassengerClass::First))
        .with_seed(2);
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.run().unwrap();
    assert!(!engine.passengers().is_empty());
    assert!(engine
        .passengers()
        .iter()
        .all(|p| p.class() == PassengerClass::First));
}
