//! Simulation engine - main event loop
//!
//! Owns every piece of run state and drives it to the horizon:
//!
//! ```text
//! new(config) ─ validate, build Airport / PassengerFlow / RNG / Scheduler
//! run()       ─ schedule generator
//!               loop: check stop flag → pop next due continuation → dispatch → hook
//!               truncate: abandon passengers still in the terminal
//!               assemble SimulationResult
//! ```
//!
//! # Critical Invariants
//!
//! 1. **Determinism**: one RNG, one scheduler with a sequence tie-break;
//!    same config and seed give the same result
//! 2. **Horizon**: every continuation due at or before `duration` runs, none
//!    after it
//! 3. **Single use**: an engine runs once; a second `run` is an error

use crate::arrivals::PassengerFlow;
use crate::core::time::{Scheduler, SchedulerError};
use crate::models::airport::Airport;
use crate::models::event::EventLog;
use crate::models::passenger::{Passenger, PassengerId};
use crate::models::resource::ResourceError;
use crate::models::zone::ZoneId;
use crate::orchestrator::config::{ConfigError, SimulationConfig};
use crate::orchestrator::context::{SimContext, SimEvent};
use crate::orchestrator::fingerprint::compute_config_hash;
use crate::orchestrator::itinerary;
use crate::orchestrator::result::SimulationResult;
use crate::rng::RngManager;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, trace, warn};

/// Errors raised while building or running a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Resource error at zone '{zone}': {source}")]
    Resource {
        zone: String,
        #[source]
        source: ResourceError,
    },

    #[error("Passenger not found: {0}")]
    UnknownPassenger(PassengerId),

    #[error("Zone not found: {0:?}")]
    UnknownZone(ZoneId),

    #[error("Passenger {passenger} is {state}, expected {expected}")]
    InvalidPassengerState {
        passenger: PassengerId,
        state: &'static str,
        expected: &'static str,
    },

    #[error("Simulation has already run")]
    AlreadyRun,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A run that did not finish cleanly, with the statistics gathered so far
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunFailure {
    #[source]
    pub error: SimulationError,
    pub partial: SimulationResult,
}

/// Cooperative cancellation flag, shareable across threads
///
/// # Example
/// ```
/// use airport_simulator_core_rs::{SimulationConfig, SimulationEngine};
///
/// let mut engine = SimulationEngine::new(SimulationConfig::default()).unwrap();
/// engine.stop_handle().stop();
///
/// let result = engine.run().unwrap();
/// assert!(result.stopped_early);
/// assert_eq!(result.passengers.completed_passengers, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop at its next suspension point
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Discrete-event airport simulation
///
/// # Example
/// ```
/// use airport_simulator_core_rs::{SimulationConfig, SimulationEngine};
/// use airport_simulator_core_rs::models::ZoneConfig;
///
/// let config = SimulationConfig::new(1.0, 60.0, vec![ZoneConfig::new("Desk", 2, 1.0, 0.2)])
///     .with_routes(airport_simulator_core_rs::arrivals::RoutingTable::uniform(&["Desk"]))
///     .with_seed(42);
/// let mut engine = SimulationEngine::new(config).unwrap();
/// let result = engine.run().unwrap();
///
/// assert_eq!(result.simulation_time, 60.0);
/// assert_eq!(result.zones.len(), 1);
/// assert!(result.passengers.total_passengers > 0);
/// ```
pub struct SimulationEngine {
    config: SimulationConfig,
    config_hash: String,
    airport: Airport,
    flow: PassengerFlow,
    scheduler: Scheduler<SimEvent>,
    rng: RngManager,
    log: EventLog,
    stop: StopHandle,
    has_run: bool,
    stopped_early: bool,
}

impl SimulationEngine {
    /// Validate `config` and build the initial state
    ///
    /// # Errors
    ///
    /// `SimulationError::Config` for the first invalid field.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        for zone in config.unknown_route_targets() {
            warn!(zone = %zone, "route names a zone the airport does not have; passengers will skip it");
        }

        let config_hash = compute_config_hash(&config)?;
        let airport = Airport::new(config.zones.clone())?;
        let flow = PassengerFlow::new(
            config.arrival_rate,
            config.duration,
            config.class_distribution.clone(),
            config.deadline_window,
            config.routes.clone(),
        );
        let log = if config.record_events {
            EventLog::new()
        } else {
            EventLog::disabled()
        };

        Ok(Self {
            rng: RngManager::new(config.seed),
            scheduler: Scheduler::new(),
            config,
            config_hash,
            airport,
            flow,
            log,
            stop: StopHandle::new(),
            has_run: false,
            stopped_early: false,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn airport(&self) -> &Airport {
        &self.airport
    }

    /// Every passenger generated so far, in arrival order
    pub fn passengers(&self) -> &[Passenger] {
        self.flow.passengers()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Handle that cancels this engine's run
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run to the horizon
    pub fn run(&mut self) -> Result<SimulationResult, RunFailure> {
        self.run_with_hook(|_, _| {})
    }

    /// Run to the horizon, calling `hook(now, airport)` after every
    /// processed continuation
    pub fn run_with_hook<F>(&mut self, mut hook: F) -> Result<SimulationResult, RunFailure>
    where
        F: FnMut(f64, &Airport),
    {
        if self.has_run {
            return Err(RunFailure {
                error: SimulationError::AlreadyRun,
                partial: self.assemble(),
            });
        }
        self.has_run = true;

        info!(
            arrival_rate = self.config.arrival_rate,
            duration = self.config.duration,
            zones = self.airport.num_zones(),
            seed = self.config.seed,
            "simulation started"
        );

        if let Err(error) = self.drive(&mut hook) {
            error!(time = self.scheduler.now(), %error, "simulation aborted");
            self.truncate();
            return Err(RunFailure {
                error,
                partial: self.assemble(),
            });
        }

        self.truncate();
        let result = self.assemble();
        info!(
            time = result.simulation_time,
            passengers = result.passengers.total_passengers,
            completed = result.passengers.completed_passengers,
            stopped_early = result.stopped_early,
            "simulation finished"
        );
        Ok(result)
    }

    fn drive<F>(&mut self, hook: &mut F) -> Result<(), SimulationError>
    where
        F: FnMut(f64, &Airport),
    {
        let horizon = self.config.duration;
        {
            let mut ctx = SimContext::new(&mut self.scheduler, &mut self.rng, &mut self.log);
            self.flow.schedule_next(&mut ctx)?;
        }

        loop {
            if self.stop.is_stopped() {
                info!(time = self.scheduler.now(), "stop requested");
                self.stopped_early = true;
                return Ok(());
            }
            let Some(item) = self.scheduler.pop_due(horizon) else {
                self.scheduler.advance_to(horizon);
                return Ok(());
            };
            trace!(time = item.at, seq = item.seq, event = ?item.event, "dispatch");
            self.dispatch(item.event)?;
            hook(self.scheduler.now(), &self.airport);
        }
    }

    fn dispatch(&mut self, event: SimEvent) -> Result<(), SimulationError> {
        let mut ctx = SimContext::new(&mut self.scheduler, &mut self.rng, &mut self.log);
        match event {
            SimEvent::NextArrival => {
                let passenger = self.flow.on_arrival(&mut ctx);
                ctx.scheduler
                    .schedule_after(0.0, SimEvent::Advance { passenger })?;
                self.flow.schedule_next(&mut ctx)?;
            }
            SimEvent::Advance { passenger } => {
                itinerary::advance(&mut self.airport, &mut self.flow, &mut ctx, passenger)?;
            }
            SimEvent::ServiceStart { passenger, zone } => {
                itinerary::on_service_start(&mut self.airport, &mut self.flow, &mut ctx, passenger, zone)?;
            }
            SimEvent::ServiceComplete { passenger, zone } => {
                itinerary::on_service_complete(
                    &mut self.airport,
                    &mut self.flow,
                    &mut ctx,
                    passenger,
                    zone,
                )?;
            }
        }
        Ok(())
    }

    /// Abandon everyone still in the terminal
    fn truncate(&mut self) {
        let mut ctx = SimContext::new(&mut self.scheduler, &mut self.rng, &mut self.log);
        let abandoned = self.flow.abandon_in_flight(&mut ctx);
        if abandoned > 0 {
            info!(abandoned, time = ctx.now(), "passengers still in terminal at end of run");
        }
    }

    fn assemble(&self) -> SimulationResult {
        let elapsed = self.scheduler.now();
        SimulationResult {
            zones: self.airport.statistics(elapsed),
            passengers: self.flow.statistics(),
            simulation_time: elapsed,
            stopped_early: self.stopped_early,
            config_hash: self.config_hash.clone(),
        }
    }
}
