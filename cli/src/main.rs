//! `airport-sim`: run one airport simulation from the command line.

use airport_simulator_core_rs::{
    RunFailure, SimulationConfig, SimulationEngine, SimulationError, SimulationResult,
};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Airport passenger-flow simulator
#[derive(Parser, Debug)]
#[command(name = "airport-sim", version, about = "Discrete-event simulation of passengers flowing through airport zones.")]
struct Cli {
    /// Path to a JSON config file (defaults to the reference airport)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the arrival rate (passengers per minute)
    #[arg(long)]
    arrival_rate: Option<f64>,

    /// Override the simulated duration (minutes)
    #[arg(long)]
    duration: Option<f64>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Run(#[from] RunFailure),

    #[error("cannot encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    tracing::info!(
        arrival_rate = config.arrival_rate,
        duration = config.duration,
        seed = config.seed,
        "configuration loaded"
    );

    let mut engine = SimulationEngine::new(config)?;
    let result = engine.run()?;

    if cli.json {
        println!("{}", result.to_json()?);
    } else {
        print_table(&result);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimulationConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| CliError::ParseConfig {
                path: path.clone(),
                source,
            })?
        }
        None => SimulationConfig::default(),
    };

    if let Some(rate) = cli.arrival_rate {
        config.arrival_rate = rate;
    }
    if let Some(duration) = cli.duration {
        config.duration = duration;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn print_table(result: &SimulationResult) {
    println!(
        "{:<20} {:>8} {:>8} {:>10} {:>10} {:>10} {:>8}",
        "Zone", "Capacity", "Served", "Avg wait", "Avg serv", "Avg queue", "Util"
    );
    println!("{}", "-".repeat(80));
    for zone in &result.zones {
        println!(
            "{:<20} {:>8} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>7.1}%",
            zone.zone_name,
            zone.capacity,
            zone.total_served,
            zone.avg_wait_time,
            zone.avg_service_time,
            zone.avg_queue_length,
            zone.utilization * 100.0
        );
    }

    let pax = &result.passengers;
    println!();
    println!("Passengers:        {}", pax.total_passengers);
    println!("  completed:       {}", pax.completed_passengers);
    println!("  still in airport: {}", pax.abandoned_passengers);
    println!(
        "  missed flights:  {} ({:.1}%)",
        pax.missed_flights,
        pax.missed_flight_rate * 100.0
    );
    println!("  avg time (min):  {:.2}", pax.avg_time_in_airport);
    println!();
    println!(
        "Simulated {:.1} min{}  config {}",
        result.simulation_time,
        if result.stopped_early { " (stopped early)" } else { "" },
        &result.config_hash[..12.min(result.config_hash.len())]
    );
}
