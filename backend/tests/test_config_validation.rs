//! Tests for configuration parsing and fail-fast validation

use airport_simulator_core_rs::models::PassengerClass;
use airport_simulator_core_rs::{
    ClassDistribution, ConfigError, DeadlineWindow, SimulationConfig, SimulationEngine,
    SimulationError, ZoneConfig,
};

fn base() -> SimulationConfig {
    SimulationConfig::new(1.0, 60.0, vec![ZoneConfig::new("Desk", 1, 1.0, 0.1)])
}

fn rejected(config: SimulationConfig) -> ConfigError {
    match SimulationEngine::new(config) {
        Err(SimulationError::Config(e)) => e,
        Err(other) => panic!("expected config error, got {other}"),
        Ok(_) => panic!("expected config error, engine was built"),
    }
}

#[test]
fn test_base_config_is_accepted() {
    assert!(base().validate().is_ok());
    assert!(SimulationEngine::new(base()).is_ok());
}

#[test]
fn test_negative_arrival_rate_rejected() {
    let mut config = base();
    config.arrival_rate = -0.1;
    assert_eq!(rejected(config), ConfigError::InvalidArrivalRate(-0.1));
}

#[test]
fn test_nan_arrival_rate_rejected() {
    let mut config = base();
    config.arrival_rate = f64::NAN;
    assert!(matches!(rejected(config), ConfigError::InvalidArrivalRate(_)));
}

#[test]
fn test_zero_arrival_rate_accepted() {
    let mut config = base();
    config.arrival_rate = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_non_positive_duration_rejected() {
    for duration in [0.0, -5.0, f64::INFINITY] {
        let mut config = base();
        config.duration = duration;
        assert!(matches!(rejected(config), ConfigError::InvalidDuration(_)));
    }
}

#[test]
fn test_empty_zone_name_rejected() {
    let mut config = base();
    config.zones.push(ZoneConfig::new("  ", 1, 1.0, 0.0));
    assert_eq!(rejected(config), ConfigError::EmptyZoneName);
}

#[test]
fn test_zero_capacity_rejected() {
    let mut config = base();
    config.zones[0].capacity = 0;
    assert_eq!(
        rejected(config),
        ConfigError::InvalidCapacity {
            zone: "Desk".to_string(),
            capacity: 0
        }
    );
}

#[test]
fn test_bad_service_mean_rejected() {
    for mean in [0.0, -1.0, f64::NAN] {
        let mut config = base();
        config.zones[0].service_time_mean = mean;
        assert!(matches!(rejected(config), ConfigError::InvalidServiceMean { .. }));
    }
}

#[test]
fn test_negative_service_std_rejected() {
    let mut config = base();
    config.zones[0].service_time_std = -0.5;
    assert!(matches!(rejected(config), ConfigError::InvalidServiceStd { .. }));
}

#[test]
fn test_duplicate_zone_rejected() {
    let mut config = base();
    config.zones.push(ZoneConfig::new("Desk", 2, 1.0, 0.0));
    assert_eq!(rejected(config), ConfigError::DuplicateZone("Desk".to_string()));
}

#[test]
fn test_class_probabilities_checked() {
    let negative = base().with_class_distribution(ClassDistribution::new([(
        PassengerClass::First,
        -0.2,
    )]));
    assert!(matches!(
        rejected(negative),
        ConfigError::InvalidClassProbability { class: PassengerClass::First, .. }
    ));

    let too_much = base().with_class_distribution(ClassDistribution::new([
        (PassengerClass::Economy, 0.9),
        (PassengerClass::Business, 0.2),
    ]));
    assert!(matches!(rejected(too_much), ConfigError::ClassProbabilitiesExceedOne(_)));
}

#[test]
fn test_deadline_window_checked() {
    let mut config = base();
    config.deadline_window = DeadlineWindow { min: 90.0, max: 30.0 };
    assert_eq!(
        rejected(config),
        ConfigError::InvalidDeadlineWindow { min: 90.0, max: 30.0 }
    );
}

#[test]
fn test_missing_route_zone_is_not_an_error() {
    // Default routes reference zones the base config lacks
    let config = base();
    assert!(!config.unknown_route_targets().is_empty());
    assert!(SimulationEngine::new(config).is_ok());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "arrival_rate": 0.75,
        "duration": 120,
        "zones": [
            {"name": "Check-In", "capacity": 3, "service_time_mean": 2.0, "service_time_std": 0.5, "zone_type": "CheckIn"}
        ],
        "class_distribution": {"Economy": 0.9, "First": 0.1},
        "routes": {"economy": ["Check-In"], "business": ["Check-In"], "first": []},
        "deadline_window": {"min": 30, "max": 45},
        "seed": 7,
        "record_events": true
    }"#;
    let config: SimulationConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.seed, 7);
    assert_eq!(config.duration, 120.0);
    assert_eq!(config.class_distribution.probability(PassengerClass::First), 0.1);
    assert!(config.routes.first.is_empty());
    assert!(config.record_events);
}

#[test]
fn test_default_config_serializes_every_zone() {
    let value = serde_json::to_value(SimulationConfig::default()).unwrap();
    let zones = value["zones"].as_array().unwrap();
    assert_eq!(zones.len(), 8);
    assert_eq!(zones[0]["name"], "Check-In");
    assert_eq!(value["seed"], 12345);
}
