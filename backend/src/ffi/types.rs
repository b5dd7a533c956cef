//! Type conversions for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::arrivals::{ClassDistribution, DeadlineWindow, RoutingTable};
use crate::models::passenger::PassengerClass;
use crate::models::zone::{ZoneConfig, ZoneStatistics, ZoneType};
use crate::orchestrator::{PassengerStatistics, RunFailure, SimulationConfig, SimulationResult};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field, raising ValueError if it is missing
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| PyValueError::new_err(format!("Missing required field '{}'", key)))?
        .extract()
}

/// Extract an optional field; `None` if missing
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

/// Extract a field, falling back to `default` if missing
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Configuration Parsers
// ========================================================================

/// Convert Python dict to SimulationConfig
///
/// Every key is optional; missing keys take the default airport's values.
/// Validation happens later, in `SimulationEngine::new`.
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let defaults = SimulationConfig::default();

    let zones = match extract_optional::<Bound<'_, PyList>>(py_config, "zones")? {
        Some(py_zones) => py_zones
            .iter()
            .map(|item| parse_zone_config(&item.downcast_into::<PyDict>()?))
            .collect::<PyResult<Vec<_>>>()?,
        None => defaults.zones,
    };

    let class_distribution = match extract_optional::<Bound<'_, PyDict>>(py_config, "class_distribution")? {
        Some(py_classes) => parse_class_distribution(&py_classes)?,
        None => defaults.class_distribution,
    };

    let routes = match extract_optional::<Bound<'_, PyDict>>(py_config, "routes")? {
        Some(py_routes) => parse_routes(&py_routes)?,
        None => defaults.routes,
    };

    let deadline_window = match extract_optional::<Bound<'_, PyDict>>(py_config, "deadline_window")? {
        Some(py_window) => DeadlineWindow {
            min: extract_required(&py_window, "min")?,
            max: extract_required(&py_window, "max")?,
        },
        None => defaults.deadline_window,
    };

    Ok(SimulationConfig {
        arrival_rate: extract_with_default(py_config, "arrival_rate", defaults.arrival_rate)?,
        duration: extract_with_default(py_config, "duration", defaults.duration)?,
        zones,
        class_distribution,
        routes,
        deadline_window,
        seed: extract_with_default(py_config, "seed", defaults.seed)?,
        record_events: extract_with_default(py_config, "record_events", defaults.record_events)?,
    })
}

fn parse_zone_config(py_zone: &Bound<'_, PyDict>) -> PyResult<ZoneConfig> {
    let zone_type = match extract_optional::<String>(py_zone, "zone_type")? {
        Some(name) => Some(parse_zone_type(&name)?),
        None => None,
    };
    Ok(ZoneConfig {
        name: extract_required(py_zone, "name")?,
        capacity: extract_required(py_zone, "capacity")?,
        service_time_mean: extract_required(py_zone, "service_time_mean")?,
        service_time_std: extract_required(py_zone, "service_time_std")?,
        zone_type,
    })
}

fn parse_zone_type(name: &str) -> PyResult<ZoneType> {
    match name {
        "CheckIn" => Ok(ZoneType::CheckIn),
        "Security" => Ok(ZoneType::Security),
        "PassportControl" => Ok(ZoneType::PassportControl),
        "Gate" => Ok(ZoneType::Gate),
        "Boarding" => Ok(ZoneType::Boarding),
        other => Err(PyValueError::new_err(format!("Unknown zone_type '{}'", other))),
    }
}

fn parse_passenger_class(name: &str) -> PyResult<PassengerClass> {
    PassengerClass::ALL
        .into_iter()
        .find(|class| class.as_str() == name)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown passenger class '{}'", name)))
}

fn parse_class_distribution(py_classes: &Bound<'_, PyDict>) -> PyResult<ClassDistribution> {
    let mut weights = Vec::with_capacity(py_classes.len());
    for (key, value) in py_classes.iter() {
        let name: String = key.extract()?;
        weights.push((parse_passenger_class(&name)?, value.extract::<f64>()?));
    }
    Ok(ClassDistribution::new(weights))
}

fn parse_routes(py_routes: &Bound<'_, PyDict>) -> PyResult<RoutingTable> {
    let defaults = RoutingTable::default();
    Ok(RoutingTable {
        economy: extract_with_default(py_routes, "economy", defaults.economy)?,
        business: extract_with_default(py_routes, "business", defaults.business)?,
        first: extract_with_default(py_routes, "first", defaults.first)?,
    })
}

// ========================================================================
// Rust → Python
// ========================================================================

/// Convert SimulationConfig to a Python dict accepted by `Simulation(...)`
pub fn config_to_py(py: Python<'_>, config: &SimulationConfig) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("arrival_rate", config.arrival_rate)?;
    dict.set_item("duration", config.duration)?;

    let zones = PyList::empty_bound(py);
    for zone in &config.zones {
        let zone_dict = PyDict::new_bound(py);
        zone_dict.set_item("name", &zone.name)?;
        zone_dict.set_item("capacity", zone.capacity)?;
        zone_dict.set_item("service_time_mean", zone.service_time_mean)?;
        zone_dict.set_item("service_time_std", zone.service_time_std)?;
        if let Some(zone_type) = zone.zone_type {
            zone_dict.set_item("zone_type", zone_type_name(zone_type))?;
        }
        zones.append(zone_dict)?;
    }
    dict.set_item("zones", zones)?;

    let classes = PyDict::new_bound(py);
    for class in PassengerClass::ALL {
        classes.set_item(class.as_str(), config.class_distribution.probability(class))?;
    }
    dict.set_item("class_distribution", classes)?;

    let routes = PyDict::new_bound(py);
    routes.set_item("economy", &config.routes.economy)?;
    routes.set_item("business", &config.routes.business)?;
    routes.set_item("first", &config.routes.first)?;
    dict.set_item("routes", routes)?;

    let window = PyDict::new_bound(py);
    window.set_item("min", config.deadline_window.min)?;
    window.set_item("max", config.deadline_window.max)?;
    dict.set_item("deadline_window", window)?;

    dict.set_item("seed", config.seed)?;
    dict.set_item("record_events", config.record_events)?;
    Ok(dict.unbind())
}

/// Convert SimulationResult to a Python dict
pub fn result_to_py(py: Python<'_>, result: &SimulationResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);

    let zones = PyList::empty_bound(py);
    for stats in &result.zones {
        zones.append(zone_statistics_to_py(py, stats)?)?;
    }
    dict.set_item("zones", zones)?;
    dict.set_item("passengers", passenger_statistics_to_py(py, &result.passengers)?)?;
    dict.set_item("simulation_time", result.simulation_time)?;
    dict.set_item("stopped_early", result.stopped_early)?;
    dict.set_item("config_hash", &result.config_hash)?;
    Ok(dict.unbind())
}

/// RuntimeError for a failed run, with the partial result dict as `partial`
pub fn run_failure_to_py(py: Python<'_>, failure: &RunFailure) -> PyResult<PyErr> {
    let err = PyRuntimeError::new_err(format!("Simulation failed: {}", failure.error));
    err.value_bound(py)
        .setattr("partial", result_to_py(py, &failure.partial)?)?;
    Ok(err)
}

fn zone_statistics_to_py<'py>(py: Python<'py>, stats: &ZoneStatistics) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("zone_name", &stats.zone_name)?;
    dict.set_item("zone_type", stats.zone_type.map(zone_type_name))?;
    dict.set_item("capacity", stats.capacity)?;
    dict.set_item("total_served", stats.total_served)?;
    dict.set_item("avg_wait_time", stats.avg_wait_time)?;
    dict.set_item("avg_service_time", stats.avg_service_time)?;
    dict.set_item("avg_queue_length", stats.avg_queue_length)?;
    dict.set_item("utilization", stats.utilization)?;
    Ok(dict)
}

fn passenger_statistics_to_py<'py>(
    py: Python<'py>,
    stats: &PassengerStatistics,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("total_passengers", stats.total_passengers)?;
    dict.set_item("completed_passengers", stats.completed_passengers)?;
    dict.set_item("abandoned_passengers", stats.abandoned_passengers)?;
    dict.set_item("missed_flights", stats.missed_flights)?;
    dict.set_item("missed_flight_rate", stats.missed_flight_rate)?;
    dict.set_item("avg_time_in_airport", stats.avg_time_in_airport)?;
    Ok(dict)
}

fn zone_type_name(zone_type: ZoneType) -> &'static str {
    match zone_type {
        ZoneType::CheckIn => "CheckIn",
        ZoneType::Security => "Security",
        ZoneType::PassportControl => "PassportControl",
        ZoneType::Gate => "Gate",
        ZoneType::Boarding => "Boarding",
    }
}
