//! PyO3 wrapper for SimulationEngine
//!
//! This module provides the Python interface to the Rust engine.

use std::sync::Mutex;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{config_to_py, parse_simulation_config, result_to_py, run_failure_to_py};
use crate::orchestrator::{SimulationConfig, SimulationEngine, SimulationError, StopHandle};

/// Python wrapper for the Rust simulation engine
///
/// # Example (from Python)
///
/// ```python
/// from airport_simulator_core_rs import Simulation, default_config
///
/// config = default_config()
/// config["arrival_rate"] = 1.5
/// config["seed"] = 42
///
/// sim = Simulation(config)
/// try:
///     result = sim.run()
/// except RuntimeError as err:
///     result = err.partial
/// print(result["passengers"]["missed_flight_rate"])
/// ```
///
/// `stop()` may be called from another Python thread while `run()` is in
/// progress; the GIL is released for the duration of the run.
#[pyclass(name = "Simulation", frozen)]
pub struct PySimulation {
    engine: Mutex<SimulationEngine>,
    stop: StopHandle,
}

#[pymethods]
impl PySimulation {
    /// Create a simulation from a config dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if a field has the wrong type or fails validation.
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;
        let engine = SimulationEngine::new(rust_config).map_err(|e| match e {
            SimulationError::Config(_) => PyValueError::new_err(format!("Invalid config: {}", e)),
            other => PyRuntimeError::new_err(format!("Failed to create simulation: {}", other)),
        })?;
        let stop = engine.stop_handle();
        Ok(PySimulation {
            engine: Mutex::new(engine),
            stop,
        })
    }

    /// Run the simulation to its horizon and return the result dict
    ///
    /// # Errors
    ///
    /// Raises RuntimeError if the run aborts or was already run. The
    /// statistics gathered up to the failure are on the exception's
    /// `partial` attribute, in the same shape as the normal result.
    fn run(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let outcome = py.allow_threads(|| {
            let mut engine = self
                .engine
                .lock()
                .map_err(|_| PyRuntimeError::new_err("Simulation state is poisoned"))?;
            Ok::<_, PyErr>(engine.run())
        })?;
        match outcome {
            Ok(result) => result_to_py(py, &result),
            Err(failure) => Err(run_failure_to_py(py, &failure)?),
        }
    }

    /// Request cancellation of a run in progress
    fn stop(&self) {
        self.stop.stop();
    }

    /// SHA-256 of the validated config
    #[getter]
    fn config_hash(&self) -> PyResult<String> {
        let engine = self
            .engine
            .lock()
            .map_err(|_| PyRuntimeError::new_err("Simulation state is poisoned"))?;
        Ok(engine.config_hash().to_string())
    }
}

/// The reference airport configuration as a dict
#[pyfunction]
pub fn default_config(py: Python<'_>) -> PyResult<Py<PyDict>> {
    config_to_py(py, &SimulationConfig::default())
}
