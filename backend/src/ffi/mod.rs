//! Python bindings (feature `pyo3`)
//!
//! Python hands in plain dicts and gets plain dicts back; no Rust object
//! other than the `Simulation` handle crosses the boundary.

pub mod engine;
pub mod types;
