//! Config fingerprinting
//!
//! A run is fully determined by its config (seed included), so the config
//! hash identifies the run. Results carry it to make reproductions easy to
//! match up.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// SHA-256 of the config's canonical JSON form (object keys sorted)
///
/// # Example
/// ```
/// use airport_simulator_core_rs::{compute_config_hash, SimulationConfig};
///
/// let a = compute_config_hash(&SimulationConfig::default()).unwrap();
/// let b = compute_config_hash(&SimulationConfig::default().with_seed(7)).unwrap();
/// assert_eq!(a.len(), 64);
/// assert_ne!(a, b);
/// ```
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, serde_json::Error> {
    let value = canonicalize(serde_json::to_value(config)?);
    let json = serde_json::to_string(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
