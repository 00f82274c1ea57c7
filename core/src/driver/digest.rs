//! Run digesting for replay-identity checks.
//!
//! Two runs of the same workload under the same policy must be bit-for-bit
//! identical. Rather than diffing full reports, each run is reduced to a
//! SHA-256 digest of its completion records in canonical JSON form; equal
//! digests mean equal schedules.

use super::engine::{CompletionRecord, SimulationError};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the deterministic SHA-256 digest of `completions`.
///
/// Serialization goes through a canonicalization pass that sorts all JSON
/// object keys, so the digest does not depend on serializer key order.
pub fn compute_run_digest(completions: &[CompletionRecord]) -> Result<String, SimulationError> {
    canonical_digest(&completions)
}

fn canonical_digest<T: Serialize>(value: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(value)
        .map_err(|e| SimulationError::Digest(format!("serialization failed: {}", e)))?;

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

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SimulationError::Digest(format!("serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
