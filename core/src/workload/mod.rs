//! Workload construction for the scheduling simulator.
//!
//! A workload is the arrival list a run consumes: one [`JobSpec`] per job,
//! sorted by arrival time with id as the tie-break. Workloads come from two
//! places:
//! - parsed from JSON (a trace prepared elsewhere), or
//! - synthesized deterministically from an [`ArrivalProfile`] and a seed.
//!
//! Validation happens at construction. Duplicate ids would break the
//! deterministic tie-break the policies rely on, and a zero service time
//! would mean a completion armed at the arrival instant, so both are
//! rejected up front.
//!
//! # Example
//!
//! ```
//! use sched_simulator_core_rs::{JobSpec, Workload};
//!
//! let workload = Workload::new(vec![
//!     JobSpec { id: 2, arrival_time: 3, service_time: 1 },
//!     JobSpec { id: 1, arrival_time: 0, service_time: 5 },
//! ])
//! .unwrap();
//!
//! // Sorted by arrival time.
//! assert_eq!(workload.specs()[0].id, 1);
//! ```

use crate::core::time::SimTime;
use crate::models::job::JobId;
use crate::rng::DeterministicRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors rejected at workload construction or parse time.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// Two specs share an id; identity must be unique within a run.
    #[error("duplicate job id {id}")]
    DuplicateJobId { id: JobId },

    /// A job with no work to do cannot be scheduled meaningfully.
    #[error("job {id} has zero service time")]
    ZeroServiceTime { id: JobId },

    /// The JSON input was not a valid spec list.
    #[error("workload parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Description of one arriving job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Unique, totally ordered identity.
    pub id: JobId,
    /// Simulated arrival time.
    pub arrival_time: SimTime,
    /// Nominal service time (total work), at least one tick.
    pub service_time: u64,
}

/// Profile for deterministic synthetic workload generation.
///
/// Each tick in `[0, horizon)` flips a coin with probability
/// `rate_per_tick`; on success one job arrives with a service time drawn
/// uniformly from `service_range` (inclusive bounds). Rates are f64
/// probabilities, not time accounting; all times stay integer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalProfile {
    /// Number of ticks to draw arrivals over.
    pub horizon: u64,
    /// Per-tick arrival probability in `[0, 1]`.
    pub rate_per_tick: f64,
    /// Inclusive (min, max) bounds for drawn service times.
    pub service_range: (u64, u64),
}

/// A validated, arrival-ordered list of job specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    specs: Vec<JobSpec>,
}

impl Workload {
    /// Validate and sort `specs` into a workload.
    pub fn new(mut specs: Vec<JobSpec>) -> Result<Self, WorkloadError> {
        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            if spec.service_time == 0 {
                return Err(WorkloadError::ZeroServiceTime { id: spec.id });
            }
            if !seen.insert(spec.id) {
                return Err(WorkloadError::DuplicateJobId { id: spec.id });
            }
        }
        specs.sort_by_key(|s| (s.arrival_time, s.id));
        Ok(Self { specs })
    }

    /// Parse a JSON array of specs.
    pub fn from_json_str(json: &str) -> Result<Self, WorkloadError> {
        let specs: Vec<JobSpec> = serde_json::from_str(json)?;
        Self::new(specs)
    }

    /// Synthesize a workload from `profile`, deterministically in `seed`.
    pub fn generate(seed: u64, profile: &ArrivalProfile) -> Result<Self, WorkloadError> {
        let mut rng = DeterministicRng::new(seed);
        let (min_service, max_service) = profile.service_range;
        let mut specs = Vec::new();

        for tick in 0..profile.horizon {
            if rng.next_f64() < profile.rate_per_tick {
                let service_time = if min_service >= max_service {
                    min_service
                } else {
                    rng.range_u64(min_service, max_service + 1)
                };
                specs.push(JobSpec {
                    id: specs.len() as JobId + 1,
                    arrival_time: tick,
                    service_time,
                });
            }
        }

        Self::new(specs)
    }

    /// The specs, sorted by (arrival time, id).
    pub fn specs(&self) -> &[JobSpec] {
        &self.specs
    }

    /// Number of jobs in the workload.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the workload has no jobs.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Total service time across all jobs.
    pub fn total_service(&self) -> u64 {
        self.specs.iter().map(|s| s.service_time).sum()
    }
}
