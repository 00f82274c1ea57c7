//! Job model
//!
//! A job is one unit of work flowing through the simulated system: it arrives
//! at a fixed time, needs a fixed amount of service, and completes when its
//! remaining service time reaches zero.
//!
//! Identity is a caller-assigned `u64`, unique within a run and totally
//! ordered; the policies use it as a deterministic tie-break when two jobs
//! compare equal on a scheduling key.
//!
//! CRITICAL: all time values are u64 ticks. Remaining-time arithmetic is
//! exact; a decrement that would underflow clamps at zero and reports the
//! deficit to the caller instead of wrapping.

use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};

/// Unique job identifier, totally ordered.
pub type JobId = u64;

/// A schedulable job.
///
/// `arrival_time` and `service_time` are set once at construction;
/// `remaining_time` starts equal to `service_time` and is monotonically
/// non-increasing while the job is active, reaching zero exactly at
/// completion.
///
/// # Example
/// ```
/// use sched_simulator_core_rs::Job;
///
/// let mut job = Job::new(1, 0, 10);
/// assert_eq!(job.remaining_time(), 10);
///
/// let deficit = job.credit_service(4);
/// assert_eq!(deficit, 0);
/// assert_eq!(job.remaining_time(), 6);
/// assert!(!job.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    arrival_time: SimTime,
    service_time: u64,
    remaining_time: u64,
}

impl Job {
    /// Create a job with its full service still outstanding.
    pub fn new(id: JobId, arrival_time: SimTime, service_time: u64) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            remaining_time: service_time,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Simulated time at which the job arrived.
    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    /// Nominal service time: total work the job requires.
    pub fn service_time(&self) -> u64 {
        self.service_time
    }

    /// Service time not yet received.
    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    /// Overwrite the remaining service time.
    pub fn set_remaining_time(&mut self, remaining: u64) {
        self.remaining_time = remaining;
    }

    /// Credit `elapsed` ticks of service against the remaining time.
    ///
    /// Returns the deficit: how far the decrement would have gone below
    /// zero. A non-zero deficit means the caller's accounting over-credited
    /// this job; remaining time is clamped at zero rather than wrapped, and
    /// the caller is expected to report the deficit.
    pub fn credit_service(&mut self, elapsed: u64) -> u64 {
        let deficit = elapsed.saturating_sub(self.remaining_time);
        self.remaining_time = self.remaining_time.saturating_sub(elapsed);
        deficit
    }

    /// Whether the job has received its full service.
    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }
}
