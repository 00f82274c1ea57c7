//! Discrete-event driver
//!
//! The driver owns everything the policies treat as external: the simulation
//! clock, the single completion-timer slot, and the workload being played
//! in. It feeds the policy two kinds of events in simulated-time order:
//!
//! 1. **Arrivals**: the next `JobSpec` becomes a `Job` and is handed to
//!    `schedule_job`.
//! 2. **Timer firings**: when the clock reaches the armed time, the slot is
//!    cleared and `complete_job` is invoked; the returned job is recorded.
//!
//! When an arrival and a firing land on the same tick, the arrival is
//! processed first. That ordering is a driver-level rule, not a policy
//! property; tests pin it down because the policies' observable schedules
//! depend on it.
//!
//! The run ends when no arrivals remain and no timer is armed. The report
//! carries one completion record per job, in completion order, plus the
//! policy's drained trace log.
//!
//! # Example
//!
//! ```
//! use sched_simulator_core_rs::{Driver, JobSpec, PolicyKind, SimConfig, Workload};
//!
//! let workload = Workload::new(vec![
//!     JobSpec { id: 1, arrival_time: 0, service_time: 5 },
//!     JobSpec { id: 2, arrival_time: 2, service_time: 1 },
//! ])
//! .unwrap();
//!
//! let mut driver = Driver::new(SimConfig::new(PolicyKind::Fcfs), workload);
//! let report = driver.run().unwrap();
//!
//! assert_eq!(report.completions[0].job_id, 1);
//! assert_eq!(report.completions[0].completed_at, 5);
//! assert_eq!(report.completions[1].completed_at, 6);
//! ```

use crate::core::time::{Clock, SimTime};
use crate::models::event::{EventLog, TraceLevel};
use crate::models::job::{Job, JobId};
use crate::policy::{PolicyKind, SchedulerDriver, SchedulingError, SchedulingPolicy};
use crate::workload::{JobSpec, Workload};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Run configuration: which policy to drive and how verbosely to trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// The active scheduling policy for this run.
    pub policy: PolicyKind,
    /// Verbosity of the policy trace log.
    pub trace_level: TraceLevel,
}

impl SimConfig {
    /// Configuration for `policy` tracing at `Info`.
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            trace_level: TraceLevel::Info,
        }
    }

    /// Same configuration with a different trace level.
    pub fn with_trace_level(mut self, level: TraceLevel) -> Self {
        self.trace_level = level;
        self
    }
}

/// Driver-level failures. All of these are programming errors surfaced
/// loudly; a healthy run never produces one.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The policy reported queue corruption.
    #[error(transparent)]
    Policy(#[from] SchedulingError),

    /// The driver's own timer fired but the policy had nothing queued.
    #[error("completion timer fired at {at} with no job queued")]
    CompletionWithoutJob { at: SimTime },

    /// Completion records could not be serialized for digesting.
    #[error("run digest serialization failed: {0}")]
    Digest(String),
}

/// Bookkeeping for one completed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub job_id: JobId,
    pub arrival_time: SimTime,
    pub service_time: u64,
    pub completed_at: SimTime,
}

/// Outcome of a finished run.
#[derive(Debug)]
pub struct RunReport {
    /// One record per job, in completion order.
    pub completions: Vec<CompletionRecord>,
    /// The policy's trace log, drained at run end.
    pub trace: EventLog,
}

impl RunReport {
    /// Deterministic SHA-256 digest of the completion records; identical
    /// runs produce identical digests.
    pub fn digest(&self) -> Result<String, SimulationError> {
        super::digest::compute_run_digest(&self.completions)
    }
}

/// The clock plus the single timer slot the policy may arm.
///
/// This is the concrete [`SchedulerDriver`] handed to the policy: it
/// enforces that at most one timer is outstanding (the slot is an `Option`)
/// and that arms never point into the past.
#[derive(Debug)]
pub struct TimerSlot {
    clock: Clock,
    armed: Option<SimTime>,
}

impl TimerSlot {
    fn new() -> Self {
        Self {
            clock: Clock::new(),
            armed: None,
        }
    }

    /// The armed completion time, if any.
    pub fn armed(&self) -> Option<SimTime> {
        self.armed
    }
}

impl SchedulerDriver for TimerSlot {
    fn arm_timer(&mut self, fires_at: SimTime) {
        assert!(
            fires_at >= self.clock.now(),
            "timer armed in the past: {} < {}",
            fires_at,
            self.clock.now()
        );
        self.armed = Some(fires_at);
    }

    fn cancel_timer(&mut self) {
        self.armed = None;
    }
}

/// The discrete-event engine for one simulation run.
pub struct Driver {
    timer: TimerSlot,
    policy: Box<dyn SchedulingPolicy>,
    pending: VecDeque<JobSpec>,
    completions: Vec<CompletionRecord>,
}

impl Driver {
    /// Build a driver over `workload` with a fresh policy state.
    pub fn new(config: SimConfig, workload: Workload) -> Self {
        Self {
            timer: TimerSlot::new(),
            policy: config.policy.build(config.trace_level),
            pending: workload.specs().iter().copied().collect(),
            completions: Vec::new(),
        }
    }

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.timer.clock.now()
    }

    /// Jobs currently held by the policy.
    pub fn queued_jobs(&self) -> usize {
        self.policy.queued_jobs()
    }

    /// Completion records so far, in completion order.
    pub fn completions(&self) -> &[CompletionRecord] {
        &self.completions
    }

    /// Deliver the next event. Returns `false` once no arrivals remain and
    /// no timer is armed.
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        let next_arrival = self.pending.front().map(|s| s.arrival_time);
        let armed = self.timer.armed();

        // Arrivals win ties: a job arriving at the instant a completion
        // fires is scheduled before the completion is delivered.
        let take_arrival = match (next_arrival, armed) {
            (None, None) => return Ok(false),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(c)) => a <= c,
        };

        if take_arrival {
            if let Some(spec) = self.pending.pop_front() {
                self.timer.clock.advance_to(spec.arrival_time);
                let job = Job::new(spec.id, spec.arrival_time, spec.service_time);
                self.policy
                    .schedule_job(&mut self.timer, job, spec.arrival_time)?;
            }
        } else if let Some(fires_at) = self.timer.armed.take() {
            self.timer.clock.advance_to(fires_at);
            match self.policy.complete_job(&mut self.timer, fires_at)? {
                Some(job) => self.completions.push(CompletionRecord {
                    job_id: job.id(),
                    arrival_time: job.arrival_time(),
                    service_time: job.service_time(),
                    completed_at: fires_at,
                }),
                // The driver only calls in response to its own arm, so an
                // empty answer means the policy lost a job.
                None => return Err(SimulationError::CompletionWithoutJob { at: fires_at }),
            }
        }

        Ok(true)
    }

    /// Play the whole workload to completion and report.
    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        while self.step()? {}
        Ok(RunReport {
            completions: std::mem::take(&mut self.completions),
            trace: self.policy.take_trace(),
        })
    }
}
