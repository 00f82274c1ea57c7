//! Scheduling policy module
//!
//! This module defines the policy interface shared by the six scheduling
//! algorithms and the factory that builds one from configuration.
//!
//! # Overview
//!
//! A policy is a small state machine over the [`JobQueue`](crate::queue::JobQueue).
//! The driver invokes it at exactly two points:
//! - `schedule_job`: once per job arrival, with the driver's current time;
//! - `complete_job`: once per firing of the single completion timer the
//!   policy armed earlier.
//!
//! The policy talks back to the driver only through [`SchedulerDriver`]:
//! arming the one completion timer for an absolute time, or canceling it.
//! At most one timer is outstanding at any moment; arming replaces any
//! pending arm, and cancel is idempotent.
//!
//! # Policies
//!
//! 1. **Fcfs**: first-come-first-served, non-preemptive baseline
//! 2. **Lcfs**: last-come-first-served, non-preemptive
//! 3. **Sjf**: shortest-job-first by remaining time, non-preemptive
//! 4. **Psjf**: preemptive shortest-job-first by nominal service time
//! 5. **Plcfs**: preemptive last-come-first-served
//! 6. **Fb**: foreground-background (least attained service), fair-share
//!    round-robin approximated by proportional time accounting
//!
//! # Example
//!
//! ```
//! use sched_simulator_core_rs::{Job, PolicyKind, SchedulerDriver, SimTime, TraceLevel};
//!
//! struct OneShotTimer {
//!     armed: Option<SimTime>,
//! }
//!
//! impl SchedulerDriver for OneShotTimer {
//!     fn arm_timer(&mut self, fires_at: SimTime) {
//!         self.armed = Some(fires_at);
//!     }
//!     fn cancel_timer(&mut self) {
//!         self.armed = None;
//!     }
//! }
//!
//! let mut timer = OneShotTimer { armed: None };
//! let mut policy = PolicyKind::Fcfs.build(TraceLevel::Off);
//!
//! policy.schedule_job(&mut timer, Job::new(1, 0, 5), 0).unwrap();
//! assert_eq!(timer.armed, Some(5));
//!
//! timer.armed = None; // the driver clears the slot when the timer fires
//! let done = policy.complete_job(&mut timer, 5).unwrap().unwrap();
//! assert_eq!(done.id(), 1);
//! ```

use crate::core::time::SimTime;
use crate::models::event::EventLog;
use crate::models::job::Job;
use crate::queue::{EntryId, QueueError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fb;
pub mod fcfs;
pub mod lcfs;
pub mod plcfs;
pub mod psjf;
pub mod sjf;

pub use fb::FbPolicy;
pub use fcfs::FcfsPolicy;
pub use lcfs::LcfsPolicy;
pub use plcfs::PlcfsPolicy;
pub use psjf::PsjfPolicy;
pub use sjf::SjfPolicy;

/// Errors a policy can report from its entry points.
///
/// These are programming errors surfacing loudly, not runtime conditions to
/// recover from: a healthy run never produces one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulingError {
    /// A queue operation rejected a handle the policy believed valid.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The tracked current/next entry vanished from the queue.
    #[error("attributed entry {0:?} vanished from the queue")]
    LostAttribution(EntryId),
}

/// The driver-side timer operations a policy may invoke.
///
/// Discipline the policies rely on: at most one timer is armed at a time;
/// `arm_timer` atomically replaces a pending arm; `fires_at` must not be in
/// the past; `cancel_timer` with nothing armed is a no-op. The driver
/// guarantees one `complete_job` call per arm that is not later canceled, at
/// exactly the armed time.
pub trait SchedulerDriver {
    /// Arm (or re-arm) the completion timer for the absolute time `fires_at`.
    fn arm_timer(&mut self, fires_at: SimTime);

    /// Cancel the pending completion timer, if any.
    fn cancel_timer(&mut self);
}

/// The four-operation contract every policy variant implements.
///
/// Construction (`PolicyKind::build`) and `Drop` stand in for the
/// create/destroy pair; the two entry points below are the run-time surface.
pub trait SchedulingPolicy: Send {
    /// Admit a newly arrived job at time `now`.
    ///
    /// Called exactly once per job, with `now` monotonically non-decreasing
    /// across calls within a run. Side effects are entirely through the
    /// queue and the driver's timer operations.
    fn schedule_job(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        job: Job,
        now: SimTime,
    ) -> Result<(), SchedulingError>;

    /// Deliver the completion the armed timer announced.
    ///
    /// Removes exactly one job from the queue and returns it, re-arming the
    /// timer for the next job if any remain. Returns `Ok(None)` defensively
    /// when nothing is queued (a driver-side contract violation, handled
    /// rather than faulted on).
    fn complete_job(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        now: SimTime,
    ) -> Result<Option<Job>, SchedulingError>;

    /// Number of jobs currently queued (including the one attributed).
    fn queued_jobs(&self) -> usize;

    /// Drain the policy's trace log, leaving an empty one behind.
    fn take_trace(&mut self) -> EventLog;
}

/// The job currently attributed: the entry whose completion timer is armed
/// (or, under FB, the head job of the current accounting round), and the
/// simulated time attribution began.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attribution {
    pub entry: EntryId,
    pub since: SimTime,
}

/// Which scheduling policy to run. Exactly one variant is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// First-come-first-served
    Fcfs,
    /// Last-come-first-served (non-preemptive)
    Lcfs,
    /// Shortest-job-first (non-preemptive)
    Sjf,
    /// Preemptive shortest-job-first
    Psjf,
    /// Preemptive last-come-first-served
    Plcfs,
    /// Foreground-background / least attained service
    Fb,
}

impl PolicyKind {
    /// Build a fresh policy state for this variant, tracing at `trace_level`.
    pub fn build(self, trace_level: crate::models::event::TraceLevel) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyKind::Fcfs => Box::new(FcfsPolicy::new(trace_level)),
            PolicyKind::Lcfs => Box::new(LcfsPolicy::new(trace_level)),
            PolicyKind::Sjf => Box::new(SjfPolicy::new(trace_level)),
            PolicyKind::Psjf => Box::new(PsjfPolicy::new(trace_level)),
            PolicyKind::Plcfs => Box::new(PlcfsPolicy::new(trace_level)),
            PolicyKind::Fb => Box::new(FbPolicy::new(trace_level)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::SchedulerDriver;
    use crate::core::time::SimTime;

    /// Timer operation observed by the recording driver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TimerOp {
        Arm(SimTime),
        Cancel,
    }

    /// Test double for the driver: records every timer operation and keeps
    /// the would-be armed time.
    #[derive(Debug, Default)]
    pub struct RecordingDriver {
        pub armed: Option<SimTime>,
        pub ops: Vec<TimerOp>,
    }

    impl RecordingDriver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Simulate the timer firing: the driver clears the slot before
        /// delivering the completion.
        pub fn fire(&mut self) -> SimTime {
            self.armed.take().expect("no timer armed")
        }
    }

    impl SchedulerDriver for RecordingDriver {
        fn arm_timer(&mut self, fires_at: SimTime) {
            self.armed = Some(fires_at);
            self.ops.push(TimerOp::Arm(fires_at));
        }

        fn cancel_timer(&mut self) {
            self.armed = None;
            self.ops.push(TimerOp::Cancel);
        }
    }
}
