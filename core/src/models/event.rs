//! Event logging for simulation tracing and auditing.
//!
//! Policies and the driver report what happened through a structured event
//! log instead of printing. Events are a side channel: nothing in the
//! scheduling control flow depends on whether an event was recorded.
//!
//! The log is level-gated. A policy created with `TraceLevel::Info` drops
//! Debug-level events (per-round accounting detail) at the `log` call, so
//! long runs do not accumulate per-tick noise unless asked to.
//!
//! # Example
//!
//! ```
//! use sched_simulator_core_rs::{Event, EventLog, TraceLevel};
//!
//! let mut log = EventLog::with_level(TraceLevel::Info);
//! log.log(Event::JobCompleted { at: 9, job_id: 2 });
//! log.log(Event::TimerCanceled { at: 9 }); // Debug-level, dropped
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.events_for_job(2).len(), 1);
//! ```

use crate::core::time::SimTime;
use crate::models::job::JobId;

/// Verbosity gate for the event log, ordered from quietest to noisiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceLevel {
    /// Record nothing.
    Off,
    /// Only invariant violations (clamped arithmetic, spurious completions).
    Warn,
    /// Scheduling decisions: queueing, preemption, completion.
    Info,
    /// Everything, including timer traffic and per-round share accounting.
    Debug,
}

/// A scheduling event, stamped with the simulated time it occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A job entered the policy's queue.
    JobQueued {
        at: SimTime,
        job_id: JobId,
        service_time: u64,
        queue_len: usize,
    },

    /// A job left the queue fully serviced.
    JobCompleted { at: SimTime, job_id: JobId },

    /// The running job lost its timer to a newer arrival; its remaining time
    /// was reduced by the service it received while attributed.
    JobPreempted {
        at: SimTime,
        job_id: JobId,
        remaining_time: u64,
    },

    /// The completion timer was armed.
    TimerArmed {
        at: SimTime,
        fires_at: SimTime,
        job_id: JobId,
    },

    /// The pending completion timer was canceled.
    TimerCanceled { at: SimTime },

    /// One fair-share accounting round: every queued job was credited
    /// `per_job` ticks, with `residue` carried into the next round.
    ShareAccounted {
        at: SimTime,
        per_job: u64,
        residue: u64,
        jobs_in_round: usize,
    },

    /// A remaining-time decrement would have gone below zero and was clamped.
    RemainingTimeClamped {
        at: SimTime,
        job_id: JobId,
        deficit: u64,
    },

    /// A completion was delivered while nothing was queued.
    SpuriousCompletion { at: SimTime },
}

impl Event {
    /// Simulated time the event occurred at.
    pub fn at(&self) -> SimTime {
        match self {
            Event::JobQueued { at, .. } => *at,
            Event::JobCompleted { at, .. } => *at,
            Event::JobPreempted { at, .. } => *at,
            Event::TimerArmed { at, .. } => *at,
            Event::TimerCanceled { at } => *at,
            Event::ShareAccounted { at, .. } => *at,
            Event::RemainingTimeClamped { at, .. } => *at,
            Event::SpuriousCompletion { at } => *at,
        }
    }

    /// Short name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::JobQueued { .. } => "JobQueued",
            Event::JobCompleted { .. } => "JobCompleted",
            Event::JobPreempted { .. } => "JobPreempted",
            Event::TimerArmed { .. } => "TimerArmed",
            Event::TimerCanceled { .. } => "TimerCanceled",
            Event::ShareAccounted { .. } => "ShareAccounted",
            Event::RemainingTimeClamped { .. } => "RemainingTimeClamped",
            Event::SpuriousCompletion { .. } => "SpuriousCompletion",
        }
    }

    /// Job the event relates to, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Event::JobQueued { job_id, .. } => Some(*job_id),
            Event::JobCompleted { job_id, .. } => Some(*job_id),
            Event::JobPreempted { job_id, .. } => Some(*job_id),
            Event::TimerArmed { job_id, .. } => Some(*job_id),
            Event::RemainingTimeClamped { job_id, .. } => Some(*job_id),
            _ => None,
        }
    }

    /// The level at which this event is recorded.
    pub fn level(&self) -> TraceLevel {
        match self {
            Event::RemainingTimeClamped { .. } | Event::SpuriousCompletion { .. } => {
                TraceLevel::Warn
            }
            Event::JobQueued { .. } | Event::JobCompleted { .. } | Event::JobPreempted { .. } => {
                TraceLevel::Info
            }
            Event::TimerArmed { .. } | Event::TimerCanceled { .. } | Event::ShareAccounted { .. } => {
                TraceLevel::Debug
            }
        }
    }
}

/// Level-gated event log with query helpers.
#[derive(Debug, Clone)]
pub struct EventLog {
    level: TraceLevel,
    events: Vec<Event>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_level(TraceLevel::Info)
    }
}

impl EventLog {
    /// Create a log recording at `TraceLevel::Info`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log recording events at or below `level`.
    pub fn with_level(level: TraceLevel) -> Self {
        Self {
            level,
            events: Vec::new(),
        }
    }

    /// The configured verbosity gate.
    pub fn level(&self) -> TraceLevel {
        self.level
    }

    /// Record an event, unless gated out by the configured level.
    pub fn log(&mut self, event: Event) {
        if event.level() <= self.level {
            self.events.push(event);
        }
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All recorded events, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events recorded at simulated time `at`.
    pub fn events_at(&self, at: SimTime) -> Vec<&Event> {
        self.events.iter().filter(|e| e.at() == at).collect()
    }

    /// Events of a given type name.
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events relating to a specific job.
    pub fn events_for_job(&self, job_id: JobId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.job_id() == Some(job_id))
            .collect()
    }

    /// Discard all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_at_and_type() {
        let event = Event::JobCompleted { at: 42, job_id: 3 };
        assert_eq!(event.at(), 42);
        assert_eq!(event.event_type(), "JobCompleted");
        assert_eq!(event.job_id(), Some(3));
    }

    #[test]
    fn test_level_gating() {
        let mut log = EventLog::with_level(TraceLevel::Warn);
        log.log(Event::JobCompleted { at: 1, job_id: 1 });
        log.log(Event::SpuriousCompletion { at: 2 });
        assert_eq!(log.len(), 1);
        assert_eq!(log.events()[0].event_type(), "SpuriousCompletion");
    }

    #[test]
    fn test_off_records_nothing() {
        let mut log = EventLog::with_level(TraceLevel::Off);
        log.log(Event::SpuriousCompletion { at: 2 });
        assert!(log.is_empty());
    }

    #[test]
    fn test_debug_records_everything() {
        let mut log = EventLog::with_level(TraceLevel::Debug);
        log.log(Event::TimerArmed {
            at: 0,
            fires_at: 5,
            job_id: 1,
        });
        log.log(Event::ShareAccounted {
            at: 3,
            per_job: 1,
            residue: 1,
            jobs_in_round: 2,
        });
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_query_by_tick_and_job() {
        let mut log = EventLog::with_level(TraceLevel::Debug);
        log.log(Event::JobQueued {
            at: 1,
            job_id: 1,
            service_time: 5,
            queue_len: 1,
        });
        log.log(Event::TimerArmed {
            at: 1,
            fires_at: 6,
            job_id: 1,
        });
        log.log(Event::JobCompleted { at: 6, job_id: 1 });

        assert_eq!(log.events_at(1).len(), 2);
        assert_eq!(log.events_at(6).len(), 1);
        assert_eq!(log.events_for_job(1).len(), 3);
        assert_eq!(log.events_of_type("JobCompleted").len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut log = EventLog::new();
        log.log(Event::JobCompleted { at: 1, job_id: 1 });
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}
