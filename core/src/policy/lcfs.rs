//! LCFS (Last-Come-First-Served) policy
//!
//! Non-preemptive: a job in progress always runs to completion. When it
//! finishes, the next job to run is the most recently arrived one still
//! queued, which is the head of the unordered queue since arrivals link at
//! the front.
//!
//! The policy tracks the running job with a `next` handle. A new arrival
//! never touches that handle (no preemption); it only becomes eligible once
//! the current job completes.

use super::{SchedulerDriver, SchedulingError, SchedulingPolicy};
use crate::core::time::SimTime;
use crate::models::event::{Event, EventLog, TraceLevel};
use crate::models::job::Job;
use crate::queue::{EntryId, JobQueue};

/// Last-come-first-served scheduling state.
pub struct LcfsPolicy {
    queue: JobQueue,
    /// Entry whose completion timer is armed.
    next: Option<EntryId>,
    trace: EventLog,
}

impl LcfsPolicy {
    /// Create an empty LCFS state tracing at `trace_level`.
    pub fn new(trace_level: TraceLevel) -> Self {
        Self {
            queue: JobQueue::unordered(),
            next: None,
            trace: EventLog::with_level(trace_level),
        }
    }
}

impl SchedulingPolicy for LcfsPolicy {
    fn schedule_job(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        job: Job,
        now: SimTime,
    ) -> Result<(), SchedulingError> {
        let job_id = job.id();
        let service_time = job.service_time();
        let entry = self.queue.insert(job);

        self.trace.log(Event::JobQueued {
            at: now,
            job_id,
            service_time,
            queue_len: self.queue.len(),
        });

        if self.queue.len() == 1 {
            self.next = Some(entry);
            let fires_at = now + service_time;
            driver.arm_timer(fires_at);
            self.trace.log(Event::TimerArmed {
                at: now,
                fires_at,
                job_id,
            });
        }

        Ok(())
    }

    fn complete_job(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        now: SimTime,
    ) -> Result<Option<Job>, SchedulingError> {
        let Some(entry) = self.next.take() else {
            self.trace.log(Event::SpuriousCompletion { at: now });
            return Ok(None);
        };

        let job = self.queue.remove(entry)?;
        self.trace.log(Event::JobCompleted {
            at: now,
            job_id: job.id(),
        });

        // The head is the most recent arrival still waiting. This variant
        // never partially executes a job, so remaining equals nominal time.
        if let Some((head, next_job)) = self.queue.head_job() {
            let fires_at = now + next_job.remaining_time();
            let next_id = next_job.id();
            self.next = Some(head);
            driver.arm_timer(fires_at);
            self.trace.log(Event::TimerArmed {
                at: now,
                fires_at,
                job_id: next_id,
            });
        }

        Ok(Some(job))
    }

    fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    fn take_trace(&mut self) -> EventLog {
        let level = self.trace.level();
        std::mem::replace(&mut self.trace, EventLog::with_level(level))
    }
}
