//! FCFS (First-Come-First-Served) policy
//!
//! Non-preemptive baseline: jobs run to completion in arrival order. New
//! entries link at the front of an unordered queue and completions take the
//! tail, so front-insert plus tail-removal is the FIFO discipline.
//!
//! The completion timer is armed only when the queue transitions from empty
//! to one job; while a job is running, later arrivals just wait.

use super::{SchedulerDriver, SchedulingError, SchedulingPolicy};
use crate::core::time::SimTime;
use crate::models::event::{Event, EventLog, TraceLevel};
use crate::models::job::Job;
use crate::queue::JobQueue;

/// First-come-first-served scheduling state.
pub struct FcfsPolicy {
    queue: JobQueue,
    trace: EventLog,
}

impl FcfsPolicy {
    /// Create an empty FCFS state tracing at `trace_level`.
    pub fn new(trace_level: TraceLevel) -> Self {
        Self {
            queue: JobQueue::unordered(),
            trace: EventLog::with_level(trace_level),
        }
    }
}

impl SchedulingPolicy for FcfsPolicy {
    fn schedule_job(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        job: Job,
        now: SimTime,
    ) -> Result<(), SchedulingError> {
        let job_id = job.id();
        let service_time = job.service_time();
        self.queue.insert(job);

        self.trace.log(Event::JobQueued {
            at: now,
            job_id,
            service_time,
            queue_len: self.queue.len(),
        });

        // A sole queued job starts running immediately.
        if self.queue.len() == 1 {
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
        let Some(tail) = self.queue.tail() else {
            self.trace.log(Event::SpuriousCompletion { at: now });
            return Ok(None);
        };

        let job = self.queue.remove(tail)?;
        self.trace.log(Event::JobCompleted {
            at: now,
            job_id: job.id(),
        });

        if let Some((_, next)) = self.queue.tail_job() {
            let fires_at = now + next.remaining_time();
            let next_id = next.id();
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
