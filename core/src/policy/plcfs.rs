//! PLCFS (Preemptive Last-Come-First-Served) policy
//!
//! Every arrival immediately takes over the processor. The preempted job is
//! credited with the service it received while attributed (its remaining
//! time drops by the elapsed interval) and waits at its queue position; when
//! the running job completes, the head (the most recent arrival still
//! queued) resumes with its reduced remaining time.

use super::{Attribution, SchedulerDriver, SchedulingError, SchedulingPolicy};
use crate::core::time::SimTime;
use crate::models::event::{Event, EventLog, TraceLevel};
use crate::models::job::Job;
use crate::queue::JobQueue;

/// Preemptive LCFS scheduling state.
pub struct PlcfsPolicy {
    queue: JobQueue,
    current: Option<Attribution>,
    trace: EventLog,
}

impl PlcfsPolicy {
    /// Create an empty PLCFS state tracing at `trace_level`.
    pub fn new(trace_level: TraceLevel) -> Self {
        Self {
            queue: JobQueue::unordered(),
            current: None,
            trace: EventLog::with_level(trace_level),
        }
    }

    /// Credit the attributed job with the service it received since
    /// attribution began.
    fn credit_attributed(
        &mut self,
        att: Attribution,
        now: SimTime,
    ) -> Result<(), SchedulingError> {
        let elapsed = now - att.since;
        let job = self
            .queue
            .job_mut(att.entry)
            .ok_or(SchedulingError::LostAttribution(att.entry))?;
        let deficit = job.credit_service(elapsed);
        let job_id = job.id();
        let remaining_time = job.remaining_time();

        self.trace.log(Event::JobPreempted {
            at: now,
            job_id,
            remaining_time,
        });
        if deficit > 0 {
            self.trace.log(Event::RemainingTimeClamped {
                at: now,
                job_id,
                deficit,
            });
        }
        Ok(())
    }
}

impl SchedulingPolicy for PlcfsPolicy {
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

        driver.cancel_timer();
        self.trace.log(Event::TimerCanceled { at: now });

        if let Some(att) = self.current.take() {
            self.credit_attributed(att, now)?;
        }

        // The new arrival runs now; its remaining time is still its full
        // service time.
        let fires_at = now + service_time;
        driver.arm_timer(fires_at);
        self.trace.log(Event::TimerArmed {
            at: now,
            fires_at,
            job_id,
        });
        self.current = Some(Attribution { entry, since: now });

        Ok(())
    }

    fn complete_job(
        &mut self,
        driver: &mut dyn SchedulerDriver,
        now: SimTime,
    ) -> Result<Option<Job>, SchedulingError> {
        let Some(att) = self.current.take() else {
            self.trace.log(Event::SpuriousCompletion { at: now });
            return Ok(None);
        };

        let job = self.queue.remove(att.entry)?;
        self.trace.log(Event::JobCompleted {
            at: now,
            job_id: job.id(),
        });

        if let Some((head, next_job)) = self.queue.head_job() {
            let fires_at = now + next_job.remaining_time();
            let next_id = next_job.id();
            driver.arm_timer(fires_at);
            self.trace.log(Event::TimerArmed {
                at: now,
                fires_at,
                job_id: next_id,
            });
            self.current = Some(Attribution {
                entry: head,
                since: now,
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
