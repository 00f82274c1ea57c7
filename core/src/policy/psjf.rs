//! PSJF (Preemptive Shortest-Job-First) policy
//!
//! The queue is ordered by nominal service time with id tie-break. A new
//! arrival preempts the running job only when its nominal time is strictly
//! smaller (or nothing is running); otherwise it just takes its queue
//! position and waits. Preemption credits the outgoing job with the service
//! it received while attributed.

use super::{Attribution, SchedulerDriver, SchedulingError, SchedulingPolicy};
use crate::core::time::SimTime;
use crate::models::event::{Event, EventLog, TraceLevel};
use crate::models::job::Job;
use crate::queue::{JobQueue, QueueOrder};

/// Preemptive shortest-job-first scheduling state.
pub struct PsjfPolicy {
    queue: JobQueue,
    current: Option<Attribution>,
    trace: EventLog,
}

impl PsjfPolicy {
    /// Create an empty PSJF state tracing at `trace_level`.
    pub fn new(trace_level: TraceLevel) -> Self {
        Self {
            queue: JobQueue::ordered(QueueOrder::ServiceTime),
            current: None,
            trace: EventLog::with_level(trace_level),
        }
    }
}

impl SchedulingPolicy for PsjfPolicy {
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

        let preempts = match self.current {
            None => true,
            Some(att) => {
                let running = self
                    .queue
                    .job(att.entry)
                    .ok_or(SchedulingError::LostAttribution(att.entry))?;
                service_time < running.service_time()
            }
        };

        if !preempts {
            // Queued for later consideration only; the running job's timer
            // stands.
            return Ok(());
        }

        driver.cancel_timer();
        self.trace.log(Event::TimerCanceled { at: now });

        if let Some(att) = self.current.take() {
            let elapsed = now - att.since;
            let running = self
                .queue
                .job_mut(att.entry)
                .ok_or(SchedulingError::LostAttribution(att.entry))?;
            let deficit = running.credit_service(elapsed);
            let running_id = running.id();
            let remaining_time = running.remaining_time();

            self.trace.log(Event::JobPreempted {
                at: now,
                job_id: running_id,
                remaining_time,
            });
            if deficit > 0 {
                self.trace.log(Event::RemainingTimeClamped {
                    at: now,
                    job_id: running_id,
                    deficit,
                });
            }
        }

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
