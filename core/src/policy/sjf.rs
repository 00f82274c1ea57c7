//! SJF (Shortest-Job-First) policy
//!
//! Non-preemptive despite the ordered queue: arrivals are slotted into the
//! remaining-time order but never interrupt the job in progress. Each
//! completion takes the tracked `next` entry and then promotes the new head
//! (shortest remaining time, id tie-break) to run.

use super::{SchedulerDriver, SchedulingError, SchedulingPolicy};
use crate::core::time::SimTime;
use crate::models::event::{Event, EventLog, TraceLevel};
use crate::models::job::Job;
use crate::queue::{EntryId, JobQueue, QueueOrder};

/// Shortest-job-first scheduling state.
pub struct SjfPolicy {
    queue: JobQueue,
    /// Entry whose completion timer is armed.
    next: Option<EntryId>,
    trace: EventLog,
}

impl SjfPolicy {
    /// Create an empty SJF state tracing at `trace_level`.
    pub fn new(trace_level: TraceLevel) -> Self {
        Self {
            queue: JobQueue::ordered(QueueOrder::RemainingTime),
            next: None,
            trace: EventLog::with_level(trace_level),
        }
    }
}

impl SchedulingPolicy for SjfPolicy {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_util::RecordingDriver;

    #[test]
    fn test_shorter_arrival_waits_for_running_job() {
        let mut driver = RecordingDriver::new();
        let mut policy = SjfPolicy::new(TraceLevel::Off);

        policy
            .schedule_job(&mut driver, Job::new(1, 0, 10), 0)
            .unwrap();
        policy
            .schedule_job(&mut driver, Job::new(2, 1, 2), 1)
            .unwrap();

        // No preemption: job 1's timer stands.
        assert_eq!(driver.armed, Some(10));
    }

    #[test]
    fn test_completions_pick_shortest_remaining() {
        let mut driver = RecordingDriver::new();
        let mut policy = SjfPolicy::new(TraceLevel::Off);

        policy
            .schedule_job(&mut driver, Job::new(1, 0, 6), 0)
            .unwrap();
        policy
            .schedule_job(&mut driver, Job::new(2, 1, 9), 1)
            .unwrap();
        policy
            .schedule_job(&mut driver, Job::new(3, 2, 3), 2)
            .unwrap();

        let t = driver.fire();
        assert_eq!(t, 6);
        assert_eq!(policy.complete_job(&mut driver, t).unwrap().unwrap().id(), 1);

        // Shortest waiting job (3) runs before the longer one (2).
        let t = driver.fire();
        assert_eq!(t, 9);
        assert_eq!(policy.complete_job(&mut driver, t).unwrap().unwrap().id(), 3);

        let t = driver.fire();
        assert_eq!(t, 18);
        assert_eq!(policy.complete_job(&mut driver, t).unwrap().unwrap().id(), 2);

        assert_eq!(driver.armed, None);
    }

    #[test]
    fn test_equal_service_breaks_ties_by_id() {
        let mut driver = RecordingDriver::new();
        let mut policy = SjfPolicy::new(TraceLevel::Off);

        policy
            .schedule_job(&mut driver, Job::new(7, 0, 4), 0)
            .unwrap();
        policy
            .schedule_job(&mut driver, Job::new(3, 1, 4), 1)
            .unwrap();
        policy
            .schedule_job(&mut driver, Job::new(5, 1, 4), 1)
            .unwrap();

        let t = driver.fire();
        assert_eq!(policy.complete_job(&mut driver, t).unwrap().unwrap().id(), 7);
        let t = driver.fire();
        assert_eq!(policy.complete_job(&mut driver, t).unwrap().unwrap().id(), 3);
        let t = driver.fire();
        assert_eq!(policy.complete_job(&mut driver, t).unwrap().unwrap().id(), 5);
    }

    #[test]
    fn test_empty_completion_returns_none() {
        let mut driver = RecordingDriver::new();
        let mut policy = SjfPolicy::new(TraceLevel::Off);
        assert_eq!(policy.complete_job(&mut driver, 0).unwrap(), None);
    }
}
