//! Simulated time for the scheduling engine.
//!
//! The simulation operates on a single logical timeline of discrete ticks.
//! The driver is the only component that advances the clock; policies receive
//! the current time as an argument and never read it from ambient state.

use serde::{Deserialize, Serialize};

/// Simulated-time scalar, in ticks since the start of the run.
pub type SimTime = u64;

/// The driver-owned simulation clock.
///
/// Time is monotonically non-decreasing: the clock only moves forward, to the
/// timestamp of the event currently being delivered. Two events may share a
/// timestamp (an arrival and a completion at the same tick), so advancing to
/// the current time is allowed.
///
/// # Example
/// ```
/// use sched_simulator_core_rs::Clock;
///
/// let mut clock = Clock::new();
/// assert_eq!(clock.now(), 0);
/// clock.advance_to(5);
/// clock.advance_to(5); // same-tick event, fine
/// assert_eq!(clock.now(), 5);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    now: SimTime,
}

impl Clock {
    /// Create a clock at tick zero.
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Advance the clock to `to`.
    ///
    /// # Panics
    /// Panics if `to` is earlier than the current time; events must be
    /// delivered in timestamp order.
    pub fn advance_to(&mut self, to: SimTime) {
        assert!(
            to >= self.now,
            "clock moved backwards: {} -> {}",
            self.now,
            to
        );
        self.now = to;
    }
}
