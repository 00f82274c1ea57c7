//! Scheduling Simulator Core - Rust Engine
//!
//! Discrete-event CPU-scheduling simulator with deterministic execution.
//! Six interchangeable policies decide, at each arrival and completion
//! event, which job runs next and when its completion should be signaled.
//!
//! # Architecture
//!
//! - **core**: Simulated time (monotonic clock over u64 ticks)
//! - **models**: Domain types (Job, trace Event/EventLog)
//! - **queue**: Ordered job queue with stable entry handles
//! - **policy**: The six scheduling policies behind one trait
//! - **driver**: Main simulation loop, timer slot, run reports
//! - **workload**: Validated arrival lists, JSON and synthetic
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All time values are u64 ticks; time accounting is exact, never
//!    best-effort
//! 2. At most one completion timer is armed at any moment
//! 3. All randomness is deterministic (seeded xorshift64*)

// Module declarations
pub mod core;
pub mod driver;
pub mod models;
pub mod policy;
pub mod queue;
pub mod rng;
pub mod workload;

// Re-exports for convenience
pub use crate::core::time::{Clock, SimTime};
pub use driver::{
    compute_run_digest, CompletionRecord, Driver, RunReport, SimConfig, SimulationError, TimerSlot,
};
pub use models::{
    event::{Event, EventLog, TraceLevel},
    job::{Job, JobId},
};
pub use policy::{
    FbPolicy, FcfsPolicy, LcfsPolicy, PlcfsPolicy, PolicyKind, PsjfPolicy, SchedulerDriver,
    SchedulingError, SchedulingPolicy, SjfPolicy,
};
pub use queue::{EntryId, JobQueue, QueueError, QueueOrder};
pub use rng::DeterministicRng;
pub use workload::{ArrivalProfile, JobSpec, Workload, WorkloadError};
