//! Discrete-event driver: the simulation loop around the policy core.
//!
//! See `engine.rs` for the event loop and `digest.rs` for replay-identity
//! digests.

pub mod digest;
pub mod engine;

pub use digest::compute_run_digest;
pub use engine::{CompletionRecord, Driver, RunReport, SimConfig, SimulationError, TimerSlot};
