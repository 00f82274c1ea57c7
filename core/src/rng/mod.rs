//! Deterministic random number generation.

pub mod xorshift;

pub use xorshift::DeterministicRng;
