//! Common, shared types.

pub mod error;
pub mod layers;
pub mod rng;
pub mod schedule;
pub mod spatial;
pub mod state;
pub mod steering;
pub mod timers;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
