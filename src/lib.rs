//! Library entry point.
//!
//! The arena combat core: enemies and their five behaviours, pooled spawners, the boss
//! encounter and the projectiles they all trade. Integration tests in `tests/` are
//! compiled as separate crates and import this public surface.

pub mod common;
pub mod game;
pub mod plugins;
