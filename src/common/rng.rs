//! Simulation randomness.
//!
//! All gameplay randomness (wander directions, teleport sites, minion offsets) is drawn
//! from this one resource so a test can pin the seed and replay a tick exactly.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}
