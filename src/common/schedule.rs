//! Fixed-step ordering shared by every combat plugin.
//!
//! One tick, in order:
//! 1. `Spawn`: spawners activate pooled enemies.
//! 2. `Steer`: enemies, the boss and projectiles decide where to go.
//! 3. `Contact`: overlap checks turn touches into hits and player deaths.
//! 4. `Resolve`: hits land, timed tasks advance, fuses go off.
//! 5. `Settle`: owners are told about deaths, bodies are recycled or removed,
//!    queued projectiles and minions enter the world.
//!
//! Physics integration runs afterwards in avian's own schedule.

use bevy::prelude::*;

use super::state::GameState;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Spawn,
    Steer,
    Contact,
    Resolve,
    Settle,
}

pub fn configure(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            CombatSet::Spawn,
            CombatSet::Steer,
            CombatSet::Contact,
            CombatSet::Resolve,
            CombatSet::Settle,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}
