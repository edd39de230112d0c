//! Global state machine.
//!
//! Everything the arena spawns is scoped with `DespawnOnExit(GameState::InGame)`, and
//! every combat set is gated on it.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    /// The arena is live: pools are warm, the encounter runs.
    #[default]
    InGame,
}
