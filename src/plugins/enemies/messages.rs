//! Messages crossing the enemy boundary.
//!
//! - `EnemyHit`: ordnance (or anything else) landed on an entity. Enemies and the
//!   boss both read it and ignore targets that are not theirs.
//! - `EnemyDown`: an enemy died this tick; its owner must act on `notice`.
//! - `EnemyDestroyed`: public "one enemy fewer" notice for scoring and UI.

use bevy::prelude::*;

use super::components::{Damage, Destroyed};
use super::variants::EnemyKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hit {
    /// Direct hit from a projectile.
    Shot(Damage),
    /// Caught in a player explosive's radius.
    Blast { damage: f32 },
}

#[derive(Message, Clone, Copy, Debug)]
pub struct EnemyHit {
    pub target: Entity,
    pub hit: Hit,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct EnemyDown {
    pub entity: Entity,
    pub position: Vec2,
    pub notice: Destroyed,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct EnemyDestroyed {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub position: Vec2,
}
