//! Buffered spawn requests.
//!
//! Producers (the boss, player input) only write intent. The allocator is the one
//! consumer that pops pooled projectiles and wakes them:
//! producer -> `SpawnProjectile` queue -> allocator.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileKind {
    /// Boss fan bullet. Lethal to the player.
    EnemyBullet,
    /// Boss aimed laser. Lethal to the player.
    EnemyLaser,
    /// Direct hit on the first enemy it touches.
    PlayerLaser { damage: f32 },
    /// Bursts on the first enemy or wall it touches, hitting everything in `radius`.
    PlayerBomb { damage: f32, radius: f32 },
}

impl ProjectileKind {
    #[inline]
    pub fn is_hostile(self) -> bool {
        matches!(self, Self::EnemyBullet | Self::EnemyLaser)
    }
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectile {
    pub kind: ProjectileKind,
    pub from: Vec2,
    pub velocity: Vec2,
}
