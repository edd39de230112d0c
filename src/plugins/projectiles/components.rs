use bevy::prelude::*;

use super::messages::ProjectileKind;

#[derive(Component)]
pub struct PooledProjectile;

/// Typed handle for entities that live in the projectile pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileEntity(pub Entity);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub age: f32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self::fire(ProjectileKind::EnemyBullet)
    }
}

impl Projectile {
    #[inline]
    pub fn fire(kind: ProjectileKind) -> Self {
        Self { kind, age: 0.0 }
    }

    /// Age by `dt`. True once `lifetime` is used up.
    #[inline]
    pub fn age_by(&mut self, dt: f32, lifetime: f32) -> bool {
        self.age += dt;
        self.age >= lifetime
    }
}

impl ProjectileKind {
    /// Radius used for overlap checks and the sprite.
    pub fn radius(self) -> f32 {
        match self {
            Self::EnemyBullet => 4.0,
            Self::EnemyLaser | Self::PlayerLaser { .. } => 3.0,
            Self::PlayerBomb { .. } => 6.0,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::EnemyBullet => Color::srgb(0.95, 0.85, 0.3),
            Self::EnemyLaser => Color::srgb(1.0, 0.3, 0.6),
            Self::PlayerLaser { .. } => Color::srgb(0.4, 1.0, 0.9),
            Self::PlayerBomb { .. } => Color::srgb(1.0, 0.6, 0.1),
        }
    }
}

/// Cursor position in world space, if the cursor is over the window.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct Aim {
    pub world_cursor: Option<Vec2>,
}
