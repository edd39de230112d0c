use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;

use super::components::{PooledProjectile, Projectile, ProjectileEntity, ProjectileState};
use super::messages::ProjectileKind;

#[derive(Resource, Debug)]
pub struct ProjectilePool {
    free: Vec<ProjectileEntity>,
    capacity: usize,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn pop_free(&mut self) -> Option<ProjectileEntity> {
        self.free.pop()
    }

    #[inline]
    pub fn push_free(&mut self, e: ProjectileEntity) {
        debug_assert!(!self.free.contains(&e), "projectile returned to the pool twice");
        self.free.push(e);
    }
}

/// Hostile shots look for the player, ordnance looks for enemies. Both stop at walls.
#[inline]
pub fn active_layers(kind: ProjectileKind) -> CollisionLayers {
    if kind.is_hostile() {
        CollisionLayers::new(Layer::EnemyProjectile, [Layer::World, Layer::Player])
    } else {
        CollisionLayers::new(Layer::PlayerOrdnance, [Layer::World, Layer::Enemy])
    }
}

/// "Disabled" without structural changes: empty filters means we collide with nothing.
#[inline]
pub fn inactive_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyProjectile, [] as [Layer; 0])
}

/// Pre-spawn pooled projectiles (inactive).
///
/// Physics components stay present; inactive projectiles are hidden, still and filtered
/// out of every collision.
pub fn init_projectile_pool(mut commands: Commands, mut pool: ResMut<ProjectilePool>) {
    pool.free.clear();
    let cap = pool.capacity;
    pool.free.reserve(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Projectile(Pooled)"),
                PooledProjectile,
                ProjectileState::Inactive,
                Projectile::default(),
                Sprite {
                    color: Color::WHITE,
                    custom_size: Some(Vec2::splat(8.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.0),
                Visibility::Hidden,
                RigidBody::Kinematic,
                Collider::circle(4.0),
                inactive_layers(),
                LinearVelocity(Vec2::ZERO),
                DespawnOnExit(GameState::InGame),
            ))
            .id();

        pool.free.push(ProjectileEntity(e));
    }
    debug!("projectile pool warmed up with {cap} entries");
}
