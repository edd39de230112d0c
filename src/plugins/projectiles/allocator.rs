//! Spawn consumer: activate projectiles from the pool.
//!
//! An empty free list is a capacity decision, not a failure: the request is dropped.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile, ProjectileEntity, ProjectileState};
use super::messages::SpawnProjectile;
use super::pool::{active_layers, ProjectilePool};

pub fn allocate_projectiles(
    mut pool: ResMut<ProjectilePool>,
    mut reader: MessageReader<SpawnProjectile>,
    mut q: Query<
        (
            &mut ProjectileState,
            &mut Projectile,
            &mut Transform,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
            &mut Sprite,
        ),
        With<PooledProjectile>,
    >,
) {
    for req in reader.read() {
        let Some(ProjectileEntity(e)) = pool.pop_free() else {
            debug!("projectile pool exhausted, dropping {:?}", req.kind);
            continue;
        };

        let Ok((mut state, mut projectile, mut tf, mut vel, mut vis, mut layers, mut sprite)) =
            q.get_mut(e)
        else {
            warn!("projectile pool held {e:?}, which is not a pooled projectile");
            continue;
        };

        *state = ProjectileState::Active;
        *projectile = Projectile::fire(req.kind);
        tf.translation = req.from.extend(2.0);
        vel.0 = req.velocity;
        *vis = Visibility::Visible;
        *layers = active_layers(req.kind);
        sprite.color = req.kind.color();
        sprite.custom_size = Some(Vec2::splat(req.kind.radius() * 2.0));
    }
}
