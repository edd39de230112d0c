use bevy::prelude::*;

use crate::common::tunables::Tunables;

use super::components::{PooledProjectile, Projectile, ProjectileState};

/// Shots that never hit anything go back after `projectile_lifetime`.
pub fn expire_projectiles(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mut q: Query<(&mut Projectile, &mut ProjectileState), With<PooledProjectile>>,
) {
    let dt = time.delta_secs();
    for (mut projectile, mut state) in &mut q {
        if *state != ProjectileState::Active {
            continue;
        }
        if projectile.age_by(dt, tunables.projectile_lifetime) {
            *state = ProjectileState::PendingReturn;
        }
    }
}
