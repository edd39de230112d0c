//! Projectile hits.
//!
//! Each step every active projectile asks the `SpatialProbe` what it touches, then
//! `strike` decides what that means. The system only turns the answer into messages
//! and marks the projectile `PendingReturn`; the commit system recycles it.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::plugins::enemies::{Damage, EnemyHit, Hit, PoolSlot};
use crate::plugins::player::{DeathCause, Player, PlayerDied};

use super::components::{PooledProjectile, Projectile, ProjectileState};
use super::messages::ProjectileKind;

/// What one projectile overlaps this step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contacts {
    pub player: Option<Entity>,
    /// Live enemies and bosses, nearest first.
    pub targets: Vec<Entity>,
    pub wall: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strike {
    /// Keep flying.
    Miss,
    KillPlayer(Entity),
    Hit { target: Entity, damage: f32 },
    /// Damage everything within `radius` of the projectile.
    Burst { damage: f32, radius: f32 },
    /// Spent on arena geometry.
    Wall,
}

impl Strike {
    #[inline]
    pub fn spends(self) -> bool {
        self != Strike::Miss
    }
}

pub fn strike(kind: ProjectileKind, contacts: &Contacts) -> Strike {
    match kind {
        ProjectileKind::EnemyBullet | ProjectileKind::EnemyLaser => match contacts.player {
            Some(player) => Strike::KillPlayer(player),
            None if contacts.wall => Strike::Wall,
            None => Strike::Miss,
        },
        ProjectileKind::PlayerLaser { damage } => match contacts.targets.first() {
            Some(&target) => Strike::Hit { target, damage },
            None if contacts.wall => Strike::Wall,
            None => Strike::Miss,
        },
        ProjectileKind::PlayerBomb { damage, radius } => {
            if contacts.targets.is_empty() && !contacts.wall {
                Strike::Miss
            } else {
                Strike::Burst { damage, radius }
            }
        }
    }
}

/// Overlaps on `Layer::Enemy`, minus dormant pool members, nearest first.
fn live_targets<P: SpatialProbe>(
    probe: &P,
    center: Vec2,
    radius: f32,
    q_slots: &Query<&PoolSlot>,
    q_positions: &Query<&GlobalTransform>,
) -> Vec<Entity> {
    let mut found: Vec<(Entity, f32)> = probe
        .circle_overlaps(center, radius, Layer::Enemy.into())
        .into_iter()
        .filter(|&e| q_slots.get(e).map_or(true, |slot| slot.is_live()))
        .map(|e| {
            let d = q_positions
                .get(e)
                .map_or(f32::MAX, |tf| tf.translation().truncate().distance_squared(center));
            (e, d)
        })
        .collect();
    found.sort_by(|a, b| a.1.total_cmp(&b.1));
    found.into_iter().map(|(e, _)| e).collect()
}

pub fn resolve_projectile_hits(
    spatial: SpatialQuery,
    mut q_projectiles: Query<(&Projectile, &mut ProjectileState, &Transform), With<PooledProjectile>>,
    q_player: Query<(), With<Player>>,
    q_slots: Query<&PoolSlot>,
    q_positions: Query<&GlobalTransform>,
    mut hits: MessageWriter<EnemyHit>,
    mut died: MessageWriter<PlayerDied>,
) {
    for (projectile, mut state, transform) in &mut q_projectiles {
        if *state != ProjectileState::Active {
            continue;
        }

        let kind = projectile.kind;
        let pos = transform.translation.truncate();
        let r = kind.radius();

        let contacts = if kind.is_hostile() {
            Contacts {
                player: spatial
                    .circle_overlaps(pos, r, Layer::Player.into())
                    .into_iter()
                    .find(|&e| q_player.contains(e)),
                targets: Vec::new(),
                wall: !spatial.circle_overlaps(pos, r, Layer::World.into()).is_empty(),
            }
        } else {
            Contacts {
                player: None,
                targets: live_targets(&spatial, pos, r, &q_slots, &q_positions),
                wall: !spatial.circle_overlaps(pos, r, Layer::World.into()).is_empty(),
            }
        };

        let outcome = strike(kind, &contacts);
        match outcome {
            Strike::Miss | Strike::Wall => {}
            Strike::KillPlayer(player) => {
                died.write(PlayerDied {
                    player,
                    cause: DeathCause::Projectile,
                });
            }
            Strike::Hit { target, damage } => {
                hits.write(EnemyHit {
                    target,
                    hit: Hit::Shot(Damage::Amount(damage)),
                });
            }
            Strike::Burst { damage, radius } => {
                let caught = live_targets(&spatial, pos, radius, &q_slots, &q_positions);
                debug!("bomb burst at {pos} caught {}", caught.len());
                for target in caught {
                    hits.write(EnemyHit {
                        target,
                        hit: Hit::Blast { damage },
                    });
                }
            }
        }

        if outcome.spends() {
            *state = ProjectileState::PendingReturn;
        }
    }
}
