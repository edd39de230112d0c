//! Enemy systems. Thin adapters between ECS data and the `Enemy` contract.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::rng::SimRng;
use crate::common::spatial::SpatialProbe;
use crate::plugins::player::{DeathCause, MoveSpeed, Player, PlayerDied};
use crate::plugins::world::WalkableGrid;

use super::components::{BehaviorState, ContactResponse, DamageOutcome, Enemy, Owner, PoolSlot};
use super::messages::{EnemyDestroyed, EnemyDown, EnemyHit, Hit};
use super::variants::MoveCtx;

/// Run every live, mobile enemy's movement policy for one step.
pub(crate) fn steer_enemies(
    time: Res<Time<Fixed>>,
    spatial: SpatialQuery,
    grid: Res<WalkableGrid>,
    mut rng: ResMut<SimRng>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<
        (Entity, &mut Enemy, &PoolSlot, &mut Transform, &mut LinearVelocity),
        Without<Player>,
    >,
) {
    let dt = time.delta_secs();
    let target = q_player.single().ok().map(|t| t.translation.truncate());

    for (entity, mut enemy, slot, mut transform, mut velocity) in &mut q_enemies {
        if !slot.is_live() {
            continue;
        }
        if !enemy.can_move() {
            velocity.0 = Vec2::ZERO;
            continue;
        }

        let profile = *enemy.profile();
        let mut ctx = MoveCtx {
            entity,
            dt,
            position: transform.translation.truncate(),
            velocity: velocity.0,
            speed: profile.speed,
            radius: profile.radius,
            target,
            probe: &spatial,
            grid: &grid,
            rng: &mut rng.0,
        };
        let steer = enemy.behavior_mut().steer(&mut ctx);

        if let Some(to) = steer.reposition {
            transform.translation.x = to.x;
            transform.translation.y = to.y;
        }
        velocity.0 = steer.velocity;
    }
}

/// Player touching a live enemy: kill, attach or light a fuse, per variant.
pub(crate) fn resolve_player_contacts(
    spatial: SpatialQuery,
    mut q_player: Query<(Entity, &Transform, &mut MoveSpeed), (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<(&mut Enemy, &PoolSlot, &Transform), Without<Player>>,
    mut died: MessageWriter<PlayerDied>,
) {
    let Ok((player, player_tf, mut speed)) = q_player.single_mut() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();

    for (mut enemy, slot, transform) in &mut q_enemies {
        if !slot.is_live() || !enemy.can_move() {
            continue;
        }
        let pos = transform.translation.truncate();
        let touching = spatial
            .circle_overlaps(pos, enemy.profile().radius, Layer::Player.into())
            .contains(&player);
        if !touching {
            continue;
        }

        match enemy.contact_player(player, pos - player_pos) {
            ContactResponse::KillPlayer => {
                died.write(PlayerDied {
                    player,
                    cause: DeathCause::EnemyContact,
                });
            }
            ContactResponse::Attached { penalty } => speed.add_penalty(penalty),
            ContactResponse::Detonating | ContactResponse::None => {}
        }
    }
}

/// Apply `EnemyHit`s addressed to enemies. Other targets are skipped.
pub(crate) fn apply_enemy_hits(
    mut hits: MessageReader<EnemyHit>,
    mut q_enemies: Query<(&mut Enemy, &PoolSlot, &Transform)>,
    mut down: MessageWriter<EnemyDown>,
) {
    for hit in hits.read() {
        let Ok((mut enemy, slot, transform)) = q_enemies.get_mut(hit.target) else {
            continue;
        };
        if !slot.is_live() {
            continue;
        }

        let outcome = match hit.hit {
            Hit::Shot(damage) => enemy.take_damage(damage),
            Hit::Blast { damage } => enemy.blast(damage),
        };
        if let DamageOutcome::Killed(notice) = outcome {
            down.write(EnemyDown {
                entity: hit.target,
                position: transform.translation.truncate(),
                notice,
            });
        }
    }
}

/// Advance stun / flash / fuse tasks; a burnt fuse blasts the player and kills
/// the enemy.
pub(crate) fn tick_enemy_tasks(
    time: Res<Time<Fixed>>,
    spatial: SpatialQuery,
    q_player: Query<(), With<Player>>,
    mut q_enemies: Query<(Entity, &mut Enemy, &PoolSlot, &Transform)>,
    mut died: MessageWriter<PlayerDied>,
    mut down: MessageWriter<EnemyDown>,
) {
    let dt = time.delta_secs();

    for (entity, mut enemy, slot, transform) in &mut q_enemies {
        if !slot.is_live() || !enemy.tick_tasks(dt) {
            continue;
        }

        let pos = transform.translation.truncate();
        let radius = enemy.explosion_radius().unwrap_or_default();
        for caught in spatial.circle_overlaps(pos, radius, Layer::Player.into()) {
            if q_player.contains(caught) {
                died.write(PlayerDied {
                    player: caught,
                    cause: DeathCause::Explosion,
                });
            }
        }
        debug!("{entity} detonated at {pos}");

        if let Some(notice) = enemy.die() {
            down.write(EnemyDown {
                entity,
                position: pos,
                notice,
            });
        }
    }
}

/// Undo held effects, remove unowned enemies and announce every death.
///
/// Pooled enemies are returned to their spawner by the spawner's own system.
pub(crate) fn settle_fallen(
    mut commands: Commands,
    mut down: MessageReader<EnemyDown>,
    mut q_speed: Query<&mut MoveSpeed>,
    mut destroyed: MessageWriter<EnemyDestroyed>,
) {
    for fallen in down.read() {
        let notice = fallen.notice;
        if let Some(release) = notice.released {
            if let Ok(mut speed) = q_speed.get_mut(release.anchor) {
                speed.lift_penalty(release.speed_penalty);
            }
        }
        if notice.owner == Owner::World {
            commands.entity(fallen.entity).try_despawn();
        }
        destroyed.write(EnemyDestroyed {
            entity: fallen.entity,
            kind: notice.kind,
            position: fallen.position,
        });
    }
}

/// Colour derived from state and running tasks.
pub fn enemy_tint(enemy: &Enemy) -> Color {
    let base = enemy.kind().color();
    match enemy.state() {
        BehaviorState::Exploding if enemy.flicker_lit() => Color::WHITE,
        BehaviorState::Exploding => base,
        BehaviorState::Stunned => Color::srgb(0.45, 0.55, 1.0),
        _ if enemy.is_flashing() => Color::srgb(1.0, 0.2, 0.2),
        _ if enemy.behavior().is_telegraphing() => Color::srgb(1.0, 0.95, 0.95),
        _ => base,
    }
}

pub(crate) fn tint_enemies(mut q_enemies: Query<(&Enemy, &PoolSlot, &mut Sprite)>) {
    for (enemy, slot, mut sprite) in &mut q_enemies {
        if !slot.is_live() {
            continue;
        }
        let tint = enemy_tint(enemy);
        if sprite.color != tint {
            sprite.color = tint;
        }
    }
}
