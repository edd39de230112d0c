//! Boss plugin: one scheduled encounter at a time.
//!
//! The `Encounter` component holds every rule (see `encounter.rs`). Systems here:
//! - spawn it on entering the game, together with an on-demand minion pool,
//! - Steer:   death check first (a defeated boss takes its minion pool along), then
//!            phases + rush -> projectiles, summons, velocity,
//! - Contact: touching the player is lethal,
//! - Resolve: `EnemyHit`s aimed at the boss -> shield / health.
//!
//! Minions are ordinary pooled enemies. The boss only asks its pool for them through
//! `SpawnRequest`; the spawner serves the request later in the same step.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::error::ConfigError;
use crate::common::layers::{active_enemy_layers, Layer};
use crate::common::rng::SimRng;
use crate::common::schedule::CombatSet;
use crate::common::spatial::SpatialProbe;
use crate::common::state::GameState;
use crate::plugins::enemies::{Damage, EnemyHit, Hit};
use crate::plugins::player::{DeathCause, Player, PlayerDied};
use crate::plugins::projectiles::SpawnProjectile;
use crate::plugins::spawner::{retire, warm_up, EnemyPool, SpawnRequest, SpawnerConfig};

pub mod encounter;

pub use encounter::{
    AimedFan, Attack, BossDamage, Defeat, Encounter, EncounterConfig, EncounterCtx, MinionLaunch,
    Order, Phase, PhaseConfig, Repeat, RushConfig, RushGoal, RushState, ShieldConfig, TickReport,
};

pub fn plugin(app: &mut App) {
    app.init_resource::<EncounterSetup>()
        .add_message::<EncounterEnded>()
        .add_systems(OnEnter(GameState::InGame), start_encounter)
        .add_systems(
            FixedUpdate,
            (
                run_encounters.in_set(CombatSet::Steer),
                resolve_boss_contacts.in_set(CombatSet::Contact),
                apply_boss_hits.in_set(CombatSet::Resolve),
            ),
        )
        .add_systems(
            PostUpdate,
            tint_bosses.run_if(in_state(GameState::InGame)),
        );
}

/// Which encounter (if any) starts when the game does, and where.
#[derive(Resource, Clone, Debug)]
pub struct EncounterSetup {
    pub config: Option<EncounterConfig>,
    pub at: Vec2,
}

impl Default for EncounterSetup {
    fn default() -> Self {
        Self {
            config: Some(EncounterConfig::boss()),
            at: Vec2::new(0.0, 320.0),
        }
    }
}

/// The spawner entity serving this boss's summons.
#[derive(Component, Clone, Copy, Debug)]
pub struct Minions(pub Entity);

/// Public "the boss is gone" notice.
#[derive(Message, Clone, Debug)]
pub struct EncounterEnded {
    pub boss: Entity,
    pub name: String,
    pub position: Vec2,
}

/// Spawn a boss at `at`, plus its minion pool when any phase summons.
pub fn spawn_encounter(
    commands: &mut Commands,
    config: EncounterConfig,
    at: Vec2,
) -> Result<Entity, ConfigError> {
    let encounter = Encounter::new(config)?;
    let config = encounter.config();
    let name = config.name.clone();
    let radius = config.radius;

    let minions = if config.summons() {
        let pool = SpawnerConfig {
            spawn_point: at,
            ..SpawnerConfig::on_demand(format!("{name} minions"), config.minion_kind, config.minion_capacity)
        };
        Some(warm_up(commands, pool)?)
    } else {
        None
    };

    let mut boss = commands.spawn((
        Name::new(name.clone()),
        Sprite {
            color: BOSS_COLOR,
            custom_size: Some(Vec2::splat(radius * 2.0)),
            ..default()
        },
        Transform::from_translation(at.extend(1.0)),
        Collider::circle(radius),
        active_enemy_layers(),
        DespawnOnExit(GameState::InGame),
        encounter,
    ));
    if let Some(pool) = minions {
        boss.insert(Minions(pool));
    }

    info!("encounter '{name}' started at {at}");
    Ok(boss.id())
}

fn start_encounter(mut commands: Commands, setup: Res<EncounterSetup>) {
    let Some(config) = setup.config.clone() else {
        return;
    };
    let name = config.name.clone();
    if let Err(err) = spawn_encounter(&mut commands, config, setup.at) {
        panic!("encounter '{name}' is misconfigured: {err}");
    }
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

pub(crate) fn run_encounters(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    spatial: SpatialQuery,
    mut rng: ResMut<SimRng>,
    q_player: Query<&Transform, (With<Player>, Without<Encounter>)>,
    mut q_bosses: Query<
        (Entity, &mut Encounter, &Transform, &mut LinearVelocity, Option<&Minions>),
        Without<Player>,
    >,
    q_pools: Query<&EnemyPool>,
    mut projectiles: MessageWriter<SpawnProjectile>,
    mut requests: MessageWriter<SpawnRequest>,
    mut ended: MessageWriter<EncounterEnded>,
) {
    let dt = time.delta_secs();
    let target = q_player.single().ok().map(|t| t.translation.truncate());

    for (entity, mut encounter, transform, mut velocity, minions) in &mut q_bosses {
        let position = transform.translation.truncate();

        if let Some(Defeat { name }) = encounter.check_defeat() {
            info!("encounter '{name}' defeated at {position}");
            velocity.0 = Vec2::ZERO;
            commands.entity(entity).try_despawn();
            if let Some(&Minions(spawner)) = minions {
                match q_pools.get(spawner) {
                    Ok(pool) => retire(&mut commands, spawner, pool),
                    Err(_) => warn!("'{name}' minion pool {spawner} is already gone"),
                }
            }
            ended.write(EncounterEnded {
                boss: entity,
                name,
                position,
            });
            continue;
        }
        if encounter.is_defeated() {
            continue;
        }

        let mut ctx = EncounterCtx {
            dt,
            position,
            target,
            probe: &spatial,
            rng: &mut rng.0,
        };
        let report = encounter.tick(&mut ctx);
        velocity.0 = report.velocity;

        for order in report.orders {
            match order {
                Order::Fire {
                    kind,
                    from,
                    velocity: shot,
                } => {
                    projectiles.write(SpawnProjectile {
                        kind,
                        from,
                        velocity: shot,
                    });
                }
                Order::Summon { at, launch } => match minions {
                    Some(pool) => {
                        requests.write(SpawnRequest {
                            spawner: pool.0,
                            at,
                            launch,
                        });
                    }
                    None => warn!("'{}' summoned without a minion pool", encounter.name()),
                },
            }
        }
    }
}

pub(crate) fn resolve_boss_contacts(
    spatial: SpatialQuery,
    q_player: Query<Entity, With<Player>>,
    q_bosses: Query<(&Encounter, &Transform)>,
    mut died: MessageWriter<PlayerDied>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };

    for (encounter, transform) in &q_bosses {
        if encounter.is_defeated() {
            continue;
        }
        let touching = spatial
            .circle_overlaps(
                transform.translation.truncate(),
                encounter.config().radius,
                Layer::Player.into(),
            )
            .contains(&player);
        if touching {
            died.write(PlayerDied {
                player,
                cause: DeathCause::BossContact,
            });
        }
    }
}

/// Hits on anything that is not a boss are left to the enemy systems.
pub(crate) fn apply_boss_hits(mut hits: MessageReader<EnemyHit>, mut q_bosses: Query<&mut Encounter>) {
    for hit in hits.read() {
        let Ok(mut encounter) = q_bosses.get_mut(hit.target) else {
            continue;
        };
        let amount = match hit.hit {
            Hit::Shot(Damage::Amount(amount)) => amount,
            Hit::Shot(Damage::Lethal) => f32::INFINITY,
            Hit::Blast { damage } => damage,
        };

        match encounter.take_damage(amount) {
            BossDamage::ShieldBroken => info!("'{}' shield down", encounter.name()),
            BossDamage::Wounded { remaining } => {
                debug!("'{}' took {amount}, {remaining} left", encounter.name());
            }
            BossDamage::Absorbed { .. } | BossDamage::Ignored => {}
        }
    }
}

const BOSS_COLOR: Color = Color::srgb(0.6, 0.1, 0.35);

pub fn boss_tint(encounter: &Encounter) -> Color {
    if encounter.flicker_lit() {
        Color::srgb(1.0, 0.2, 0.2)
    } else if encounter.shield_up() {
        Color::srgb(0.55, 0.8, 1.0)
    } else if encounter.is_rushing() {
        Color::srgb(1.0, 0.55, 0.3)
    } else {
        BOSS_COLOR
    }
}

fn tint_bosses(mut q_bosses: Query<(&Encounter, &mut Sprite)>) {
    for (encounter, mut sprite) in &mut q_bosses {
        let tint = boss_tint(encounter);
        if sprite.color != tint {
            sprite.color = tint;
        }
    }
}

#[cfg(test)]
mod tests;
