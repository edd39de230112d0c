//! Spawner plugin: bounded enemy pools and the timers that fill the arena.
//!
//! A spawner is an entity carrying:
//! - `EnemyPool`: which members are available / active,
//! - `SpawnSchedule`: when to activate how many.
//!
//! Members are warmed up once (dormant, hidden, collision filters cleared) and then
//! only ever change component *values*: waking and parking a body never adds or
//! removes components.
//!
//! Fixed-step flow:
//! - Spawn:  schedules tick; due spawners activate up to `spawn_count` members,
//! - Settle: `EnemyDown` for pooled members -> `recycle` (owner told first), then park;
//!   `SpawnRequest`s (boss minions) are served after recycling.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::Rng;

use crate::common::error::ConfigError;
use crate::common::layers::{active_enemy_layers, dormant_enemy_layers};
use crate::common::rng::SimRng;
use crate::common::schedule::CombatSet;
use crate::common::state::GameState;
use crate::plugins::enemies::{enemy_bundle, Enemy, EnemyDown, Owner, PoolSlot};
use crate::plugins::player::Player;

pub mod config;
pub mod pool;

pub use config::{BoostWindow, SpawnerConfig, SpawnerRoster};
pub use pool::{Activation, EnemyPool};

pub fn plugin(app: &mut App) {
    app.init_resource::<SpawnerRoster>()
        .add_message::<SpawnRequest>()
        .add_systems(OnEnter(GameState::InGame), warm_up_roster)
        .add_systems(
            FixedUpdate,
            (
                run_spawn_schedules.in_set(CombatSet::Spawn),
                (recycle_fallen, serve_spawn_requests)
                    .chain()
                    .in_set(CombatSet::Settle),
            ),
        );
}

// -----------------------------------------------------------------------------
// Components / messages
// -----------------------------------------------------------------------------

/// Spawn timing for one spawner.
#[derive(Component, Debug)]
pub struct SpawnSchedule {
    config: SpawnerConfig,
    tick: Timer,
    elapsed: f32,
}

impl SpawnSchedule {
    pub fn new(config: SpawnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tick: Timer::from_seconds(config.interval, TimerMode::Repeating),
            config,
            elapsed: 0.0,
        })
    }

    #[inline]
    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Inside the boost window right now.
    pub fn is_boosted(&self) -> bool {
        self.config.boost.is_some_and(|b| {
            let cycle = b.interval + b.duration;
            self.elapsed % cycle >= b.interval
        })
    }

    /// Enemies to activate on one spawn tick.
    pub fn spawn_count(&self) -> u32 {
        match self.config.boost {
            Some(b) if self.is_boosted() => self.config.base_rate.saturating_mul(b.multiplier),
            _ => self.config.base_rate,
        }
    }

    /// Advance by `dt`; returns how many enemies are due this step.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.config.timed {
            return 0;
        }
        self.elapsed += dt;
        self.tick.tick(std::time::Duration::from_secs_f32(dt));
        self.tick
            .times_finished_this_tick()
            .saturating_mul(self.spawn_count())
    }

    /// True when the player stands too close to the spawn point.
    pub fn blocked_by(&self, player: Option<Vec2>) -> bool {
        player.is_some_and(|p| p.distance(self.config.spawn_point) <= self.config.min_player_distance)
    }
}

/// Ask `spawner` to activate one member at `at`, moving with `launch`.
#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnRequest {
    pub spawner: Entity,
    pub at: Vec2,
    pub launch: Vec2,
}

/// Everything waking or parking a member writes.
pub type MemberBody = (
    &'static mut Enemy,
    &'static mut PoolSlot,
    &'static mut Transform,
    &'static mut LinearVelocity,
    &'static mut CollisionLayers,
    &'static mut Visibility,
);

// -----------------------------------------------------------------------------
// Warm-up
// -----------------------------------------------------------------------------

/// Create a spawner entity and `capacity` dormant members wired to it.
pub fn warm_up(commands: &mut Commands, config: SpawnerConfig) -> Result<Entity, ConfigError> {
    let schedule = SpawnSchedule::new(config.clone())?;
    let mut pool = EnemyPool::new(config.name.clone(), config.capacity)?;

    let spawner = commands
        .spawn((
            Name::new(format!("Spawner({})", config.name)),
            Transform::from_translation(config.spawn_point.extend(0.0)),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    for _ in 0..config.capacity {
        let enemy = Enemy::of_kind(config.kind).with_owner(Owner::Pool(spawner));
        let member = commands
            .spawn(enemy_bundle(enemy, config.spawn_point, PoolSlot::Dormant))
            .id();
        pool.adopt(member);
    }

    debug!("spawner '{}' warmed up {} {:?}", config.name, config.capacity, config.kind);
    commands.entity(spawner).insert((pool, schedule));
    Ok(spawner)
}

/// Despawn a spawner together with every member it owns, live or parked.
pub fn retire(commands: &mut Commands, spawner: Entity, pool: &EnemyPool) {
    info!(
        "spawner '{}' retired with {} live of {}",
        pool.name(),
        pool.active_count(),
        pool.capacity()
    );
    for member in pool.members() {
        commands.entity(member).try_despawn();
    }
    commands.entity(spawner).try_despawn();
}

fn warm_up_roster(mut commands: Commands, roster: Res<SpawnerRoster>) {
    for config in roster.0.iter().cloned() {
        let name = config.name.clone();
        if let Err(err) = warm_up(&mut commands, config) {
            panic!("spawner '{name}' is misconfigured: {err}");
        }
    }
}

// -----------------------------------------------------------------------------
// Wake / park
// -----------------------------------------------------------------------------

fn wake(
    (mut enemy, mut slot, mut transform, mut velocity, mut layers, mut visibility): (
        Mut<Enemy>,
        Mut<PoolSlot>,
        Mut<Transform>,
        Mut<LinearVelocity>,
        Mut<CollisionLayers>,
        Mut<Visibility>,
    ),
    at: Vec2,
    launch: Vec2,
) {
    enemy.initialize();
    *slot = PoolSlot::Live;
    transform.translation = at.extend(transform.translation.z);
    velocity.0 = launch;
    *layers = active_enemy_layers();
    *visibility = Visibility::Inherited;
}

fn park(
    (mut enemy, mut slot, _transform, mut velocity, mut layers, mut visibility): (
        Mut<Enemy>,
        Mut<PoolSlot>,
        Mut<Transform>,
        Mut<LinearVelocity>,
        Mut<CollisionLayers>,
        Mut<Visibility>,
    ),
) {
    enemy.initialize();
    *slot = PoolSlot::Dormant;
    velocity.0 = Vec2::ZERO;
    *layers = dormant_enemy_layers();
    *visibility = Visibility::Hidden;
}

/// Pop one member and wake it. Returns what the pool said.
fn activate_one(
    pool: &mut EnemyPool,
    q_members: &mut Query<MemberBody, Without<Player>>,
    at: Vec2,
    launch: Vec2,
) -> Activation {
    let outcome = pool.try_activate(|e| q_members.get(e).is_ok_and(|(_, slot, ..)| slot.is_live()));
    if let Activation::Activated(member) = outcome {
        match q_members.get_mut(member) {
            Ok(body) => wake(body, at, launch),
            Err(_) => {
                warn!("pool '{}': member {member} vanished", pool.name());
                pool.recycle(member);
            }
        }
    }
    outcome
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

pub(crate) fn run_spawn_schedules(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<SimRng>,
    q_player: Query<&Transform, With<Player>>,
    mut q_spawners: Query<(&mut EnemyPool, &mut SpawnSchedule)>,
    mut q_members: Query<MemberBody, Without<Player>>,
) {
    let dt = time.delta_secs();
    let player = q_player.single().ok().map(|t| t.translation.truncate());

    for (mut pool, mut schedule) in &mut q_spawners {
        let due = schedule.advance(dt);
        if due == 0 {
            continue;
        }
        if schedule.blocked_by(player) {
            debug!("spawner '{}': player too close, skipping", pool.name());
            continue;
        }

        let origin = schedule.config().spawn_point;
        let scatter = schedule.config().scatter;
        for _ in 0..due {
            let offset = Vec2::new(
                rng.gen_range(-scatter..=scatter),
                rng.gen_range(-scatter..=scatter),
            );
            if activate_one(&mut pool, &mut q_members, origin + offset, Vec2::ZERO)
                == Activation::Exhausted
            {
                debug!("spawner '{}': pool exhausted", pool.name());
                break;
            }
        }
    }
}

/// Owner side of the "I died" notice: recycle first, then park the body.
pub(crate) fn recycle_fallen(
    mut down: MessageReader<EnemyDown>,
    mut q_pools: Query<&mut EnemyPool>,
    mut q_members: Query<MemberBody, Without<Player>>,
) {
    for fallen in down.read() {
        let Owner::Pool(spawner) = fallen.notice.owner else {
            continue;
        };
        match q_pools.get_mut(spawner) {
            Ok(mut pool) => {
                pool.recycle(fallen.entity);
            }
            Err(_) => warn!("{} died but its spawner {spawner} is gone", fallen.entity),
        }
        if let Ok(body) = q_members.get_mut(fallen.entity) {
            park(body);
        }
    }
}

pub(crate) fn serve_spawn_requests(
    mut requests: MessageReader<SpawnRequest>,
    mut q_pools: Query<&mut EnemyPool>,
    mut q_members: Query<MemberBody, Without<Player>>,
) {
    for request in requests.read() {
        let Ok(mut pool) = q_pools.get_mut(request.spawner) else {
            warn!("spawn request for missing spawner {}", request.spawner);
            continue;
        };
        if activate_one(&mut pool, &mut q_members, request.at, request.launch)
            == Activation::Exhausted
        {
            debug!("spawner '{}': request dropped, pool exhausted", pool.name());
        }
    }
}
