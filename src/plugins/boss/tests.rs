//! Unit tests for the boss module.
//!
//! The encounter machine is driven directly with a fixed step and a static probe;
//! world-facing systems that need no physics pipeline run once on a bare `World`.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::encounter::*;
use super::{apply_boss_hits, boss_tint, spawn_encounter, Minions};
use crate::common::error::ConfigError;
use crate::common::layers::Layer;
use crate::common::spatial::StaticObstacles;
use crate::common::steering::Avoidance;
use crate::common::test_utils::run_system_once;
use crate::plugins::enemies::{Damage, EnemyHit, Hit};
use crate::plugins::projectiles::ProjectileKind;
use crate::plugins::spawner::EnemyPool;

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

struct Arena {
    probe: StaticObstacles,
    rng: StdRng,
}

impl Arena {
    fn open() -> Self {
        Self {
            probe: StaticObstacles::new(),
            rng: StdRng::seed_from_u64(5),
        }
    }

    fn step(
        &mut self,
        encounter: &mut Encounter,
        dt: f32,
        position: Vec2,
        target: Option<Vec2>,
    ) -> TickReport {
        let mut ctx = EncounterCtx {
            dt,
            position,
            target,
            probe: &self.probe,
            rng: &mut self.rng,
        };
        encounter.tick(&mut ctx)
    }
}

/// Three short phases a tick of 0.5 s can walk through exactly.
fn quick() -> EncounterConfig {
    EncounterConfig {
        name: "quick".into(),
        shield: None,
        phases: vec![
            PhaseConfig {
                phase: Phase::BulletWave,
                attack: Attack::Fan(AimedFan {
                    count: 3,
                    arc_degrees: 180.0,
                    speed: 100.0,
                }),
                interval: 1.0,
                repeat: Repeat::For(2.0),
            },
            PhaseConfig {
                phase: Phase::MinionSwarm,
                attack: Attack::Minions(MinionLaunch {
                    spawn_distance: 30.0,
                    speed: 100.0,
                    spread: (0.8, 1.2),
                }),
                interval: 0.5,
                repeat: Repeat::Times(2),
            },
            PhaseConfig {
                phase: Phase::Assault,
                attack: Attack::AimedShot { speed: 200.0 },
                interval: 1.0,
                repeat: Repeat::Times(1),
            },
        ],
        phase_pause: 1.0,
        rush: None,
        ..EncounterConfig::boss()
    }
}

fn short_rush() -> RushConfig {
    RushConfig {
        first_after: 0.5,
        interval: 10.0,
        duration: 1.0,
        speed: 100.0,
        cooldown: 0.5,
        stop_distance: None,
        goal: RushGoal::Follow,
        avoidance: Avoidance {
            look_ahead: 20.0,
            samples: 8,
            step_degrees: 45.0,
            obstacles: Layer::World.into(),
        },
    }
}

fn fired(report: &TickReport, kind: ProjectileKind) -> usize {
    report
        .orders
        .iter()
        .filter(|o| matches!(o, Order::Fire { kind: k, .. } if *k == kind))
        .count()
}

fn summoned(report: &TickReport) -> usize {
    report
        .orders
        .iter()
        .filter(|o| matches!(o, Order::Summon { .. }))
        .count()
}

// -----------------------------------------------------------------------------
// Shield / health
// -----------------------------------------------------------------------------

#[test]
fn shield_breaks_then_health_takes_the_next_hit() {
    let mut boss = Encounter::new(EncounterConfig::boss()).unwrap();

    assert_eq!(boss.take_damage(500.0), BossDamage::ShieldBroken);
    assert!(!boss.shield_up());
    assert_eq!(boss.health(), 1500.0);

    assert_eq!(
        boss.take_damage(100.0),
        BossDamage::Wounded { remaining: 1400.0 }
    );
}

#[test]
fn overflow_past_the_shield_is_discarded() {
    let mut boss = Encounter::new(EncounterConfig::boss()).unwrap();

    assert_eq!(boss.take_damage(800.0), BossDamage::ShieldBroken);
    assert_eq!(boss.health(), 1500.0);
    assert_eq!(boss.shield().map(|s| s.value()), Some(0.0));
}

#[test]
fn partial_hits_wear_the_shield_down() {
    let mut boss = Encounter::new(EncounterConfig::boss()).unwrap();

    assert_eq!(
        boss.take_damage(200.0),
        BossDamage::Absorbed { shield_left: 300.0 }
    );
    assert!(boss.shield_up());
    assert_eq!(boss.health(), 1500.0);
}

#[test]
fn shield_regenerates_fully_after_cooldown() {
    let mut boss = Encounter::new(EncounterConfig::boss()).unwrap();
    boss.take_damage(500.0);

    assert!(!boss.tick_tasks(19.9));
    assert!(!boss.shield_up());

    assert!(boss.tick_tasks(0.2));
    assert!(boss.shield_up());
    assert_eq!(boss.shield().map(|s| s.value()), Some(500.0));
    assert_eq!(
        boss.take_damage(100.0),
        BossDamage::Absorbed { shield_left: 400.0 }
    );
}

#[test]
fn meaningless_damage_is_ignored() {
    let mut boss = Encounter::new(EncounterConfig::mini_boss()).unwrap();
    assert_eq!(boss.take_damage(0.0), BossDamage::Ignored);
    assert_eq!(boss.take_damage(-5.0), BossDamage::Ignored);
    assert_eq!(boss.take_damage(f32::NAN), BossDamage::Ignored);
    assert_eq!(boss.health(), 5000.0);
}

#[test]
fn damage_flickers_for_a_fixed_time() {
    let mut boss = Encounter::new(EncounterConfig::mini_boss()).unwrap();
    assert!(!boss.flicker_lit());

    boss.take_damage(10.0);
    assert!(boss.flicker_lit());
    boss.tick_tasks(0.04);
    assert!(!boss.flicker_lit());
    boss.tick_tasks(0.04);
    assert!(boss.flicker_lit());
    boss.tick_tasks(0.2);
    assert!(!boss.flicker_lit());
}

// -----------------------------------------------------------------------------
// Death
// -----------------------------------------------------------------------------

#[test]
fn defeat_is_reported_exactly_once() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(EncounterConfig::mini_boss()).unwrap();
    assert_eq!(boss.check_defeat(), None);

    assert_eq!(
        boss.take_damage(5000.0),
        BossDamage::Wounded { remaining: 0.0 }
    );
    assert_eq!(
        boss.check_defeat(),
        Some(Defeat {
            name: "MiniBoss".into()
        })
    );
    assert_eq!(boss.check_defeat(), None);
    assert!(boss.is_defeated());

    assert_eq!(boss.take_damage(1.0), BossDamage::Ignored);
    let report = arena.step(&mut boss, 0.5, Vec2::ZERO, Some(Vec2::X * 100.0));
    assert!(report.orders.is_empty());
    assert_eq!(report.velocity, Vec2::ZERO);
}

#[test]
fn dead_boss_stops_acting_before_the_defeat_is_collected() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(quick()).unwrap();
    boss.take_damage(10_000.0);

    let report = arena.step(&mut boss, 0.5, Vec2::ZERO, Some(Vec2::X * 100.0));
    assert!(report.orders.is_empty());
    assert!(boss.check_defeat().is_some());
}

// -----------------------------------------------------------------------------
// Phases
// -----------------------------------------------------------------------------

#[test]
fn phases_cycle_in_order_with_pauses_between() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(quick()).unwrap();
    let target = Some(Vec2::new(0.0, -200.0));

    let mut phases = Vec::new();
    let mut actions = Vec::new();
    for _ in 0..14 {
        let report = arena.step(&mut boss, 0.5, Vec2::ZERO, target);
        phases.push(boss.phase());
        actions.push(report.orders.len());
    }

    use Phase::*;
    assert_eq!(
        phases,
        vec![
            Some(BulletWave),
            Some(BulletWave),
            Some(BulletWave),
            None,
            None,
            Some(MinionSwarm),
            Some(MinionSwarm),
            None,
            None,
            Some(Assault),
            Some(Assault),
            None,
            None,
            Some(BulletWave),
        ]
    );
    assert_eq!(actions, vec![3, 3, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 3]);
}

#[test]
fn fan_is_centred_on_the_target() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(EncounterConfig::boss()).unwrap();

    let report = arena.step(&mut boss, 1.0 / 60.0, Vec2::ZERO, Some(Vec2::new(0.0, -100.0)));
    assert_eq!(fired(&report, ProjectileKind::EnemyBullet), 15);

    let Order::Fire { from, velocity, .. } = report.orders[7] else {
        panic!("expected a projectile");
    };
    assert!((velocity - Vec2::new(0.0, -100.0)).length() < 1e-3);
    assert!((from - Vec2::new(0.0, -30.0)).length() < 1e-3);

    let Order::Fire { velocity: first, .. } = report.orders[0] else {
        unreachable!()
    };
    let Order::Fire { velocity: last, .. } = report.orders[14] else {
        unreachable!()
    };
    assert!((first.normalize() + last.normalize()).length() < 1e-3, "180 degree spread");
}

#[test]
fn minions_launch_outward_within_the_band() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(quick()).unwrap();
    let origin = Vec2::new(50.0, 50.0);
    let target = Some(Vec2::ZERO);

    let mut summons = Vec::new();
    for _ in 0..7 {
        let report = arena.step(&mut boss, 0.5, origin, target);
        summons.extend(report.orders.into_iter().filter_map(|o| match o {
            Order::Summon { at, launch } => Some((at, launch)),
            Order::Fire { .. } => None,
        }));
    }

    assert_eq!(summons.len(), 2);
    for (at, launch) in summons {
        assert!((at.distance(origin) - 30.0).abs() < 1e-3);
        assert!((80.0 - 1e-3..=120.0 + 1e-3).contains(&launch.length()));
        assert!(launch.normalize().dot((at - origin).normalize()) > 0.999);
    }
}

#[test]
fn missing_target_idles_the_encounter() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(quick()).unwrap();

    for _ in 0..6 {
        let report = arena.step(&mut boss, 0.5, Vec2::ZERO, None);
        assert!(report.orders.is_empty());
        assert_eq!(report.velocity, Vec2::ZERO);
    }
    assert_eq!(boss.phase(), Some(Phase::BulletWave));

    let report = arena.step(&mut boss, 0.5, Vec2::ZERO, Some(Vec2::X * 100.0));
    assert_eq!(fired(&report, ProjectileKind::EnemyBullet), 3);
}

// -----------------------------------------------------------------------------
// Rush
// -----------------------------------------------------------------------------

#[test]
fn rush_runs_alongside_the_phase_clock() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(EncounterConfig {
        rush: Some(short_rush()),
        ..quick()
    })
    .unwrap();
    let target = Some(Vec2::new(200.0, 0.0));

    let first = arena.step(&mut boss, 0.5, Vec2::ZERO, target);
    assert!(boss.is_rushing());
    assert_eq!(first.velocity, Vec2::new(100.0, 0.0));
    assert_eq!(fired(&first, ProjectileKind::EnemyBullet), 3);

    let second = arena.step(&mut boss, 0.5, Vec2::ZERO, target);
    assert_eq!(second.velocity, Vec2::new(100.0, 0.0));
    assert_eq!(fired(&second, ProjectileKind::EnemyBullet), 3);

    let third = arena.step(&mut boss, 0.5, Vec2::ZERO, target);
    assert_eq!(third.velocity, Vec2::ZERO);
    assert!(matches!(boss.rush_state(), RushState::Cooling { .. }));

    arena.step(&mut boss, 0.5, Vec2::ZERO, target);
    assert_eq!(boss.rush_state(), RushState::Idle);
}

#[test]
fn rush_steers_around_walls() {
    let mut arena = Arena::open();
    arena.probe = StaticObstacles::new().with_wall(Rect::new(10.0, -5.0, 20.0, 5.0));
    let mut boss = Encounter::new(EncounterConfig {
        rush: Some(short_rush()),
        ..quick()
    })
    .unwrap();

    let report = arena.step(&mut boss, 0.5, Vec2::ZERO, Some(Vec2::new(200.0, 0.0)));
    assert!((report.velocity.length() - 100.0).abs() < 1e-3);
    assert!(report.velocity.normalize().dot(Vec2::X) < 0.99);
}

#[test]
fn mini_boss_fans_ten_and_stops_short_of_the_target() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(EncounterConfig::mini_boss()).unwrap();

    let report = arena.step(&mut boss, 1.0 / 60.0, Vec2::ZERO, Some(Vec2::new(30.0, 0.0)));
    assert_eq!(fired(&report, ProjectileKind::EnemyBullet), 10);
    assert_eq!(summoned(&report), 0);
    assert_eq!(report.velocity, Vec2::ZERO);
    assert!(matches!(boss.rush_state(), RushState::Cooling { .. }));
}

#[test]
fn captured_rush_keeps_its_goal() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(EncounterConfig::mini_boss()).unwrap();

    let first = arena.step(&mut boss, 1.0 / 60.0, Vec2::ZERO, Some(Vec2::new(200.0, 0.0)));
    assert_eq!(first.velocity, Vec2::new(200.0, 0.0));

    let second = arena.step(&mut boss, 1.0 / 60.0, Vec2::ZERO, Some(Vec2::new(0.0, 200.0)));
    assert_eq!(second.velocity, Vec2::new(200.0, 0.0));
}

#[test]
fn mini_boss_fires_once_per_cycle() {
    let mut arena = Arena::open();
    let mut boss = Encounter::new(EncounterConfig::mini_boss()).unwrap();
    let target = Some(Vec2::new(0.0, 500.0));

    let fans = (0..19)
        .map(|_| arena.step(&mut boss, 0.5, Vec2::ZERO, target))
        .filter(|r| fired(r, ProjectileKind::EnemyBullet) > 0)
        .count();
    assert_eq!(fans, 2);
}

// -----------------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------------

#[test]
fn shipped_configs_are_valid() {
    assert!(EncounterConfig::boss().validate().is_ok());
    assert!(EncounterConfig::mini_boss().validate().is_ok());
    assert!(!EncounterConfig::mini_boss().summons());
}

#[test]
fn broken_configs_fail_fast() {
    let no_phases = EncounterConfig {
        phases: Vec::new(),
        ..quick()
    };
    assert_eq!(
        no_phases.validate(),
        Err(ConfigError::NoPhases("quick".into()))
    );

    let mut empty_fan = quick();
    empty_fan.phases[0].attack = Attack::Fan(AimedFan {
        count: 0,
        arc_degrees: 180.0,
        speed: 100.0,
    });
    assert_eq!(
        empty_fan.validate(),
        Err(ConfigError::EmptyFan("quick".into()))
    );

    let no_minion_room = EncounterConfig {
        minion_capacity: 0,
        ..quick()
    };
    assert!(matches!(
        no_minion_room.validate(),
        Err(ConfigError::ZeroCapacity { .. })
    ));

    let negative_pause = EncounterConfig {
        phase_pause: -1.0,
        ..quick()
    };
    assert!(matches!(
        Encounter::new(negative_pause),
        Err(ConfigError::NonPositiveInterval { .. })
    ));
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

#[test]
fn spawning_a_summoner_warms_up_its_minion_pool() {
    let mut world = World::new();
    let boss = run_system_once(&mut world, |mut commands: Commands| {
        spawn_encounter(&mut commands, EncounterConfig::boss(), Vec2::new(0.0, 300.0))
    })
    .expect("boss config is valid");

    let minions = world.get::<Minions>(boss).expect("boss summons").0;
    let pool = world.get::<EnemyPool>(minions).expect("minion spawner has a pool");
    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.available_count(), 10);
}

#[test]
fn non_summoner_gets_no_pool_and_bad_config_spawns_nothing() {
    let mut world = World::new();
    let mini = run_system_once(&mut world, |mut commands: Commands| {
        spawn_encounter(&mut commands, EncounterConfig::mini_boss(), Vec2::ZERO)
    })
    .unwrap();
    assert!(world.get::<Minions>(mini).is_none());

    let before = world.query::<Entity>().iter(&world).count();
    let result = run_system_once(&mut world, |mut commands: Commands| {
        let broken = EncounterConfig {
            phases: Vec::new(),
            ..EncounterConfig::boss()
        };
        spawn_encounter(&mut commands, broken, Vec2::ZERO)
    });
    assert!(result.is_err());
    assert_eq!(world.query::<Entity>().iter(&world).count(), before);
}

#[test]
fn hits_reach_the_shield_before_health() {
    let mut world = World::new();
    world.init_resource::<Messages<EnemyHit>>();
    let boss = world
        .spawn(Encounter::new(EncounterConfig::boss()).unwrap())
        .id();

    world.write_message(EnemyHit {
        target: boss,
        hit: Hit::Shot(Damage::Amount(500.0)),
    });
    run_system_once(&mut world, apply_boss_hits);
    let encounter = world.get::<Encounter>(boss).unwrap();
    assert!(!encounter.shield_up());
    assert_eq!(encounter.health(), 1500.0);

    world.write_message(EnemyHit {
        target: boss,
        hit: Hit::Blast { damage: 20.0 },
    });
    run_system_once(&mut world, apply_boss_hits);
    assert_eq!(world.get::<Encounter>(boss).unwrap().health(), 1480.0);

    world.write_message(EnemyHit {
        target: boss,
        hit: Hit::Shot(Damage::Lethal),
    });
    run_system_once(&mut world, apply_boss_hits);
    assert_eq!(world.get::<Encounter>(boss).unwrap().health(), 0.0);
}

#[test]
fn tint_follows_flicker_then_shield() {
    let mut boss = Encounter::new(EncounterConfig::boss()).unwrap();
    assert_eq!(boss_tint(&boss), Color::srgb(0.55, 0.8, 1.0));

    boss.take_damage(1.0);
    assert_eq!(boss_tint(&boss), Color::srgb(1.0, 0.2, 0.2));
}
