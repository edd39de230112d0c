mod common;

use bevy::prelude::*;
use hemo_siege::plugins::enemies::{Damage, EnemyDestroyed, EnemyHit, EnemyKind, Hit, PoolSlot};
use hemo_siege::plugins::spawner::{EnemyPool, SpawnRequest, SpawnerConfig};

#[derive(Resource, Default)]
struct Destroyed(usize);

fn count_destroyed(mut reader: MessageReader<EnemyDestroyed>, mut destroyed: ResMut<Destroyed>) {
    destroyed.0 += reader.read().count();
}

fn live_members(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    world
        .query::<(Entity, &PoolSlot)>()
        .iter(world)
        .filter(|(_, slot)| slot.is_live())
        .map(|(e, _)| e)
        .collect()
}

fn pool(app: &mut App) -> (Entity, usize) {
    let world = app.world_mut();
    let (e, pool) = world
        .query::<(Entity, &EnemyPool)>()
        .iter(world)
        .find(|(_, p)| p.name() == "test")
        .expect("test pool exists");
    (e, pool.available_count())
}

#[test]
fn timed_spawner_fills_up_to_capacity() {
    let mut app = common::app_with_roster(vec![SpawnerConfig {
        capacity: 3,
        base_rate: 1,
        interval: 0.1,
        boost: None,
        scatter: 0.0,
        ..SpawnerConfig::new("test", EnemyKind::Chaser, Vec2::new(640.0, 384.0))
    }]);

    common::run_frames(&mut app, 40);

    assert_eq!(live_members(&mut app).len(), 3);
    assert_eq!(pool(&mut app).1, 0);
}

#[test]
fn killed_members_return_to_their_pool() {
    let mut app = common::app_with_roster(vec![SpawnerConfig {
        spawn_point: Vec2::new(640.0, 384.0),
        ..SpawnerConfig::on_demand("test", EnemyKind::Wanderer, 2)
    }]);
    app.init_resource::<Destroyed>()
        .add_systems(Update, count_destroyed);
    common::run_frames(&mut app, 2);

    let (spawner, available) = pool(&mut app);
    assert_eq!(available, 2);
    assert!(live_members(&mut app).is_empty());

    app.world_mut().write_message(SpawnRequest {
        spawner,
        at: Vec2::new(600.0, 300.0),
        launch: Vec2::ZERO,
    });
    app.update();

    let live = live_members(&mut app);
    assert_eq!(live.len(), 1);
    assert_eq!(pool(&mut app).1, 1);

    app.world_mut().write_message(EnemyHit {
        target: live[0],
        hit: Hit::Shot(Damage::Lethal),
    });
    common::run_frames(&mut app, 2);

    assert!(live_members(&mut app).is_empty());
    assert_eq!(pool(&mut app).1, 2);
    assert_eq!(app.world().resource::<Destroyed>().0, 1);
}
