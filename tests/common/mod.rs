//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - `hemo_siege::game::configure_headless` installs the gameplay plugins.
//! - time advances by a fixed 20 ms per `app.update()`, so every update runs at
//!   least one 60 Hz fixed step.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use hemo_siege::common::rng::SimRng;
use hemo_siege::plugins::spawner::{SpawnerConfig, SpawnerRoster};

pub const FRAME: Duration = Duration::from_millis(20);

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    hemo_siege::game::configure_headless(&mut app);
    app.insert_resource(SimRng::seeded(7));
    // `App::run` normally does this; tests drive `update()` directly.
    app.finish();
    app.cleanup();
    app
}

/// Headless app with only the given spawners in the arena.
pub fn app_with_roster(spawners: Vec<SpawnerConfig>) -> App {
    let mut app = app_headless();
    app.insert_resource(SpawnerRoster(spawners));
    app
}

pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}
