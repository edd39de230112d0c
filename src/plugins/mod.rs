//! Feature plugins.

use bevy::prelude::*;

pub mod boss;
pub mod core;
pub mod enemies;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod spawner;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    spawner::plugin(app);
    boss::plugin(app);
    projectiles::plugin(app);
}

/// Register render and input plugins (requires DefaultPlugins / window infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
    player::input_plugin(app);
    projectiles::input_plugin(app);
}
