//! Physics plugin.
//!
//! Avian is used as a black box: colliders, kinematic integration of `LinearVelocity`,
//! and the spatial query pipeline behind `SpatialProbe`. There is no gravity in a
//! top-down arena and the simulation ticks at a fixed 60 Hz.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub const TICK_HZ: f64 = 60.0;

pub fn plugin(app: &mut App) {
    let ppm = app.world().resource::<Tunables>().pixels_per_meter;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm));
    app.insert_resource(Gravity(Vec2::ZERO));
    app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ));
}
