//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub player_speed: f32,
    pub player_laser_speed: f32,
    pub player_laser_damage: f32,
    /// Seconds between laser shots while the trigger is held.
    pub player_laser_cooldown: f32,
    pub player_bomb_speed: f32,
    pub player_bomb_damage: f32,
    pub player_bomb_radius: f32,
    /// Unspent projectiles go back to the pool after this many seconds.
    pub projectile_lifetime: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            player_speed: 420.0,
            player_laser_speed: 900.0,
            player_laser_damage: 10.0,
            player_laser_cooldown: 0.1,
            player_bomb_speed: 100.0,
            player_bomb_damage: 20.0,
            player_bomb_radius: 40.0,
            projectile_lifetime: 4.0,
        }
    }
}
