//! Player ordnance producer (windowed app only).
//!
//! Reads the mouse, aims from the player toward the cursor and writes
//! `SpawnProjectile`. It never touches the pool.
//! - left button held: laser stream, one shot per `player_laser_cooldown`,
//! - right click: one bomb.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::camera::MainCamera;
use crate::plugins::player::{Player, PLAYER_RADIUS};

use super::components::Aim;
use super::messages::{ProjectileKind, SpawnProjectile};

/// Unit direction from `origin` to `cursor`, straight up when they coincide.
#[inline]
pub fn aim_direction(origin: Vec2, cursor: Vec2) -> Vec2 {
    let dir = cursor - origin;
    if dir.length_squared() < 1e-4 {
        Vec2::Y
    } else {
        dir.normalize()
    }
}

pub fn player_laser(tunables: &Tunables, origin: Vec2, dir: Vec2) -> SpawnProjectile {
    SpawnProjectile {
        kind: ProjectileKind::PlayerLaser {
            damage: tunables.player_laser_damage,
        },
        from: origin + dir * PLAYER_RADIUS,
        velocity: dir * tunables.player_laser_speed,
    }
}

pub fn player_bomb(tunables: &Tunables, origin: Vec2, dir: Vec2) -> SpawnProjectile {
    SpawnProjectile {
        kind: ProjectileKind::PlayerBomb {
            damage: tunables.player_bomb_damage,
            radius: tunables.player_bomb_radius,
        },
        from: origin + dir * PLAYER_RADIUS,
        velocity: dir * tunables.player_bomb_speed,
    }
}

pub fn update_aim_from_cursor(
    windows: Query<&Window>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut aim: ResMut<Aim>,
) {
    let (Ok(window), Ok((camera, camera_tf))) = (windows.single(), q_camera.single()) else {
        aim.world_cursor = None;
        return;
    };

    aim.world_cursor = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_tf, cursor).ok());
}

pub fn request_player_ordnance(
    time: Res<Time>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    aim: Res<Aim>,
    tunables: Res<Tunables>,
    q_player: Query<&Transform, With<Player>>,
    mut laser_cooldown: Local<f32>,
    mut writer: MessageWriter<SpawnProjectile>,
) {
    *laser_cooldown = (*laser_cooldown - time.delta_secs()).max(0.0);

    let Some(buttons) = buttons else {
        return;
    };
    let Some(cursor) = aim.world_cursor else {
        return;
    };
    let player_tf = match q_player.single() {
        Ok(tf) => tf,
        Err(e) => {
            debug!("no single Player to fire from: {e:?}");
            return;
        }
    };

    let origin = player_tf.translation.truncate();
    let dir = aim_direction(origin, cursor);

    if buttons.pressed(MouseButton::Left) && *laser_cooldown <= 0.0 {
        writer.write(player_laser(&tunables, origin, dir));
        *laser_cooldown = tunables.player_laser_cooldown;
    }
    if buttons.just_pressed(MouseButton::Right) {
        writer.write(player_bomb(&tunables, origin, dir));
    }
}
