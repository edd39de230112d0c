//! Camera plugin (render-only).
//!
//! A single `MainCamera` eases toward the player every frame. Queries that read the
//! player and write the camera are kept disjoint with `Without<...>` filters (B0001).
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera
//! PostUpdate:      follow_player, before transform propagation
//! ```

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::player::Player;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera { responsiveness: 5.0 },
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Fraction of the remaining gap closed this frame. Frame-rate independent.
#[inline]
fn follow_alpha(responsiveness: f32, dt: f32) -> f32 {
    1.0 - (-responsiveness * dt).exp()
}

fn follow_player(
    time: Res<Time>,
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let (Ok(tf_player), Ok((mut tf_cam, main_cam))) = (q_player.single(), q_cam.single_mut()) else {
        return;
    };

    let alpha = follow_alpha(main_cam.responsiveness, time.delta_secs());
    let target = tf_player.translation.truncate();
    let eased = tf_cam.translation.truncate().lerp(target, alpha);
    tf_cam.translation.x = eased.x;
    tf_cam.translation.y = eased.y;
}
