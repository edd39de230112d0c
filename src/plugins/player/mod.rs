//! Player plugin: the target every hostile steers toward.
//!
//! Pipeline:
//! - Update (full app only): sample keyboard, write `PlayerInput`
//! - FixedUpdate: `PlayerInput * MoveSpeed::effective()` -> kinematic velocity
//!
//! Lives, respawn and scoring are someone else's job. This module only exposes:
//! - `MoveSpeed` with additive penalties (clinging enemies slow the player down),
//! - the `PlayerDied` message every lethal contact writes.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};

pub const PLAYER_RADIUS: f32 = 13.0;

#[derive(Component, Debug)]
pub struct Player;

/// Movement speed with stacked penalties.
///
/// Penalties are additive so two clingers attached at once slow twice as much, and
/// each one lifts exactly what it applied.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MoveSpeed {
    base: f32,
    penalty: f32,
}

impl MoveSpeed {
    pub fn new(base: f32) -> Self {
        Self { base, penalty: 0.0 }
    }

    #[inline]
    pub fn effective(&self) -> f32 {
        (self.base - self.penalty).max(0.0)
    }

    #[inline]
    pub fn penalty(&self) -> f32 {
        self.penalty
    }

    pub fn add_penalty(&mut self, amount: f32) {
        self.penalty += amount.max(0.0);
    }

    pub fn lift_penalty(&mut self, amount: f32) {
        self.penalty = (self.penalty - amount.max(0.0)).max(0.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    EnemyContact,
    Explosion,
    Projectile,
    BossContact,
}

/// "The player died" call to the lives/score collaborator.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerDied {
    pub player: Entity,
    pub cause: DeathCause,
}

/// Desired movement direction, written by whatever drives the player.
#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_message::<PlayerDied>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            FixedUpdate,
            apply_movement.run_if(in_state(GameState::InGame)),
        );
}

/// Keyboard steering for the windowed app.
pub fn input_plugin(app: &mut App) {
    app.add_systems(Update, gather_input);
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(
        Layer::Player,
        [Layer::World, Layer::Enemy, Layer::EnemyProjectile],
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        MoveSpeed::new(tunables.player_speed),
        Sprite {
            color: Color::srgb(0.85, 0.7, 0.45),
            custom_size: Some(Vec2::splat(PLAYER_RADIUS * 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -128.0, 1.0),
        RigidBody::Kinematic,
        Collider::circle(PLAYER_RADIUS),
        layers,
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = axis.normalize_or_zero();
}

fn apply_movement(
    input: Res<PlayerInput>,
    mut q_player: Query<(&MoveSpeed, &mut LinearVelocity), With<Player>>,
) {
    let Ok((speed, mut vel)) = q_player.single_mut() else {
        return;
    };
    vel.0 = input.move_axis * speed.effective();
}

#[cfg(test)]
mod tests;
