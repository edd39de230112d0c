use avian2d::prelude::*;
use bevy::prelude::*;

use super::{MoveSpeed, Player, PlayerInput};
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;

#[test]
fn spawn_creates_player_with_base_speed() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn);

    let speed = world
        .query_filtered::<&MoveSpeed, With<Player>>()
        .single(&world)
        .unwrap();
    assert_eq!(speed.effective(), Tunables::default().player_speed);
}

#[test]
fn apply_movement_uses_effective_speed() {
    let mut world = World::new();
    world.insert_resource(PlayerInput { move_axis: Vec2::new(1.0, 0.0) });
    let mut speed = MoveSpeed::new(100.0);
    speed.add_penalty(40.0);
    world.spawn((Player, speed, LinearVelocity::ZERO));

    run_system_once(&mut world, super::apply_movement);

    let v = world.query::<&LinearVelocity>().iter(&world).next().unwrap();
    assert_eq!(v.0, Vec2::new(60.0, 0.0));
}

#[test]
fn penalties_stack_and_lift_exactly() {
    let mut speed = MoveSpeed::new(100.0);
    speed.add_penalty(30.0);
    speed.add_penalty(30.0);
    assert_eq!(speed.effective(), 40.0);

    speed.lift_penalty(30.0);
    assert_eq!(speed.effective(), 70.0);
    speed.lift_penalty(30.0);
    speed.lift_penalty(30.0);
    assert_eq!(speed.effective(), 100.0);
    assert_eq!(speed.penalty(), 0.0);
}
