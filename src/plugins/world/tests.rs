use avian2d::prelude::*;
use bevy::prelude::*;

use super::WalkableGrid;
use crate::common::test_utils::run_system_once;

#[test]
fn spawns_walls_and_obstacles_on_enter() {
    let mut world = World::new();
    run_system_once(&mut world, super::spawn_arena);

    let count_named = |world: &mut World, prefix: &str| {
        world
            .query::<(&Name, &RigidBody)>()
            .iter(world)
            .filter(|(n, rb)| n.as_str().starts_with(prefix) && matches!(**rb, RigidBody::Static))
            .count()
    };
    assert_eq!(count_named(&mut world, "Wall"), 4);
    assert_eq!(count_named(&mut world, "Obstacle"), super::OBSTACLES.len());
}

#[test]
fn grid_blocks_obstacle_cells_and_outside() {
    let mut grid = WalkableGrid::new(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0);
    grid.block_rect(Rect::new(20.0, 20.0, 40.0, 40.0));

    assert!(grid.is_walkable(Vec2::new(5.0, 5.0)));
    assert!(!grid.is_walkable(Vec2::new(25.0, 25.0)));
    assert!(!grid.is_walkable(Vec2::new(-1.0, 5.0)));
    assert!(!grid.is_walkable(Vec2::new(5.0, 100.5)));

    // 10x10 cells, 2x2 blocked.
    assert_eq!(grid.open_cells().count(), 96);
    assert!(grid.open_cells().all(|c| grid.is_walkable(c)));
}

#[test]
fn arena_grid_matches_playfield() {
    let grid = WalkableGrid::arena();
    let bounds = grid.bounds();
    assert_eq!(bounds.min, Vec2::new(-super::HALF_W, -super::HALF_H));
    assert_eq!(bounds.max, Vec2::new(super::HALF_W, super::HALF_H));
    assert!(!grid.is_walkable(super::OBSTACLES[0].0));
    assert!(grid.is_walkable(Vec2::new(0.0, 32.0)));
}
