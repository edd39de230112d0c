//! World plugin: arena walls, static obstacles and the walkable grid.
//!
//! The grid is the gameplay view of the same geometry the physics engine sees:
//! - playfield bounds (wanderers clamp into it),
//! - which cells are floor (lunges abort when they would leave it),
//! - open cell centres (candidate teleport sites).

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::GameState;

pub const TILE: f32 = 64.0;
pub const HALF_W: f32 = TILE * 16.0;
pub const HALF_H: f32 = TILE * 9.0;

/// Static obstacles inside the arena: (centre, size).
const OBSTACLES: [(Vec2, Vec2); 4] = [
    (Vec2::new(-384.0, 192.0), Vec2::new(128.0, 128.0)),
    (Vec2::new(384.0, 192.0), Vec2::new(128.0, 128.0)),
    (Vec2::new(-384.0, -256.0), Vec2::new(192.0, 64.0)),
    (Vec2::new(384.0, -256.0), Vec2::new(192.0, 64.0)),
];

pub fn plugin(app: &mut App) {
    app.insert_resource(WalkableGrid::arena());
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

// -----------------------------------------------------------------------------
// Walkable grid
// -----------------------------------------------------------------------------

#[derive(Resource, Debug, Clone)]
pub struct WalkableGrid {
    origin: Vec2,
    cell: f32,
    cols: u32,
    rows: u32,
    blocked: Vec<bool>,
}

impl WalkableGrid {
    /// Grid covering `bounds` with square cells; every cell starts walkable.
    pub fn new(bounds: Rect, cell: f32) -> Self {
        let size = bounds.size();
        let cols = (size.x / cell).floor().max(1.0) as u32;
        let rows = (size.y / cell).floor().max(1.0) as u32;
        Self {
            origin: bounds.min,
            cell,
            cols,
            rows,
            blocked: vec![false; (cols * rows) as usize],
        }
    }

    /// The default arena: full playfield minus the static obstacles.
    pub fn arena() -> Self {
        let mut grid = Self::new(Rect::new(-HALF_W, -HALF_H, HALF_W, HALF_H), TILE);
        for (center, size) in OBSTACLES {
            grid.block_rect(Rect::from_center_size(center, size));
        }
        grid
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(
            self.origin,
            self.origin + Vec2::new(self.cols as f32, self.rows as f32) * self.cell,
        )
    }

    /// Mark every cell whose centre lies inside `rect` as blocked.
    pub fn block_rect(&mut self, rect: Rect) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if rect.contains(self.center_of(col, row)) {
                    let i = self.index(col, row);
                    self.blocked[i] = true;
                }
            }
        }
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        (row * self.cols + col) as usize
    }

    #[inline]
    fn center_of(&self, col: u32, row: u32) -> Vec2 {
        self.origin + (Vec2::new(col as f32, row as f32) + Vec2::splat(0.5)) * self.cell
    }

    pub fn cell_of(&self, pos: Vec2) -> Option<UVec2> {
        let local = (pos - self.origin) / self.cell;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let cell = local.floor().as_uvec2();
        (cell.x < self.cols && cell.y < self.rows).then_some(cell)
    }

    /// Floor that is inside the arena and not covered by an obstacle.
    pub fn is_walkable(&self, pos: Vec2) -> bool {
        self.cell_of(pos)
            .is_some_and(|c| !self.blocked[self.index(c.x, c.y)])
    }

    /// Centres of all walkable cells.
    pub fn open_cells(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (col, row)))
            .filter(|&(col, row)| !self.blocked[self.index(col, row)])
            .map(|(col, row)| self.center_of(col, row))
    }
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

fn spawn_arena(mut commands: Commands) {
    let wall_color = Color::srgb(0.45, 0.12, 0.16);
    let thickness = 30.0;

    let wall_layers = CollisionLayers::new(
        Layer::World,
        [
            Layer::Player,
            Layer::Enemy,
            Layer::PlayerOrdnance,
            Layer::EnemyProjectile,
        ],
    );

    let mut spawn_block = |name: String, pos: Vec2, size: Vec2| {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    };

    spawn_block(
        "WallTop".into(),
        Vec2::new(0.0, HALF_H + thickness * 0.5),
        Vec2::new(HALF_W * 2.0 + thickness * 2.0, thickness),
    );
    spawn_block(
        "WallBottom".into(),
        Vec2::new(0.0, -HALF_H - thickness * 0.5),
        Vec2::new(HALF_W * 2.0 + thickness * 2.0, thickness),
    );
    spawn_block(
        "WallLeft".into(),
        Vec2::new(-HALF_W - thickness * 0.5, 0.0),
        Vec2::new(thickness, HALF_H * 2.0),
    );
    spawn_block(
        "WallRight".into(),
        Vec2::new(HALF_W + thickness * 0.5, 0.0),
        Vec2::new(thickness, HALF_H * 2.0),
    );

    for (i, (center, size)) in OBSTACLES.into_iter().enumerate() {
        spawn_block(format!("Obstacle{i}"), center, size);
    }
}

#[cfg(test)]
mod tests;
