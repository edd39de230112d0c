//! Collision layers.
//!
//! Layers double as the classification filter for spatial queries: a ray cast
//! against `[Layer::World]` only sees arena geometry, an overlap against
//! `[Layer::Player]` only sees the target.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerOrdnance,
    EnemyProjectile,
}

/// Layers for a live enemy body.
#[inline]
pub fn active_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [Layer::World, Layer::Player, Layer::PlayerOrdnance],
    )
}

/// "Disabled" without structural changes. No membership, so no ray cast or overlap sees
/// a parked body; no filters, so it collides with nothing.
#[inline]
pub fn dormant_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(LayerMask::NONE, LayerMask::NONE)
}
