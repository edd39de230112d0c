//! Projectiles plugin: **message-based producer → consumer** spawning over a fixed pool.
//!
//! # Invariants first
//! Pooled projectiles are spawned once, on entering the game, and never despawned while
//! it runs. Activation and recycling are value toggles only (state, visibility,
//! velocity, collision filters), so no system ever has to handle "entity is gone".
//!
//! # Data flow
//! ```text
//!   Update (windowed app only)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) update_aim_from_cursor   cursor -> Aim { world_cursor }               │
//!│  (B) request_player_ordnance  mouse + Aim -> SpawnProjectile               │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedUpdate (CombatSet)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  Steer:   boss phases write SpawnProjectile; expire_projectiles ages shots │
//!│  Contact: resolve_projectile_hits                                          │
//!│           overlaps -> strike() -> PlayerDied / EnemyHit                    │
//!│           spent projectile -> PendingReturn                                │
//!│  Settle:  return_to_pool_commit   PendingReturn -> Inactive, push free     │
//!│           allocate_projectiles    pop free -> Active                       │
//!└────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never borrow `ResMut<ProjectilePool>`. The allocator is its single writer
//! on the way out, the commit system on the way back.
//!
//! Branches that stay:
//! - the cursor can be outside the window (`Aim` is `None`),
//! - the pool can be empty (the request is dropped).

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod flight;
pub mod messages;
pub mod pool;
pub mod request;

use bevy::prelude::*;

use crate::common::schedule::CombatSet;
use crate::common::state::GameState;

pub use messages::{ProjectileKind, SpawnProjectile};

pub const POOL_CAPACITY: usize = 512;

pub fn plugin(app: &mut App) {
    app.insert_resource(pool::ProjectilePool::new(POOL_CAPACITY))
        .add_message::<SpawnProjectile>()
        .add_systems(OnEnter(GameState::InGame), pool::init_projectile_pool)
        .add_systems(
            FixedUpdate,
            (
                flight::expire_projectiles.in_set(CombatSet::Steer),
                collision::resolve_projectile_hits.in_set(CombatSet::Contact),
                (commit::return_to_pool_commit, allocator::allocate_projectiles)
                    .chain()
                    .in_set(CombatSet::Settle),
            ),
        );
}

/// Mouse-driven player ordnance. Needs a window and the main camera.
pub fn input_plugin(app: &mut App) {
    app.init_resource::<components::Aim>().add_systems(
        Update,
        (request::update_aim_from_cursor, request::request_player_ordnance)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}
