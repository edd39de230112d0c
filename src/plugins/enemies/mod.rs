//! Enemies plugin: the shared enemy contract and its five variants.
//!
//! ---------------------------
//! HOW THIS IS LAID OUT (ECS)
//! ---------------------------
//! 1) FACTS live on the `Enemy` component:
//!    - health, `BehaviorState`, timed tasks (flash / stun / fuse), owner,
//!    - a `Behavior` value holding the variant's parameters and per-life state.
//!
//! 2) RULES are methods on `Enemy` and the variant structs. They never touch the
//!    world; they return what happened (`DamageOutcome`, `ContactResponse`,
//!    `Destroyed`, `Steer`). That keeps every rule testable without an `App`.
//!
//! 3) SYSTEMS (FixedUpdate, see `CombatSet`) feed rules with world data and turn
//!    their answers into world effects:
//!    - Steer:   movement policy -> velocity / reposition,
//!    - Contact: player overlap -> kill, attach, or light a fuse,
//!    - Resolve: `EnemyHit` -> damage; task ticks -> stun end, detonation,
//!    - Settle:  `EnemyDown` -> lift penalties, despawn unowned, `EnemyDestroyed`.
//!
//! 4) PRESENTATION (PostUpdate) derives the sprite tint from the facts.
//!
//! Pool bookkeeping lives with the spawner. An enemy only knows its `Owner`.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{active_enemy_layers, dormant_enemy_layers};
use crate::common::schedule::CombatSet;
use crate::common::state::GameState;

pub mod components;
pub mod messages;
pub mod systems;
pub mod variants;

pub use components::{
    BehaviorState, ContactResponse, Damage, DamageOutcome, Destroyed, Enemy, EnemyProfile,
    EnemyTask, Owner, PoolSlot,
};
pub use messages::{EnemyDestroyed, EnemyDown, EnemyHit, Hit};
pub use variants::{Behavior, EnemyKind, MoveCtx, Steer};

pub fn plugin(app: &mut App) {
    app.add_message::<EnemyHit>()
        .add_message::<EnemyDown>()
        .add_message::<EnemyDestroyed>();

    app.add_systems(
        FixedUpdate,
        (
            systems::steer_enemies.in_set(CombatSet::Steer),
            systems::resolve_player_contacts.in_set(CombatSet::Contact),
            (systems::apply_enemy_hits, systems::tick_enemy_tasks)
                .chain()
                .in_set(CombatSet::Resolve),
            systems::settle_fallen.in_set(CombatSet::Settle),
        ),
    );

    app.add_systems(
        PostUpdate,
        systems::tint_enemies.run_if(in_state(GameState::InGame)),
    );
}

/// Everything an enemy entity needs, sized for its profile.
///
/// Dormant enemies are hidden and collide with nothing until a spawner wakes them.
pub fn enemy_bundle(enemy: Enemy, at: Vec2, slot: PoolSlot) -> impl Bundle {
    let profile = *enemy.profile();
    let kind = enemy.kind();
    let (layers, visibility) = if slot.is_live() {
        (active_enemy_layers(), Visibility::Inherited)
    } else {
        (dormant_enemy_layers(), Visibility::Hidden)
    };

    (
        Name::new(format!("{kind:?}")),
        Sprite {
            color: kind.color(),
            custom_size: Some(Vec2::splat(profile.radius * 2.0)),
            ..default()
        },
        Transform::from_translation(at.extend(1.0)),
        Collider::circle(profile.radius),
        layers,
        visibility,
        slot,
        enemy,
        DespawnOnExit(GameState::InGame),
    )
}
