//! The enemy contract.
//!
//! `Enemy` is the one component every hostile carries. It owns the facts that all
//! variants share (health, behavior state, timed tasks, owner) and delegates the
//! per-variant policy (movement, damage rule, contact rule) to its `Behavior`.
//!
//! State machine:
//! ```text
//!   Active ──(health 0 / die)──────────────────────────────> Dead (terminal)
//!   Active ──stun──> Stunned ──(Stun task done)──> Active
//!            (a new stun restarts the Stun task)
//!   Active ──detonate──> Exploding ──(Fuse task done)──> area damage ──> Dead
//! ```
//!
//! Every method here is pure bookkeeping. Systems turn the returned values into
//! world effects (messages, despawns, pool recycling).

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::active_enemy_layers;
use crate::common::timers::{TaskKind, TaskTimers};

use super::variants::{Behavior, BlastRule, DamageRule, EnemyKind, Release};

pub const DEFAULT_RADIUS: f32 = 12.0;

// -----------------------------------------------------------------------------
// Value types
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BehaviorState {
    #[default]
    Active,
    Stunned,
    Exploding,
    Dead,
}

/// Incoming damage. `Lethal` is an instant kill regardless of remaining health.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Damage {
    Amount(f32),
    Lethal,
}

/// Who gets told when an enemy dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Owner {
    /// A spawner entity carrying an `EnemyPool`; the enemy is recycled.
    Pool(Entity),
    /// Nobody keeps it; the enemy is removed for good.
    #[default]
    World,
}

/// The "I died" notice an enemy hands to its owner. Produced at most once per life.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Destroyed {
    pub kind: EnemyKind,
    pub owner: Owner,
    /// Effects the enemy was holding on someone else that must be undone.
    pub released: Option<Release>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// Dead target, immune variant, or a fuse that is already lit.
    Ignored,
    Wounded { remaining: f32 },
    Stunned,
    Detonating,
    Killed(Destroyed),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContactResponse {
    None,
    KillPlayer,
    Detonating,
    Attached { penalty: f32 },
}

/// Timed tasks an enemy can be running, one slot per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyTask {
    /// Cosmetic hit flash.
    Flash,
    Stun,
    /// Self-destruct countdown. Cannot be cancelled once lit.
    Fuse,
}

impl TaskKind for EnemyTask {
    fn cancellable(self) -> bool {
        !matches!(self, EnemyTask::Fuse)
    }
}

/// Stats shared by every variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub flash_secs: f32,
    pub stun_secs: f32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 40.0,
            radius: DEFAULT_RADIUS,
            flash_secs: 0.1,
            stun_secs: 2.0,
        }
    }
}

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// Pool bookkeeping on the entity side.
///
/// Enemies that are not pooled are always `Live`.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PoolSlot {
    Dormant,
    #[default]
    Live,
}

impl PoolSlot {
    #[inline]
    pub fn is_live(self) -> bool {
        self == PoolSlot::Live
    }
}

/// A hostile entity.
///
/// Required components give every enemy a kinematic body, a collision volume, layers
/// and a placeholder sprite even when the spawner forgot one. Spawners override them
/// with sized versions; nothing downstream ever has to handle "no collider".
#[derive(Component, Clone, Debug)]
#[require(
    PoolSlot,
    Transform,
    Visibility,
    LinearVelocity,
    RigidBody = RigidBody::Kinematic,
    Collider = Collider::circle(DEFAULT_RADIUS),
    CollisionLayers = active_enemy_layers(),
    Sprite = placeholder_sprite()
)]
pub struct Enemy {
    profile: EnemyProfile,
    behavior: Behavior,
    health: f32,
    state: BehaviorState,
    owner: Owner,
    tasks: TaskTimers<EnemyTask>,
}

fn placeholder_sprite() -> Sprite {
    Sprite {
        color: Color::srgb(0.9, 0.25, 0.25),
        custom_size: Some(Vec2::splat(DEFAULT_RADIUS * 2.0)),
        ..default()
    }
}

impl Enemy {
    pub fn new(behavior: Behavior, profile: EnemyProfile) -> Self {
        Self {
            health: profile.max_health,
            profile,
            behavior,
            state: BehaviorState::Active,
            owner: Owner::World,
            tasks: TaskTimers::default(),
        }
    }

    /// An enemy with the default profile and parameters of `kind`.
    pub fn of_kind(kind: EnemyKind) -> Self {
        Self::new(Behavior::from_kind(kind), kind.profile())
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    // -- accessors ------------------------------------------------------------

    #[inline]
    pub fn kind(&self) -> EnemyKind {
        self.behavior.kind()
    }

    #[inline]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.profile.max_health
    }

    #[inline]
    pub fn profile(&self) -> &EnemyProfile {
        &self.profile
    }

    #[inline]
    pub fn owner(&self) -> Owner {
        self.owner
    }

    #[inline]
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    #[inline]
    pub fn behavior_mut(&mut self) -> &mut Behavior {
        &mut self.behavior
    }

    #[inline]
    pub fn tasks(&self) -> &TaskTimers<EnemyTask> {
        &self.tasks
    }

    /// Only `Active` enemies move or react to contact.
    #[inline]
    pub fn can_move(&self) -> bool {
        self.state == BehaviorState::Active
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == BehaviorState::Dead
    }

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.tasks.is_running(EnemyTask::Flash)
    }

    // -- lifecycle ------------------------------------------------------------

    /// Back to a fresh life: full health, `Active`, no tasks, variant state reset.
    ///
    /// The owner is kept: a pooled enemy stays wired to its pool.
    pub fn initialize(&mut self) {
        self.health = self.profile.max_health;
        self.state = BehaviorState::Active;
        self.tasks.clear();
        self.behavior.reset();
    }

    /// Transition to `Dead`. Returns the owner notice the first time only.
    pub fn die(&mut self) -> Option<Destroyed> {
        if self.is_dead() {
            return None;
        }
        self.state = BehaviorState::Dead;
        self.tasks.clear();
        Some(Destroyed {
            kind: self.kind(),
            owner: self.owner,
            released: self.behavior.release(),
        })
    }

    /// Apply a hit according to this variant's damage rule.
    ///
    /// The hit flash is started alongside the health change and never delays it:
    /// an enemy brought to 0 is `Dead` when this returns.
    pub fn take_damage(&mut self, damage: Damage) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }

        match self.behavior.damage_rule() {
            DamageRule::Immune => DamageOutcome::Ignored,
            DamageRule::Detonate => {
                if self.begin_explosion() {
                    DamageOutcome::Detonating
                } else {
                    DamageOutcome::Ignored
                }
            }
            DamageRule::Normal => {
                self.tasks.start(EnemyTask::Flash, self.profile.flash_secs);
                self.health = match damage {
                    Damage::Amount(amount) => {
                        (self.health - amount.max(0.0)).clamp(0.0, self.profile.max_health)
                    }
                    Damage::Lethal => 0.0,
                };

                if self.health > 0.0 {
                    return DamageOutcome::Wounded {
                        remaining: self.health,
                    };
                }
                self.die()
                    .map_or(DamageOutcome::Ignored, DamageOutcome::Killed)
            }
        }
    }

    /// Response to a player-fired explosive going off on top of this enemy.
    pub fn blast(&mut self, damage: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        match self.behavior.blast_rule() {
            BlastRule::Stun => {
                if self.stun(self.profile.stun_secs) {
                    DamageOutcome::Stunned
                } else {
                    DamageOutcome::Ignored
                }
            }
            BlastRule::Detonate => {
                if self.begin_explosion() {
                    DamageOutcome::Detonating
                } else {
                    DamageOutcome::Ignored
                }
            }
            BlastRule::Damage => self.take_damage(Damage::Amount(damage)),
        }
    }

    /// Suspend movement and contact response for `secs`. Restarts an ongoing stun.
    pub fn stun(&mut self, secs: f32) -> bool {
        if !matches!(self.state, BehaviorState::Active | BehaviorState::Stunned) {
            return false;
        }
        self.state = BehaviorState::Stunned;
        self.tasks.start(EnemyTask::Stun, secs);
        true
    }

    /// Light the self-destruct fuse. Only variants with a fuse can explode.
    pub fn begin_explosion(&mut self) -> bool {
        let Some(fuse) = self.behavior.fuse() else {
            return false;
        };
        if !matches!(self.state, BehaviorState::Active | BehaviorState::Stunned) {
            return false;
        }
        self.tasks.cancel(EnemyTask::Stun);
        self.state = BehaviorState::Exploding;
        self.tasks.start(EnemyTask::Fuse, fuse.delay).is_some()
    }

    /// Blast radius once the fuse burns down, for variants that have one.
    pub fn explosion_radius(&self) -> Option<f32> {
        self.behavior.fuse().map(|f| f.radius)
    }

    /// True while the pre-explosion flicker is in its "lit" half.
    pub fn flicker_lit(&self) -> bool {
        match (self.behavior.fuse(), self.tasks.remaining(EnemyTask::Fuse)) {
            (Some(fuse), Some(remaining)) => {
                let elapsed = fuse.delay - remaining;
                ((elapsed / fuse.flicker_interval) as u32) % 2 == 0
            }
            _ => false,
        }
    }

    /// Advance timed tasks. Returns true when the fuse burnt down this step.
    pub fn tick_tasks(&mut self, dt: f32) -> bool {
        let mut detonated = false;
        for done in self.tasks.tick(dt) {
            match done.kind {
                EnemyTask::Flash => {}
                EnemyTask::Stun => {
                    if self.state == BehaviorState::Stunned {
                        self.state = BehaviorState::Active;
                    }
                }
                EnemyTask::Fuse => detonated = self.state == BehaviorState::Exploding,
            }
        }
        detonated
    }

    /// The player touched this enemy.
    ///
    /// `offset` is the enemy's position relative to the player, kept by variants
    /// that attach.
    pub fn contact_player(&mut self, player: Entity, offset: Vec2) -> ContactResponse {
        if !self.can_move() {
            return ContactResponse::None;
        }
        match self.kind() {
            EnemyKind::Volatile => {
                if self.begin_explosion() {
                    ContactResponse::Detonating
                } else {
                    ContactResponse::None
                }
            }
            EnemyKind::Clinger => match self.behavior.attach(player, offset) {
                Some(penalty) => ContactResponse::Attached { penalty },
                None => ContactResponse::None,
            },
            EnemyKind::Wanderer | EnemyKind::Chaser | EnemyKind::Lunger => {
                ContactResponse::KillPlayer
            }
        }
    }
}
