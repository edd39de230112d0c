//! Enemy variants.
//!
//! A variant is a movement policy plus a few rule switches. Each one is a plain
//! struct with its own parameters and state, driven once per fixed step through
//! `Behavior::steer` with a `MoveCtx` describing the world around it.
//!
//! | kind     | moves                          | on damage   | on bomb | on touch    |
//! |----------|--------------------------------|-------------|---------|-------------|
//! | Wanderer | random cardinal, bounces       | loses HP    | loses HP| kills       |
//! | Chaser   | pursues with avoidance         | immune      | stunned | kills       |
//! | Lunger   | teleports, winds up, dashes    | loses HP    | loses HP| kills       |
//! | Volatile | pursues with avoidance         | lights fuse | fuse    | lights fuse |
//! | Clinger  | wanders, then rides the player | loses HP    | loses HP| attaches    |

use bevy::prelude::*;
use rand::rngs::StdRng;

use crate::common::spatial::SpatialProbe;
use crate::plugins::world::WalkableGrid;

use super::components::EnemyProfile;

mod chaser;
mod clinger;
mod lunger;
mod volatile;
mod wanderer;

pub use chaser::{Chaser, Pursuit, PursuitParams};
pub use clinger::{Attachment, Clinger, ClingerParams};
pub use lunger::{LungeStage, Lunger, LungerParams};
pub use volatile::{FuseParams, Volatile};
pub use wanderer::{Wanderer, WandererParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Wanderer,
    Chaser,
    Lunger,
    Volatile,
    Clinger,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Wanderer,
        EnemyKind::Chaser,
        EnemyKind::Lunger,
        EnemyKind::Volatile,
        EnemyKind::Clinger,
    ];

    /// Default shared stats per kind.
    pub fn profile(self) -> EnemyProfile {
        let base = EnemyProfile::default();
        match self {
            EnemyKind::Wanderer => EnemyProfile {
                speed: 40.0,
                ..base
            },
            EnemyKind::Chaser => EnemyProfile {
                speed: 140.0,
                radius: 16.0,
                ..base
            },
            EnemyKind::Lunger => EnemyProfile {
                speed: 0.0,
                ..base
            },
            EnemyKind::Volatile => EnemyProfile {
                speed: 100.0,
                radius: 10.0,
                ..base
            },
            EnemyKind::Clinger => EnemyProfile {
                max_health: 20.0,
                speed: 20.0,
                radius: 8.0,
                ..base
            },
        }
    }

    pub fn color(self) -> Color {
        match self {
            EnemyKind::Wanderer => Color::srgb(0.95, 0.8, 0.85),
            EnemyKind::Chaser => Color::srgb(0.85, 0.85, 0.6),
            EnemyKind::Lunger => Color::srgb(0.6, 0.3, 0.8),
            EnemyKind::Volatile => Color::srgb(0.95, 0.55, 0.2),
            EnemyKind::Clinger => Color::srgb(0.45, 0.75, 0.4),
        }
    }
}

/// How a variant answers ordinary damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageRule {
    Normal,
    Immune,
    /// The hit lights the fuse instead of removing health.
    Detonate,
}

/// How a variant answers a player-fired explosive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlastRule {
    Damage,
    Stun,
    Detonate,
}

/// An effect an enemy had on another entity that must be undone when it dies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Release {
    pub anchor: Entity,
    pub speed_penalty: f32,
}

/// What a variant sees of the world during one step.
pub struct MoveCtx<'a, P: SpatialProbe> {
    pub entity: Entity,
    pub dt: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Where the player is, if there is one.
    pub target: Option<Vec2>,
    pub probe: &'a P,
    pub grid: &'a WalkableGrid,
    pub rng: &'a mut StdRng,
}

/// A variant's answer for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steer {
    pub velocity: Vec2,
    /// Instant relocation (teleports, clamping, riding an anchor).
    pub reposition: Option<Vec2>,
}

impl Steer {
    pub const STILL: Steer = Steer {
        velocity: Vec2::ZERO,
        reposition: None,
    };

    #[inline]
    pub fn moving(velocity: Vec2) -> Self {
        Self {
            velocity,
            reposition: None,
        }
    }

    #[inline]
    pub fn teleport(to: Vec2) -> Self {
        Self {
            velocity: Vec2::ZERO,
            reposition: Some(to),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Behavior {
    Wanderer(Wanderer),
    Chaser(Chaser),
    Lunger(Lunger),
    Volatile(Volatile),
    Clinger(Clinger),
}

impl Behavior {
    /// A variant with default parameters.
    pub fn from_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Wanderer => Behavior::Wanderer(Wanderer::new(WandererParams::default())),
            EnemyKind::Chaser => Behavior::Chaser(Chaser::new(PursuitParams::default())),
            EnemyKind::Lunger => Behavior::Lunger(Lunger::new(LungerParams::default())),
            EnemyKind::Volatile => Behavior::Volatile(Volatile::new(
                PursuitParams::default(),
                FuseParams::default(),
            )),
            EnemyKind::Clinger => Behavior::Clinger(Clinger::new(ClingerParams::default())),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self {
            Behavior::Wanderer(_) => EnemyKind::Wanderer,
            Behavior::Chaser(_) => EnemyKind::Chaser,
            Behavior::Lunger(_) => EnemyKind::Lunger,
            Behavior::Volatile(_) => EnemyKind::Volatile,
            Behavior::Clinger(_) => EnemyKind::Clinger,
        }
    }

    pub fn damage_rule(&self) -> DamageRule {
        match self {
            Behavior::Chaser(_) => DamageRule::Immune,
            Behavior::Volatile(_) => DamageRule::Detonate,
            Behavior::Wanderer(_) | Behavior::Lunger(_) | Behavior::Clinger(_) => DamageRule::Normal,
        }
    }

    pub fn blast_rule(&self) -> BlastRule {
        match self {
            Behavior::Chaser(_) => BlastRule::Stun,
            Behavior::Volatile(_) => BlastRule::Detonate,
            Behavior::Wanderer(_) | Behavior::Lunger(_) | Behavior::Clinger(_) => BlastRule::Damage,
        }
    }

    /// Fuse parameters for variants that can self-destruct.
    pub fn fuse(&self) -> Option<FuseParams> {
        match self {
            Behavior::Volatile(v) => Some(v.fuse),
            _ => None,
        }
    }

    /// True while the variant is telegraphing an attack.
    pub fn is_telegraphing(&self) -> bool {
        matches!(self, Behavior::Lunger(l) if l.is_winding_up())
    }

    pub fn steer<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Steer {
        match self {
            Behavior::Wanderer(w) => w.steer(ctx),
            Behavior::Chaser(c) => c.steer(ctx),
            Behavior::Lunger(l) => l.steer(ctx),
            Behavior::Volatile(v) => v.steer(ctx),
            Behavior::Clinger(c) => c.steer(ctx),
        }
    }

    /// Surface bounce for variants that reflect off what they touch.
    pub fn bounce(&mut self, normal: Vec2) {
        match self {
            Behavior::Wanderer(w) => w.bounce(normal),
            Behavior::Clinger(c) => c.bounce(normal),
            _ => {}
        }
    }

    /// Attach to `anchor`. Returns the speed penalty to apply, once.
    pub fn attach(&mut self, anchor: Entity, offset: Vec2) -> Option<f32> {
        match self {
            Behavior::Clinger(c) => c.attach(anchor, offset),
            _ => None,
        }
    }

    /// Hand back any effect held on another entity. Idempotent.
    pub fn release(&mut self) -> Option<Release> {
        match self {
            Behavior::Clinger(c) => c.release(),
            _ => None,
        }
    }

    /// Forget per-life state (used when a pooled enemy is reused).
    pub fn reset(&mut self) {
        match self {
            Behavior::Wanderer(w) => w.reset(),
            Behavior::Chaser(c) => c.reset(),
            Behavior::Lunger(l) => l.reset(),
            Behavior::Volatile(v) => v.reset(),
            Behavior::Clinger(c) => c.reset(),
        }
    }
}
