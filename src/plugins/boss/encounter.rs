//! Boss encounter rules.
//!
//! An `Encounter` is the whole boss brain as plain data. Three clocks run side by
//! side on every tick and never wait on each other:
//!
//! ```text
//!   phases: [BulletWave] -pause- [MinionSwarm] -pause- [Assault] -pause- (again)
//!   rush:   Idle --interval--> Rushing --duration | stop distance--> Cooling --> Idle
//!   shield: Up --depleted--> Down --regen--> Up
//! ```
//!
//! `tick` never touches the world. It returns `Order`s (projectiles to fire,
//! minions to summon) and the velocity for this step; systems apply them.
//!
//! The boss and the mini boss are two configurations of the same machine.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use crate::common::error::{positive, positive_secs, ConfigError};
use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::common::steering::{aim, avoid_obstacles, fan_directions, Avoidance};
use crate::common::timers::{TaskKind, TaskTimers};
use crate::plugins::enemies::EnemyKind;
use crate::plugins::projectiles::ProjectileKind;

// -----------------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    BulletWave,
    MinionSwarm,
    Assault,
}

/// Projectiles spread evenly over `arc_degrees`, centred on the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimedFan {
    pub count: u32,
    pub arc_degrees: f32,
    pub speed: f32,
}

impl AimedFan {
    /// Fan directions from `from` toward `to`. Empty when the two coincide.
    pub fn directions(&self, from: Vec2, to: Vec2) -> Vec<Vec2> {
        aim(from, to)
            .map(|dir| fan_directions(dir, self.count, self.arc_degrees).collect())
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinionLaunch {
    /// Minions appear this far from the boss centre.
    pub spawn_distance: f32,
    pub speed: f32,
    /// Launch speed is scaled by a random factor in `[low, high]`.
    pub spread: (f32, f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Attack {
    Fan(AimedFan),
    Minions(MinionLaunch),
    AimedShot { speed: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Repeat {
    /// Act every interval until this many seconds have passed.
    For(f32),
    /// Act this many times, one interval apart.
    Times(u32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseConfig {
    pub phase: Phase,
    pub attack: Attack,
    pub interval: f32,
    pub repeat: Repeat,
}

impl PhaseConfig {
    /// Seconds from the first action until the phase is over.
    pub fn length(&self) -> f32 {
        match self.repeat {
            Repeat::For(secs) => secs,
            Repeat::Times(n) => n as f32 * self.interval,
        }
    }

    fn validate(&self, owner: &str) -> Result<(), ConfigError> {
        positive_secs("phase interval", self.interval)?;
        match self.repeat {
            Repeat::For(secs) => positive_secs("phase duration", secs)?,
            Repeat::Times(0) => {
                return Err(ConfigError::NonPositive {
                    name: "phase repeat count",
                    value: 0.0,
                });
            }
            Repeat::Times(_) => {}
        }
        match self.attack {
            Attack::Fan(fan) => {
                if fan.count == 0 {
                    return Err(ConfigError::EmptyFan(owner.to_owned()));
                }
                positive("fan speed", fan.speed)?;
            }
            Attack::Minions(launch) => {
                positive("minion launch speed", launch.speed)?;
                let (low, high) = launch.spread;
                positive("minion launch spread", low)?;
                if high < low {
                    return Err(ConfigError::NonPositive {
                        name: "minion launch spread width",
                        value: high - low,
                    });
                }
            }
            Attack::AimedShot { speed } => positive("shot speed", speed)?,
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShieldConfig {
    pub capacity: f32,
    pub regen_secs: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RushGoal {
    /// Steer at the target's position every step.
    Follow,
    /// Steer at where the target stood when the rush began.
    Captured,
}

#[derive(Clone, Copy, Debug)]
pub struct RushConfig {
    /// Delay before the first rush.
    pub first_after: f32,
    /// Seconds between rush starts.
    pub interval: f32,
    /// A rush never lasts longer than this.
    pub duration: f32,
    pub speed: f32,
    pub cooldown: f32,
    /// End the rush early once this close to the goal.
    pub stop_distance: Option<f32>,
    pub goal: RushGoal,
    pub avoidance: Avoidance,
}

/// Damage flicker: `count` on/off cycles spread over `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlickerConfig {
    pub count: u32,
    pub duration: f32,
}

#[derive(Clone, Debug)]
pub struct EncounterConfig {
    pub name: String,
    pub max_health: f32,
    pub radius: f32,
    /// Projectiles leave this far from the boss centre.
    pub muzzle_offset: f32,
    pub shield: Option<ShieldConfig>,
    pub phases: Vec<PhaseConfig>,
    pub phase_pause: f32,
    pub rush: Option<RushConfig>,
    pub flicker: FlickerConfig,
    pub minion_kind: EnemyKind,
    pub minion_capacity: usize,
}

impl EncounterConfig {
    /// The shielded three-phase boss.
    pub fn boss() -> Self {
        Self {
            name: "Boss".into(),
            max_health: 1500.0,
            radius: 48.0,
            muzzle_offset: 30.0,
            shield: Some(ShieldConfig {
                capacity: 500.0,
                regen_secs: 20.0,
            }),
            phases: vec![
                PhaseConfig {
                    phase: Phase::BulletWave,
                    attack: Attack::Fan(AimedFan {
                        count: 15,
                        arc_degrees: 180.0,
                        speed: 100.0,
                    }),
                    interval: 0.5,
                    repeat: Repeat::For(15.0),
                },
                PhaseConfig {
                    phase: Phase::MinionSwarm,
                    attack: Attack::Minions(MinionLaunch {
                        spawn_distance: 30.0,
                        speed: 100.0,
                        spread: (0.8, 1.2),
                    }),
                    interval: 0.5,
                    repeat: Repeat::Times(5),
                },
                PhaseConfig {
                    phase: Phase::Assault,
                    attack: Attack::AimedShot { speed: 200.0 },
                    interval: 1.0,
                    repeat: Repeat::Times(5),
                },
            ],
            phase_pause: 20.0,
            rush: Some(RushConfig {
                first_after: 30.0,
                interval: 30.0,
                duration: 2.0,
                speed: 300.0,
                cooldown: 2.0,
                stop_distance: None,
                goal: RushGoal::Follow,
                avoidance: Avoidance {
                    look_ahead: 20.0,
                    samples: 8,
                    step_degrees: 45.0,
                    obstacles: LayerMask::from([Layer::World]),
                },
            }),
            flicker: FlickerConfig {
                count: 3,
                duration: 0.2,
            },
            minion_kind: EnemyKind::Lunger,
            minion_capacity: 10,
        }
    }

    /// Unshielded, one fan per cycle, rushes often.
    pub fn mini_boss() -> Self {
        Self {
            name: "MiniBoss".into(),
            max_health: 5000.0,
            radius: 40.0,
            muzzle_offset: 30.0,
            shield: None,
            phases: vec![PhaseConfig {
                phase: Phase::BulletWave,
                attack: Attack::Fan(AimedFan {
                    count: 10,
                    arc_degrees: 180.0,
                    speed: 80.0,
                }),
                interval: 5.0,
                repeat: Repeat::Times(1),
            }],
            phase_pause: 0.0,
            rush: Some(RushConfig {
                first_after: 0.0,
                interval: 5.0,
                duration: 3.0,
                speed: 200.0,
                cooldown: 1.0,
                stop_distance: Some(40.0),
                goal: RushGoal::Captured,
                avoidance: Avoidance {
                    look_ahead: 40.0,
                    samples: 8,
                    step_degrees: 45.0,
                    obstacles: LayerMask::from([Layer::World]),
                },
            }),
            flicker: FlickerConfig {
                count: 3,
                duration: 0.2,
            },
            minion_kind: EnemyKind::Lunger,
            minion_capacity: 0,
        }
    }

    /// True if any phase summons minions (and so needs a minion pool).
    pub fn summons(&self) -> bool {
        self.phases
            .iter()
            .any(|p| matches!(p.attack, Attack::Minions(_)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("boss health", self.max_health)?;
        positive("boss radius", self.radius)?;
        if self.phases.is_empty() {
            return Err(ConfigError::NoPhases(self.name.clone()));
        }
        for phase in &self.phases {
            phase.validate(&self.name)?;
        }
        if self.phase_pause != 0.0 {
            positive_secs("phase pause", self.phase_pause)?;
        }
        if let Some(shield) = self.shield {
            positive("shield capacity", shield.capacity)?;
            positive_secs("shield regen", shield.regen_secs)?;
        }
        if let Some(rush) = self.rush {
            positive_secs("rush interval", rush.interval)?;
            positive_secs("rush duration", rush.duration)?;
            positive("rush speed", rush.speed)?;
        }
        if self.summons() && self.minion_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                pool: format!("{} minions", self.name),
            });
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Runtime values
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossTask {
    Flicker,
    ShieldRegen,
}

impl TaskKind for BossTask {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shield {
    capacity: f32,
    value: f32,
    up: bool,
}

impl Shield {
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.up
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BossDamage {
    Ignored,
    Absorbed { shield_left: f32 },
    /// The shield took the hit and broke; whatever was left of the hit is gone.
    ShieldBroken,
    Wounded { remaining: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RushState {
    Idle,
    Rushing { elapsed: f32, goal: Vec2 },
    Cooling { remaining: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Running {
        index: usize,
        elapsed: f32,
        fired: u32,
    },
    Pausing {
        next: usize,
        remaining: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Order {
    Fire {
        kind: ProjectileKind,
        from: Vec2,
        velocity: Vec2,
    },
    Summon {
        at: Vec2,
        launch: Vec2,
    },
}

/// What the boss wants done this step.
#[derive(Debug, Default)]
pub struct TickReport {
    pub orders: Vec<Order>,
    pub velocity: Vec2,
}

/// The single death notice of an encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct Defeat {
    pub name: String,
}

/// Per-step inputs.
pub struct EncounterCtx<'a, P: SpatialProbe> {
    pub dt: f32,
    pub position: Vec2,
    /// `None` once the target is gone; the encounter idles.
    pub target: Option<Vec2>,
    pub probe: &'a P,
    pub rng: &'a mut StdRng,
}

// -----------------------------------------------------------------------------
// Encounter
// -----------------------------------------------------------------------------

#[derive(Component, Debug)]
#[require(Transform, Visibility, RigidBody = RigidBody::Kinematic, LinearVelocity)]
pub struct Encounter {
    config: EncounterConfig,
    health: f32,
    shield: Option<Shield>,
    stage: Stage,
    rush: RushState,
    next_rush_in: f32,
    tasks: TaskTimers<BossTask>,
    defeated: bool,
}

impl Encounter {
    pub fn new(config: EncounterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            health: config.max_health,
            shield: config.shield.map(|s| Shield {
                capacity: s.capacity,
                value: s.capacity,
                up: true,
            }),
            stage: Stage::Running {
                index: 0,
                elapsed: 0.0,
                fired: 0,
            },
            rush: RushState::Idle,
            next_rush_in: config.rush.map(|r| r.first_after).unwrap_or_default(),
            tasks: TaskTimers::default(),
            defeated: false,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn shield(&self) -> Option<&Shield> {
        self.shield.as_ref()
    }

    pub fn shield_up(&self) -> bool {
        self.shield.is_some_and(|s| s.up)
    }

    /// The running phase; `None` during the pause between phases.
    pub fn phase(&self) -> Option<Phase> {
        match self.stage {
            Stage::Running { index, .. } => Some(self.config.phases[index].phase),
            Stage::Pausing { .. } => None,
        }
    }

    #[inline]
    pub fn rush_state(&self) -> RushState {
        self.rush
    }

    #[inline]
    pub fn is_rushing(&self) -> bool {
        matches!(self.rush, RushState::Rushing { .. })
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn flicker_lit(&self) -> bool {
        let Some(remaining) = self.tasks.remaining(BossTask::Flicker) else {
            return false;
        };
        let flicker = self.config.flicker;
        let half = flicker.duration / (flicker.count.max(1) as f32 * 2.0);
        let elapsed = flicker.duration - remaining;
        ((elapsed / half) as u32) % 2 == 0
    }

    /// Shield first, then health.
    pub fn take_damage(&mut self, amount: f32) -> BossDamage {
        if self.defeated || self.health <= 0.0 || amount.is_nan() || amount <= 0.0 {
            return BossDamage::Ignored;
        }
        self.tasks.start(BossTask::Flicker, self.config.flicker.duration);

        if let Some(shield) = self.shield.as_mut().filter(|s| s.up) {
            shield.value -= amount;
            if shield.value > 0.0 {
                return BossDamage::Absorbed {
                    shield_left: shield.value,
                };
            }
            shield.value = 0.0;
            shield.up = false;
            let regen = self.config.shield.map(|s| s.regen_secs).unwrap_or_default();
            self.tasks.start(BossTask::ShieldRegen, regen);
            return BossDamage::ShieldBroken;
        }

        self.health = (self.health - amount).max(0.0);
        BossDamage::Wounded {
            remaining: self.health,
        }
    }

    /// Level-triggered death check. Returns the notice exactly once.
    pub fn check_defeat(&mut self) -> Option<Defeat> {
        if self.defeated || self.health > 0.0 {
            return None;
        }
        self.defeated = true;
        self.rush = RushState::Idle;
        self.tasks.clear();
        Some(Defeat {
            name: self.config.name.clone(),
        })
    }

    /// Advance flicker and shield regeneration. Returns true when the shield came back.
    pub fn tick_tasks(&mut self, dt: f32) -> bool {
        let mut restored = false;
        for done in self.tasks.tick(dt) {
            if done.kind != BossTask::ShieldRegen {
                continue;
            }
            if let Some(shield) = self.shield.as_mut() {
                shield.value = shield.capacity;
                shield.up = true;
                restored = true;
            }
        }
        restored
    }

    /// One fixed step of phases and rush.
    pub fn tick<P: SpatialProbe>(&mut self, ctx: &mut EncounterCtx<'_, P>) -> TickReport {
        let mut report = TickReport::default();
        if self.defeated || self.health <= 0.0 {
            return report;
        }
        if self.tick_tasks(ctx.dt) {
            info!("'{}' shield restored", self.config.name);
        }

        let Some(target) = ctx.target else {
            return report;
        };
        self.advance_phases(ctx, target, &mut report.orders);
        report.velocity = self.advance_rush(ctx, target);
        report
    }

    fn advance_phases<P: SpatialProbe>(
        &mut self,
        ctx: &mut EncounterCtx<'_, P>,
        target: Vec2,
        orders: &mut Vec<Order>,
    ) {
        match &mut self.stage {
            Stage::Pausing { next, remaining } => {
                *remaining -= ctx.dt;
                if *remaining > 0.0 {
                    return;
                }
                let next = *next;
                self.begin_phase(next);
            }
            Stage::Running { elapsed, .. } => *elapsed += ctx.dt,
        }
        self.fire_due(ctx, target, orders);

        let Stage::Running { index, elapsed, .. } = self.stage else {
            return;
        };
        if elapsed < self.config.phases[index].length() {
            return;
        }
        let next = (index + 1) % self.config.phases.len();
        if self.config.phase_pause > 0.0 {
            self.stage = Stage::Pausing {
                next,
                remaining: self.config.phase_pause,
            };
        } else {
            self.begin_phase(next);
            self.fire_due(ctx, target, orders);
        }
    }

    fn begin_phase(&mut self, index: usize) {
        info!("'{}' enters {:?}", self.config.name, self.config.phases[index].phase);
        self.stage = Stage::Running {
            index,
            elapsed: 0.0,
            fired: 0,
        };
    }

    /// Perform every action whose time has come in the running phase.
    fn fire_due<P: SpatialProbe>(
        &mut self,
        ctx: &mut EncounterCtx<'_, P>,
        target: Vec2,
        orders: &mut Vec<Order>,
    ) {
        let Stage::Running {
            index,
            elapsed,
            mut fired,
        } = self.stage
        else {
            return;
        };
        let phase = self.config.phases[index];
        let length = phase.length();

        loop {
            let at = fired as f32 * phase.interval;
            if at > elapsed || at >= length {
                break;
            }
            self.perform(phase.attack, ctx, target, orders);
            fired += 1;
        }
        self.stage = Stage::Running {
            index,
            elapsed,
            fired,
        };
    }

    fn perform<P: SpatialProbe>(
        &self,
        attack: Attack,
        ctx: &mut EncounterCtx<'_, P>,
        target: Vec2,
        orders: &mut Vec<Order>,
    ) {
        let muzzle = self.config.muzzle_offset;
        let origin = ctx.position;
        match attack {
            Attack::Fan(fan) => {
                orders.extend(fan.directions(origin, target).into_iter().map(|dir| {
                    Order::Fire {
                        kind: ProjectileKind::EnemyBullet,
                        from: origin + dir * muzzle,
                        velocity: dir * fan.speed,
                    }
                }));
            }
            Attack::AimedShot { speed } => {
                if let Some(dir) = aim(origin, target) {
                    orders.push(Order::Fire {
                        kind: ProjectileKind::EnemyLaser,
                        from: origin + *dir * muzzle,
                        velocity: *dir * speed,
                    });
                }
            }
            Attack::Minions(launch) => {
                let dir = Vec2::from_angle(ctx.rng.gen_range(0.0..std::f32::consts::TAU));
                let (low, high) = launch.spread;
                let speed = launch.speed * ctx.rng.gen_range(low..=high);
                orders.push(Order::Summon {
                    at: origin + dir * launch.spawn_distance,
                    launch: dir * speed,
                });
            }
        }
    }

    fn advance_rush<P: SpatialProbe>(&mut self, ctx: &EncounterCtx<'_, P>, target: Vec2) -> Vec2 {
        let Some(rush) = self.config.rush else {
            return Vec2::ZERO;
        };
        let dt = ctx.dt;
        self.next_rush_in -= dt;

        self.rush = match self.rush {
            RushState::Idle if self.next_rush_in <= 0.0 => {
                self.next_rush_in = rush.interval;
                debug!("'{}' rushes", self.config.name);
                RushState::Rushing {
                    elapsed: 0.0,
                    goal: target,
                }
            }
            RushState::Cooling { remaining } if remaining - dt <= 0.0 => RushState::Idle,
            RushState::Cooling { remaining } => RushState::Cooling {
                remaining: remaining - dt,
            },
            other => other,
        };

        let RushState::Rushing { elapsed, goal } = self.rush else {
            return Vec2::ZERO;
        };
        let goal = match rush.goal {
            RushGoal::Follow => target,
            RushGoal::Captured => goal,
        };
        let elapsed = elapsed + dt;
        let arrived = rush
            .stop_distance
            .is_some_and(|stop| ctx.position.distance(goal) <= stop);
        if elapsed > rush.duration || arrived {
            self.rush = RushState::Cooling {
                remaining: rush.cooldown,
            };
            return Vec2::ZERO;
        }
        self.rush = RushState::Rushing { elapsed, goal };

        let Some(dir) = aim(ctx.position, goal) else {
            return Vec2::ZERO;
        };
        avoid_obstacles(ctx.probe, ctx.position, dir, &rush.avoidance) * rush.speed
    }
}
