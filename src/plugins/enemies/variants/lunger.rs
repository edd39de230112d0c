use avian2d::prelude::LayerMask;
use bevy::prelude::*;
use rand::Rng;

use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::common::steering::aim;

use super::{MoveCtx, Steer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LungerParams {
    pub teleport_interval: f32,
    /// Added to the interval after every teleport.
    pub teleport_cooldown: f32,
    pub detection_range: f32,
    /// Inside this distance the lunger skips the dash and lands on the target.
    pub latch_radius: f32,
    pub wind_up: f32,
    pub lunge_speed: f32,
    pub lunge_distance: f32,
    pub recover: f32,
    /// Half extents of the box that must be empty for a cell to be a teleport site.
    pub site_clearance: Vec2,
    /// Fraction of velocity shed per second while roaming (after being launched).
    pub drift_damping: f32,
}

impl Default for LungerParams {
    fn default() -> Self {
        Self {
            teleport_interval: 5.0,
            teleport_cooldown: 1.0,
            detection_range: 160.0,
            latch_radius: 40.0,
            wind_up: 1.0,
            lunge_speed: 400.0,
            lunge_distance: 100.0,
            recover: 3.0,
            site_clearance: Vec2::splat(16.0),
            drift_damping: 4.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LungeStage {
    Roaming,
    WindUp { remaining: f32 },
    Dashing { dir: Vec2, travelled: f32 },
    Recovering { remaining: f32 },
}

/// Blinks between open cells, and when the player comes close winds up and
/// dashes at them.
#[derive(Clone, Debug)]
pub struct Lunger {
    params: LungerParams,
    stage: LungeStage,
    teleport_in: f32,
    /// Walkable, unoccupied cell centres. Computed on first use.
    sites: Option<Vec<Vec2>>,
}

impl Lunger {
    pub fn new(params: LungerParams) -> Self {
        Self {
            teleport_in: params.teleport_interval,
            params,
            stage: LungeStage::Roaming,
            sites: None,
        }
    }

    #[inline]
    pub fn stage(&self) -> LungeStage {
        self.stage
    }

    #[inline]
    pub fn is_winding_up(&self) -> bool {
        matches!(self.stage, LungeStage::WindUp { .. })
    }

    /// Teleport sites found so far, if they have been computed.
    pub fn sites(&self) -> Option<&[Vec2]> {
        self.sites.as_deref()
    }

    pub fn reset(&mut self) {
        self.stage = LungeStage::Roaming;
        self.teleport_in = self.params.teleport_interval;
    }

    pub fn steer<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Steer {
        let p = self.params;
        match self.stage {
            LungeStage::Roaming => {
                if let Some(steer) = self.latch(ctx) {
                    return steer;
                }
                if ctx
                    .target
                    .is_some_and(|t| t.distance(ctx.position) <= p.detection_range)
                {
                    self.stage = LungeStage::WindUp {
                        remaining: p.wind_up,
                    };
                    return Steer::STILL;
                }
                if let Some(steer) = self.blink(ctx) {
                    return steer;
                }
                let keep = (1.0 - p.drift_damping * ctx.dt).max(0.0);
                Steer::moving(ctx.velocity * keep)
            }
            LungeStage::WindUp { remaining } => {
                let remaining = remaining - ctx.dt;
                if remaining > 0.0 {
                    self.stage = LungeStage::WindUp { remaining };
                    return Steer::STILL;
                }
                self.stage = match ctx.target.and_then(|t| aim(ctx.position, t)) {
                    Some(dir) => LungeStage::Dashing {
                        dir: dir.as_vec2(),
                        travelled: 0.0,
                    },
                    None => LungeStage::Roaming,
                };
                Steer::STILL
            }
            LungeStage::Dashing { dir, travelled } => {
                let step = p.lunge_speed * ctx.dt;
                if !ctx.grid.is_walkable(ctx.position + dir * step) {
                    self.stage = LungeStage::Recovering {
                        remaining: p.recover,
                    };
                    return Steer::STILL;
                }
                let travelled = travelled + step;
                self.stage = if travelled >= p.lunge_distance {
                    LungeStage::Recovering {
                        remaining: p.recover,
                    }
                } else {
                    LungeStage::Dashing { dir, travelled }
                };
                Steer::moving(dir * p.lunge_speed)
            }
            // The dash is over; only a new wind-up waits for the cooldown.
            LungeStage::Recovering { remaining } => {
                let remaining = remaining - ctx.dt;
                self.stage = if remaining > 0.0 {
                    LungeStage::Recovering { remaining }
                } else {
                    LungeStage::Roaming
                };
                self.latch(ctx)
                    .or_else(|| self.blink(ctx))
                    .unwrap_or(Steer::STILL)
            }
        }
    }

    /// Snap onto a target inside `latch_radius`.
    fn latch<P: SpatialProbe>(&self, ctx: &MoveCtx<'_, P>) -> Option<Steer> {
        let target = ctx.target?;
        (target.distance(ctx.position) <= self.params.latch_radius).then(|| Steer::teleport(target))
    }

    /// Advance the teleport countdown; on expiry jump to a random open site.
    fn blink<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Option<Steer> {
        self.teleport_in -= ctx.dt;
        if self.teleport_in > 0.0 {
            return None;
        }
        self.teleport_in = self.params.teleport_interval + self.params.teleport_cooldown;
        self.pick_site(ctx).map(Steer::teleport)
    }

    fn pick_site<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Option<Vec2> {
        let clearance = self.params.site_clearance;
        let me = ctx.entity;
        let sites = self.sites.get_or_insert_with(|| {
            let blocking = LayerMask::from([Layer::World, Layer::Enemy]);
            let found: Vec<Vec2> = ctx
                .grid
                .open_cells()
                .filter(|&cell| {
                    ctx.probe
                        .box_overlaps(cell, clearance, blocking)
                        .iter()
                        .all(|&e| e == me)
                })
                .collect();
            if found.is_empty() {
                warn!("lunger {me} found no open teleport sites");
            }
            found
        });

        if sites.is_empty() {
            return None;
        }
        Some(sites[ctx.rng.gen_range(0..sites.len())])
    }
}
