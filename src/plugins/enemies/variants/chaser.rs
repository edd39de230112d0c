use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::common::steering::{accelerate, aim, avoid_obstacles, Avoidance};

use super::{MoveCtx, Steer};

#[derive(Clone, Copy, Debug)]
pub struct PursuitParams {
    /// Beyond this distance the pursuer loses interest and coasts to a stop.
    pub chase_radius: f32,
    pub acceleration: f32,
    /// Fraction of velocity shed per second while idle.
    pub idle_damping: f32,
    pub avoidance: Avoidance,
}

impl Default for PursuitParams {
    fn default() -> Self {
        Self {
            chase_radius: 320.0,
            acceleration: 400.0,
            idle_damping: 2.0,
            avoidance: Avoidance {
                look_ahead: 30.0,
                samples: 8,
                step_degrees: 45.0,
                obstacles: LayerMask::from([Layer::World]),
            },
        }
    }
}

/// Accelerate toward the target around obstacles, capped at the body's speed.
#[derive(Clone, Debug)]
pub struct Pursuit {
    pub params: PursuitParams,
    heading: Vec2,
}

impl Pursuit {
    pub fn new(params: PursuitParams) -> Self {
        Self {
            params,
            heading: Vec2::ZERO,
        }
    }

    /// Direction chosen on the last step that had a target in range.
    #[inline]
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn reset(&mut self) {
        self.heading = Vec2::ZERO;
    }

    pub fn steer<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Steer {
        let in_range = ctx
            .target
            .filter(|t| t.distance(ctx.position) <= self.params.chase_radius);

        let Some(dir) = in_range.and_then(|t| aim(ctx.position, t)) else {
            let keep = (1.0 - self.params.idle_damping * ctx.dt).max(0.0);
            return Steer::moving(ctx.velocity * keep);
        };

        self.heading = avoid_obstacles(ctx.probe, ctx.position, dir, &self.params.avoidance);
        Steer::moving(accelerate(
            ctx.velocity,
            self.heading,
            self.params.acceleration,
            ctx.speed,
            ctx.dt,
        ))
    }
}

/// Pursuer that shrugs off ordinary damage; a bomb stuns it instead.
#[derive(Clone, Debug)]
pub struct Chaser {
    pub pursuit: Pursuit,
}

impl Chaser {
    pub fn new(params: PursuitParams) -> Self {
        Self {
            pursuit: Pursuit::new(params),
        }
    }

    pub fn reset(&mut self) {
        self.pursuit.reset();
    }

    #[inline]
    pub fn steer<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Steer {
        self.pursuit.steer(ctx)
    }
}
