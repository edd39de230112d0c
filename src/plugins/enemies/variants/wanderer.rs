use std::time::Duration;

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::spatial::SpatialProbe;
use crate::common::steering::{clamp_inside, random_cardinal, reflect};

use super::{MoveCtx, Steer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WandererParams {
    /// Seconds between picks of a new random heading.
    pub turn_interval: f32,
    /// Extra distance past the body the look-ahead ray reaches.
    pub look_ahead: f32,
}

impl Default for WandererParams {
    fn default() -> Self {
        Self {
            turn_interval: 3.0,
            look_ahead: 4.0,
        }
    }
}

/// Drifts along a random cardinal heading and bounces off whatever it meets.
#[derive(Clone, Debug)]
pub struct Wanderer {
    params: WandererParams,
    heading: Vec2,
    turn: Timer,
}

impl Wanderer {
    pub fn new(params: WandererParams) -> Self {
        Self {
            turn: Timer::from_seconds(params.turn_interval, TimerMode::Repeating),
            params,
            heading: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: Vec2) {
        self.heading = heading.normalize_or_zero();
    }

    pub fn bounce(&mut self, normal: Vec2) {
        self.heading = reflect(self.heading, normal);
    }

    pub fn reset(&mut self) {
        self.heading = Vec2::ZERO;
        self.turn.reset();
    }

    pub fn steer<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Steer {
        self.turn.tick(Duration::from_secs_f32(ctx.dt));
        if self.heading == Vec2::ZERO || self.turn.just_finished() {
            self.heading = random_cardinal(ctx.rng);
        }

        if let Ok(dir) = Dir2::new(self.heading) {
            // Start just outside our own body so the ray never reports us.
            let origin = ctx.position + self.heading * (ctx.radius + 0.5);
            let reach = ctx.speed * ctx.dt + self.params.look_ahead;
            let solid = LayerMask::from([Layer::World, Layer::Enemy]);
            if let Some(hit) = ctx.probe.ray_cast(origin, dir, reach, solid) {
                self.bounce(hit.normal);
            }
        }

        let next = ctx.position + self.heading * ctx.speed * ctx.dt;
        let (clamped, edge) = clamp_inside(next, ctx.grid.bounds(), ctx.radius);
        if edge.x {
            self.heading.x = -self.heading.x;
        }
        if edge.y {
            self.heading.y = -self.heading.y;
        }

        Steer {
            velocity: self.heading * ctx.speed,
            reposition: edge.any().then_some(clamped),
        }
    }
}
