//! Shared movement / avoidance helpers.
//!
//! Pure math over `Vec2` plus one query-backed helper (`avoid_obstacles`).
//! Chasers, the self-destructing drifter and boss rushes all steer with the same
//! "look straight, else sample a circle, else slide along the wall" rule.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;
use rand::Rng;

use super::spatial::SpatialProbe;

/// Up, down, left, right.
pub const CARDINALS: [Vec2; 4] = [Vec2::Y, Vec2::NEG_Y, Vec2::NEG_X, Vec2::X];

#[inline]
pub fn random_cardinal(rng: &mut impl Rng) -> Vec2 {
    CARDINALS[rng.gen_range(0..CARDINALS.len())]
}

/// Mirror `dir` about a surface with the given normal.
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    let n = normal.normalize_or_zero();
    (dir - 2.0 * dir.dot(n) * n).normalize_or_zero()
}

/// Unit direction from `from` to `to`, or `None` when they coincide.
#[inline]
pub fn aim(from: Vec2, to: Vec2) -> Option<Dir2> {
    Dir2::new(to - from).ok()
}

/// Add `accel * dt` along `dir` and cap the result at `max_speed`.
#[inline]
pub fn accelerate(velocity: Vec2, dir: Vec2, accel: f32, max_speed: f32, dt: f32) -> Vec2 {
    (velocity + dir * accel * dt).clamp_length_max(max_speed)
}

/// Parameters of the circle-sampling avoidance search.
#[derive(Clone, Copy, Debug)]
pub struct Avoidance {
    /// How far ahead to look for blockers.
    pub look_ahead: f32,
    /// How many directions to try around the circle, counting the blocked one.
    pub samples: u32,
    /// Angular step between samples.
    pub step_degrees: f32,
    pub obstacles: LayerMask,
}

/// Pick a direction toward `desired` that is not blocked within `look_ahead`.
///
/// 1. the straight ray, if clear;
/// 2. else the first clear sample at `k * step` degrees from it;
/// 3. else the tangent of the blocking surface.
pub fn avoid_obstacles(
    probe: &impl SpatialProbe,
    origin: Vec2,
    desired: Dir2,
    avoidance: &Avoidance,
) -> Vec2 {
    let Some(blocker) = probe.ray_cast(origin, desired, avoidance.look_ahead, avoidance.obstacles)
    else {
        return desired.as_vec2();
    };

    (1..avoidance.samples)
        .map(|k| Vec2::from_angle((k as f32 * avoidance.step_degrees).to_radians()).rotate(*desired))
        .find(|candidate| {
            Dir2::new(*candidate)
                .map(|d| probe.is_clear(origin, d, avoidance.look_ahead, avoidance.obstacles))
                .unwrap_or(false)
        })
        .unwrap_or_else(|| blocker.normal.perp().normalize_or_zero())
}

/// Clamp `pos` into `bounds` shrunk by `radius`; reports which axes were clamped.
pub fn clamp_inside(pos: Vec2, bounds: Rect, radius: f32) -> (Vec2, BVec2) {
    let min = bounds.min + Vec2::splat(radius);
    let max = (bounds.max - Vec2::splat(radius)).max(min);
    let clamped = pos.clamp(min, max);
    (clamped, BVec2::new(clamped.x != pos.x, clamped.y != pos.y))
}

/// Directions of a fan spread over `arc_degrees`, centred on `aim_dir`.
///
/// With `count == 1` the single projectile flies straight along `aim_dir`.
pub fn fan_directions(aim_dir: Dir2, count: u32, arc_degrees: f32) -> impl Iterator<Item = Vec2> {
    let base = aim_dir.as_vec2();
    let (start, step) = if count <= 1 {
        (0.0, 0.0)
    } else {
        (-arc_degrees * 0.5, arc_degrees / (count - 1) as f32)
    };
    (0..count).map(move |i| Vec2::from_angle((start + step * i as f32).to_radians()).rotate(base))
}
