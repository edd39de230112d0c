//! Spatial query seam.
//!
//! Gameplay code never talks to the physics engine directly. Everything it needs to
//! know about the world goes through `SpatialProbe`:
//! - a ray cast: "what is the nearest blocking surface along this direction?"
//! - an overlap: "which classified entities touch this circle / box?"
//!
//! Two implementations:
//! - avian2d's `SpatialQuery` system param (the running game),
//! - `StaticObstacles`, a fixed list of boxes and circles (tests, offline checks).
//!
//! Both are synchronous and deterministic for fixed inputs.

use avian2d::prelude::*;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
    /// Surface normal at the hit point, pointing back toward the ray origin.
    pub normal: Vec2,
}

pub trait SpatialProbe {
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit>;

    fn circle_overlaps(&self, center: Vec2, radius: f32, filter: LayerMask) -> Vec<Entity>;

    fn box_overlaps(&self, center: Vec2, half_extents: Vec2, filter: LayerMask) -> Vec<Entity>;

    #[inline]
    fn is_clear(&self, origin: Vec2, direction: Dir2, max_distance: f32, filter: LayerMask) -> bool {
        self.ray_cast(origin, direction, max_distance, filter).is_none()
    }
}

impl SpatialProbe for SpatialQuery<'_, '_> {
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        let filter = SpatialQueryFilter::from_mask(filter);
        self.cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| RayHit {
                entity: hit.entity,
                distance: hit.distance,
                normal: hit.normal,
            })
    }

    fn circle_overlaps(&self, center: Vec2, radius: f32, filter: LayerMask) -> Vec<Entity> {
        let filter = SpatialQueryFilter::from_mask(filter);
        self.shape_intersections(&Collider::circle(radius), center, 0.0, &filter)
    }

    fn box_overlaps(&self, center: Vec2, half_extents: Vec2, filter: LayerMask) -> Vec<Entity> {
        let filter = SpatialQueryFilter::from_mask(filter);
        let shape = Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0);
        self.shape_intersections(&shape, center, 0.0, &filter)
    }
}

// -----------------------------------------------------------------------------
// Static geometry probe
// -----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
enum Shape {
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
}

#[derive(Clone, Copy, Debug)]
struct Placed {
    entity: Entity,
    layers: LayerMask,
    shape: Shape,
}

/// A fixed set of axis-aligned boxes and circles.
#[derive(Clone, Debug, Default)]
pub struct StaticObstacles {
    shapes: Vec<Placed>,
}

impl StaticObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymous world geometry.
    pub fn with_wall(self, rect: Rect) -> Self {
        self.with_rect(Entity::PLACEHOLDER, crate::common::layers::Layer::World, rect)
    }

    pub fn with_rect(mut self, entity: Entity, layers: impl Into<LayerMask>, rect: Rect) -> Self {
        self.shapes.push(Placed {
            entity,
            layers: layers.into(),
            shape: Shape::Rect(rect),
        });
        self
    }

    pub fn with_circle(
        mut self,
        entity: Entity,
        layers: impl Into<LayerMask>,
        center: Vec2,
        radius: f32,
    ) -> Self {
        self.shapes.push(Placed {
            entity,
            layers: layers.into(),
            shape: Shape::Circle { center, radius },
        });
        self
    }

    fn matching(&self, filter: LayerMask) -> impl Iterator<Item = &Placed> {
        self.shapes.iter().filter(move |p| p.layers.0 & filter.0 != 0)
    }
}

impl SpatialProbe for StaticObstacles {
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.as_vec2();
        self.matching(filter)
            .filter_map(|p| {
                let (distance, normal) = match p.shape {
                    Shape::Rect(rect) => ray_vs_rect(origin, dir, rect)?,
                    Shape::Circle { center, radius } => ray_vs_circle(origin, dir, center, radius)?,
                };
                (distance <= max_distance).then_some(RayHit {
                    entity: p.entity,
                    distance,
                    normal,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn circle_overlaps(&self, center: Vec2, radius: f32, filter: LayerMask) -> Vec<Entity> {
        self.matching(filter)
            .filter(|p| match p.shape {
                Shape::Rect(rect) => {
                    let closest = center.clamp(rect.min, rect.max);
                    closest.distance_squared(center) <= radius * radius
                }
                Shape::Circle { center: c, radius: r } => {
                    c.distance_squared(center) <= (r + radius) * (r + radius)
                }
            })
            .map(|p| p.entity)
            .collect()
    }

    fn box_overlaps(&self, center: Vec2, half_extents: Vec2, filter: LayerMask) -> Vec<Entity> {
        let query = Rect::from_center_half_size(center, half_extents);
        self.matching(filter)
            .filter(|p| match p.shape {
                Shape::Rect(rect) => !rect.intersect(query).is_empty(),
                Shape::Circle { center: c, radius } => {
                    let closest = c.clamp(query.min, query.max);
                    closest.distance_squared(c) <= radius * radius
                }
            })
            .map(|p| p.entity)
            .collect()
    }
}

/// Slab test. Returns entry distance and the face normal that was crossed.
fn ray_vs_rect(origin: Vec2, dir: Vec2, rect: Rect) -> Option<(f32, Vec2)> {
    if rect.contains(origin) {
        return Some((0.0, -dir));
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], rect.min[axis], rect.max[axis]);
        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
        let mut n = Vec2::ZERO;
        n[axis] = -d.signum();
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = n;
        }
        t_exit = t_exit.min(t1);
    }

    (t_enter <= t_exit && t_enter >= 0.0).then_some((t_enter, normal))
}

fn ray_vs_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<(f32, Vec2)> {
    let to_origin = origin - center;
    if to_origin.length_squared() <= radius * radius {
        return Some((0.0, -dir));
    }
    let b = to_origin.dot(dir);
    let c = to_origin.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t < 0.0 {
        return None;
    }
    let hit = origin + dir * t;
    Some((t, (hit - center).normalize_or_zero()))
}
