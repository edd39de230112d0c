use crate::common::spatial::SpatialProbe;

use super::chaser::{Pursuit, PursuitParams};
use super::{MoveCtx, Steer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuseParams {
    /// Seconds between lighting the fuse and the blast.
    pub delay: f32,
    pub radius: f32,
    /// Period of the on/off warning flicker.
    pub flicker_interval: f32,
}

impl Default for FuseParams {
    fn default() -> Self {
        Self {
            delay: 2.0,
            radius: 40.0,
            flicker_interval: 0.2,
        }
    }
}

/// Pursuer that blows itself up: any hit or touch lights a fuse, and the blast
/// kills the player if they are still inside the radius when it goes off.
#[derive(Clone, Debug)]
pub struct Volatile {
    pub pursuit: Pursuit,
    pub fuse: FuseParams,
}

impl Volatile {
    pub fn new(pursuit: PursuitParams, fuse: FuseParams) -> Self {
        Self {
            pursuit: Pursuit::new(pursuit),
            fuse,
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
