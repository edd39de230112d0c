use bevy::prelude::*;

use crate::common::spatial::SpatialProbe;

use super::wanderer::{Wanderer, WandererParams};
use super::{MoveCtx, Release, Steer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClingerParams {
    pub wander: WandererParams,
    /// Movement speed taken from the player while attached.
    pub speed_penalty: f32,
}

impl Default for ClingerParams {
    fn default() -> Self {
        Self {
            wander: WandererParams {
                turn_interval: 5.0,
                ..default()
            },
            speed_penalty: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    pub anchor: Entity,
    /// Our position relative to the anchor at the moment we latched on.
    pub offset: Vec2,
}

/// Wanders until it touches the player, then rides along and slows them down.
#[derive(Clone, Debug)]
pub struct Clinger {
    wander: Wanderer,
    speed_penalty: f32,
    attachment: Option<Attachment>,
}

impl Clinger {
    pub fn new(params: ClingerParams) -> Self {
        Self {
            wander: Wanderer::new(params.wander),
            speed_penalty: params.speed_penalty,
            attachment: None,
        }
    }

    #[inline]
    pub fn attachment(&self) -> Option<Attachment> {
        self.attachment
    }

    pub fn bounce(&mut self, normal: Vec2) {
        if self.attachment.is_none() {
            self.wander.bounce(normal);
        }
    }

    /// Latch on. Only the first attachment of a life applies the penalty.
    pub fn attach(&mut self, anchor: Entity, offset: Vec2) -> Option<f32> {
        if self.attachment.is_some() {
            return None;
        }
        self.attachment = Some(Attachment { anchor, offset });
        Some(self.speed_penalty)
    }

    pub fn release(&mut self) -> Option<Release> {
        self.attachment.take().map(|a| Release {
            anchor: a.anchor,
            speed_penalty: self.speed_penalty,
        })
    }

    pub fn reset(&mut self) {
        self.attachment = None;
        self.wander.reset();
    }

    pub fn steer<P: SpatialProbe>(&mut self, ctx: &mut MoveCtx<'_, P>) -> Steer {
        match self.attachment {
            // The player is the only anchor we ever latch onto.
            Some(a) => match ctx.target {
                Some(anchor_pos) => Steer::teleport(anchor_pos + a.offset),
                None => Steer::STILL,
            },
            None => self.wander.steer(ctx),
        }
    }
}
