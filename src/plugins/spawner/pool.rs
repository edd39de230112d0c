//! Bounded enemy pool.
//!
//! Pure bookkeeping over entity ids. The pool never touches components; systems
//! wake and park bodies around the calls below.
//!
//! Invariants, for every pool at every tick boundary:
//! - `available` and `active` are disjoint and together hold every member,
//! - `active.len() <= capacity`.

use std::collections::VecDeque;

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Activated(Entity),
    /// Nothing available. Not an error: retry next tick.
    Exhausted,
    /// The dequeued entity was already live; it went back to the queue unspawned.
    Rejected(Entity),
}

#[derive(Component, Debug)]
pub struct EnemyPool {
    name: String,
    capacity: usize,
    available: VecDeque<Entity>,
    active: HashSet<Entity>,
}

impl EnemyPool {
    pub fn new(name: impl Into<String>, capacity: usize) -> Result<Self, ConfigError> {
        let name = name.into();
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity { pool: name });
        }
        Ok(Self {
            name,
            capacity,
            available: VecDeque::with_capacity(capacity),
            active: HashSet::default(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    #[inline]
    pub fn is_active(&self, entity: Entity) -> bool {
        self.active.contains(&entity)
    }

    pub fn is_available(&self, entity: Entity) -> bool {
        self.available.contains(&entity)
    }

    /// Register a freshly warmed-up, dormant member. Returns false once full.
    pub fn adopt(&mut self, entity: Entity) -> bool {
        if self.available.len() + self.active.len() >= self.capacity
            || self.is_active(entity)
            || self.is_available(entity)
        {
            return false;
        }
        self.available.push_back(entity);
        true
    }

    /// Take the next available member.
    ///
    /// `already_live` reports entities that are live in the world despite being
    /// queued here; those are put back at the end of the queue and rejected.
    pub fn try_activate(&mut self, already_live: impl Fn(Entity) -> bool) -> Activation {
        let Some(entity) = self.available.pop_front() else {
            return Activation::Exhausted;
        };

        if self.active.contains(&entity) {
            warn!("pool '{}': {entity} was queued while active; dropping the stale entry", self.name);
            return Activation::Rejected(entity);
        }
        if already_live(entity) {
            warn!("pool '{}': {entity} is already live; returned unspawned", self.name);
            self.available.push_back(entity);
            return Activation::Rejected(entity);
        }

        self.active.insert(entity);
        Activation::Activated(entity)
    }

    /// Return an active member. A second call for the same entity is a no-op.
    pub fn recycle(&mut self, entity: Entity) -> bool {
        if !self.active.remove(&entity) {
            return false;
        }
        self.available.push_back(entity);
        true
    }

    /// Every member, available first.
    pub fn members(&self) -> impl Iterator<Item = Entity> + '_ {
        self.available.iter().copied().chain(self.active.iter().copied())
    }
}
