//! Spawner configuration.
//!
//! Fixed scalar parameters, validated once when the spawner is created. Anything
//! invalid here is a startup failure.

use bevy::prelude::*;

use crate::common::error::{positive, positive_secs, ConfigError};
use crate::plugins::enemies::EnemyKind;

/// A recurring window during which spawn throughput is multiplied.
///
/// ```text
///   |--- interval ---|== duration ==|--- interval ---|== duration ==| ...
///        normal          boosted         normal          boosted
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoostWindow {
    pub interval: f32,
    pub duration: f32,
    pub multiplier: u32,
}

impl Default for BoostWindow {
    fn default() -> Self {
        Self {
            interval: 10.0,
            duration: 30.0,
            multiplier: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnerConfig {
    pub name: String,
    pub kind: EnemyKind,
    pub capacity: usize,
    pub spawn_point: Vec2,
    /// Seconds between spawn ticks.
    pub interval: f32,
    /// Enemies activated per spawn tick outside the boost window.
    pub base_rate: u32,
    pub boost: Option<BoostWindow>,
    /// No spawning while the player is within this distance of the spawn point.
    pub min_player_distance: f32,
    /// Activated enemies are scattered up to this far around the spawn point.
    pub scatter: f32,
    /// `false` for pools that only serve explicit requests (boss minions).
    pub timed: bool,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            name: "spawner".into(),
            kind: EnemyKind::Wanderer,
            capacity: 20,
            spawn_point: Vec2::ZERO,
            interval: 1.0,
            base_rate: 5,
            boost: Some(BoostWindow::default()),
            min_player_distance: 100.0,
            scatter: 24.0,
            timed: true,
        }
    }
}

impl SpawnerConfig {
    pub fn new(name: impl Into<String>, kind: EnemyKind, spawn_point: Vec2) -> Self {
        Self {
            name: name.into(),
            kind,
            spawn_point,
            ..default()
        }
    }

    /// A request-only pool: nothing spawns on a timer.
    pub fn on_demand(name: impl Into<String>, kind: EnemyKind, capacity: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity,
            boost: None,
            timed: false,
            ..default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                pool: self.name.clone(),
            });
        }
        positive_secs("spawn interval", self.interval)?;
        non_negative("min player distance", self.min_player_distance)?;
        non_negative("scatter", self.scatter)?;
        if let Some(boost) = self.boost {
            positive_secs("boost interval", boost.interval)?;
            positive_secs("boost duration", boost.duration)?;
            if boost.multiplier < 1 {
                return Err(ConfigError::BoostMultiplier(boost.multiplier));
            }
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value == 0.0 {
        return Ok(());
    }
    positive(name, value)
}

/// Spawners created on entering the game.
#[derive(Resource, Clone, Debug)]
pub struct SpawnerRoster(pub Vec<SpawnerConfig>);

impl Default for SpawnerRoster {
    fn default() -> Self {
        Self(vec![
            SpawnerConfig {
                capacity: 20,
                ..SpawnerConfig::new("wanderers", EnemyKind::Wanderer, Vec2::new(-768.0, 384.0))
            },
            SpawnerConfig {
                capacity: 6,
                base_rate: 1,
                interval: 4.0,
                ..SpawnerConfig::new("chasers", EnemyKind::Chaser, Vec2::new(768.0, 384.0))
            },
            SpawnerConfig {
                capacity: 4,
                base_rate: 1,
                interval: 6.0,
                boost: None,
                ..SpawnerConfig::new("lungers", EnemyKind::Lunger, Vec2::new(0.0, 448.0))
            },
            SpawnerConfig {
                capacity: 8,
                base_rate: 2,
                interval: 3.0,
                ..SpawnerConfig::new("volatiles", EnemyKind::Volatile, Vec2::new(-768.0, -384.0))
            },
            SpawnerConfig {
                capacity: 10,
                base_rate: 2,
                interval: 2.0,
                ..SpawnerConfig::new("clingers", EnemyKind::Clinger, Vec2::new(768.0, -384.0))
            },
        ])
    }
}
