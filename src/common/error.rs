//! Configuration errors.
//!
//! Everything in here is a startup failure: no correct running system can come out
//! of a zero-capacity pool or a zero-length interval, so these are validated once
//! and then treated as invariants by the hot paths.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A pool was asked to hold nothing.
    #[error("pool '{pool}' must have a capacity of at least 1")]
    ZeroCapacity { pool: String },

    /// An interval or duration that drives a repeating timer.
    #[error("'{name}' must be a positive number of seconds, got {value}")]
    NonPositiveInterval { name: &'static str, value: f32 },

    /// Boost multipliers below 1 would shrink spawns during the boost window.
    #[error("boost multiplier must be at least 1, got {0}")]
    BoostMultiplier(u32),

    /// An aimed fan with no projectiles in it.
    #[error("aimed fan for '{0}' must fire at least one projectile")]
    EmptyFan(String),

    /// Health pools and radii must be strictly positive.
    #[error("'{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    /// An encounter needs at least one phase to cycle through.
    #[error("encounter '{0}' has no phases")]
    NoPhases(String),
}

/// Shared check for the many "strictly positive seconds" parameters.
pub fn positive_secs(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveInterval { name, value })
    }
}

/// Shared check for strictly positive magnitudes.
pub fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
