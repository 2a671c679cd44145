//! Error types
//!
//! Malformed particle settings are rejected when they are built, so the
//! per-frame code never sees an inverted lifespan range or a zero mass.

use std::io;
use thiserror::Error;

/// Reasons a [`ParticleSettings`](crate::sim::ParticleSettings) value can be rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// Lifespan bounds are the wrong way round
    #[error("min_lifespan ({min}) is greater than max_lifespan ({max})")]
    InvertedLifespan { min: f32, max: f32 },

    /// Lifespan bound is negative, NaN or infinite
    #[error("lifespan bounds must be finite and non-negative, got [{min}, {max}]")]
    InvalidLifespan { min: f32, max: f32 },

    /// Mass bound is zero, negative, NaN or infinite
    #[error("start_mass ({start}) and end_mass ({end}) must be finite and positive")]
    NonPositiveMass { start: f32, end: f32 },

    /// Opacity bound is NaN or infinite
    #[error("opacity bounds must be finite, got {start} -> {end}")]
    InvalidOpacity { start: f32, end: f32 },
}

/// Errors raised while loading an [`EmitterConfig`](crate::config::EmitterConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Config file is not valid JSON for the expected shape
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed values are out of range
    #[error("Invalid config value: {0}")]
    Invalid(String),

    /// Lifespan/mass/opacity values would produce invalid particle settings
    #[error("Invalid particle settings: {0}")]
    Settings(#[from] SettingsError),
}
