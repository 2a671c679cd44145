//! Emitter and simulation configuration
//!
//! Loaded from JSON; every field has a default so partial files are fine.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::renderer::RenderableKind;
use crate::sim::ParticleSettings;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 250,
            QualityPreset::Medium => 1000,
            QualityPreset::High => 4000,
        }
    }
}

/// Emitter, palette and run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Particle cap preset
    pub quality: QualityPreset,
    /// Explicit particle cap, overrides `quality`
    pub max_count: Option<usize>,

    // === Viewport / timing ===
    pub width: u32,
    pub height: u32,
    /// Seconds per simulation frame
    pub refresh_rate: f32,
    /// Length of a headless run in seconds
    pub duration: f32,
    /// RNG seed (random when absent)
    pub seed: Option<u64>,
    /// Start with the simulation paused
    pub start_paused: bool,

    // === Emission ===
    pub emitter_x: f32,
    pub emitter_y: f32,
    /// Particles per burst
    pub emission_count: usize,
    /// Seconds between bursts
    pub emission_interval: f32,
    pub min_start_velocity: [f32; 2],
    pub max_start_velocity: [f32; 2],
    pub shape: RenderableKind,

    // === Per-burst settings ===
    pub min_lifespan: f32,
    pub max_lifespan: f32,
    pub start_opacity: f32,
    pub end_opacity: f32,
    /// Start mass is drawn from [1/scale, scale]; end mass is start / scale
    pub mass_scale: f32,
    /// End color is the start color times this factor
    pub end_color_scale: f32,

    /// Global forces in N
    pub forces: Vec<[f32; 2]>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            max_count: None,

            width: 960,
            height: 540,
            refresh_rate: 1.0 / 60.0,
            duration: 10.0,
            seed: None,
            start_paused: false,

            emitter_x: 480.0,
            emitter_y: 500.0,
            emission_count: 20,
            emission_interval: 1.0 / 12.0,
            // px/frame at 60 Hz: [-5, -3] .. [5, -2]
            min_start_velocity: [-300.0, -180.0],
            max_start_velocity: [300.0, -120.0],
            shape: RenderableKind::default(),

            min_lifespan: 1.0,
            max_lifespan: 4.0,
            start_opacity: 255.0,
            end_opacity: 0.0,
            mass_scale: 3.0,
            end_color_scale: 0.25,

            forces: Vec::new(),
        }
    }
}

impl EmitterConfig {
    /// Create a config from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap
    pub fn max_count(&self) -> usize {
        self.max_count.unwrap_or_else(|| self.quality.max_particles())
    }

    pub fn emitter_position(&self) -> Vec2 {
        Vec2::new(self.emitter_x, self.emitter_y)
    }

    pub fn min_velocity(&self) -> Vec2 {
        Vec2::from_array(self.min_start_velocity)
    }

    pub fn max_velocity(&self) -> Vec2 {
        Vec2::from_array(self.max_start_velocity)
    }

    pub fn forces(&self) -> Vec<Vec2> {
        self.forces.iter().copied().map(Vec2::from_array).collect()
    }

    /// Check ranges that would otherwise fail later, per burst
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.refresh_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "refresh_rate must be positive, got {}",
                self.refresh_rate
            )));
        }
        if !(self.emission_interval > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "emission_interval must be positive, got {}",
                self.emission_interval
            )));
        }
        if !(self.mass_scale > 0.0) || !self.mass_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "mass_scale must be positive, got {}",
                self.mass_scale
            )));
        }
        if !(self.duration >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "duration must be non-negative, got {}",
                self.duration
            )));
        }
        if !(0.0..=1.0).contains(&self.end_color_scale) {
            return Err(ConfigError::Invalid(format!(
                "end_color_scale must be in [0, 1], got {}",
                self.end_color_scale
            )));
        }

        for (min, max) in self.min_start_velocity.iter().zip(&self.max_start_velocity) {
            if !(min.is_finite() && max.is_finite() && (max - min).is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "start velocity bounds must be finite, got {:?} to {:?}",
                    self.min_start_velocity, self.max_start_velocity
                )));
            }
        }

        // Bursts draw start mass from [1/scale, scale] and end at start / scale.
        // End mass is monotonic in start mass, so checking both extremes covers
        // every burst. Lifespan and opacity are shared and checked alongside.
        let (light, heavy) = if self.mass_scale >= 1.0 {
            (1.0 / self.mass_scale, self.mass_scale)
        } else {
            (self.mass_scale, 1.0 / self.mass_scale)
        };
        for start_mass in [light, heavy] {
            ParticleSettings::new(
                [0; 3],
                [0; 3],
                self.start_opacity,
                self.end_opacity,
                self.min_lifespan,
                self.max_lifespan,
                start_mass,
                start_mass / self.mass_scale,
            )?;
        }

        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {} (quality {}, max_count {})",
            path.display(),
            config.quality.as_str(),
            config.max_count()
        );
        Ok(config)
    }
}
