//! Per-burst particle settings
//!
//! One `ParticleSettings` is built per emission burst and shared (read-only)
//! by every particle born from it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// 8-bit RGB color (0-255 per channel)
pub type Rgb = [u8; 3];

/// Convert an 8-bit color to float channels on the same 0-255 scale
#[inline]
pub fn rgb_to_vec3(color: Rgb) -> Vec3 {
    Vec3::new(color[0] as f32, color[1] as f32, color[2] as f32)
}

/// Color, opacity, lifespan and mass ranges for a burst of particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParticleSettings")]
pub struct ParticleSettings {
    start_color: Rgb,
    end_color: Rgb,
    start_opacity: f32,
    end_opacity: f32,
    min_lifespan: f32,
    max_lifespan: f32,
    start_mass: f32,
    end_mass: f32,
}

impl ParticleSettings {
    /// Build validated settings.
    ///
    /// Opacity is on the 0-255 scale, lifespans are seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_color: Rgb,
        end_color: Rgb,
        start_opacity: f32,
        end_opacity: f32,
        min_lifespan: f32,
        max_lifespan: f32,
        start_mass: f32,
        end_mass: f32,
    ) -> Result<Self, SettingsError> {
        if !(min_lifespan.is_finite() && max_lifespan.is_finite())
            || min_lifespan < 0.0
            || max_lifespan < 0.0
        {
            return Err(SettingsError::InvalidLifespan {
                min: min_lifespan,
                max: max_lifespan,
            });
        }
        if min_lifespan > max_lifespan {
            return Err(SettingsError::InvertedLifespan {
                min: min_lifespan,
                max: max_lifespan,
            });
        }
        // `!(x > 0.0)` also rejects NaN
        if !(start_mass > 0.0 && end_mass > 0.0) || !start_mass.is_finite() || !end_mass.is_finite()
        {
            return Err(SettingsError::NonPositiveMass {
                start: start_mass,
                end: end_mass,
            });
        }
        if !(start_opacity.is_finite() && end_opacity.is_finite()) {
            return Err(SettingsError::InvalidOpacity {
                start: start_opacity,
                end: end_opacity,
            });
        }

        Ok(Self {
            start_color,
            end_color,
            start_opacity,
            end_opacity,
            min_lifespan,
            max_lifespan,
            start_mass,
            end_mass,
        })
    }

    pub fn start_color(&self) -> Rgb {
        self.start_color
    }

    pub fn end_color(&self) -> Rgb {
        self.end_color
    }

    pub fn start_opacity(&self) -> f32 {
        self.start_opacity
    }

    pub fn end_opacity(&self) -> f32 {
        self.end_opacity
    }

    pub fn min_lifespan(&self) -> f32 {
        self.min_lifespan
    }

    pub fn max_lifespan(&self) -> f32 {
        self.max_lifespan
    }

    pub fn start_mass(&self) -> f32 {
        self.start_mass
    }

    pub fn end_mass(&self) -> f32 {
        self.end_mass
    }

    /// Mass at interpolation factor `t`
    #[inline]
    pub fn mass_at(&self, t: f32) -> f32 {
        (1.0 - t) * self.start_mass + t * self.end_mass
    }

    /// Color at interpolation factor `t` (0-255 float channels)
    #[inline]
    pub fn color_at(&self, t: f32) -> Vec3 {
        (1.0 - t) * rgb_to_vec3(self.start_color) + t * rgb_to_vec3(self.end_color)
    }

    /// Opacity at interpolation factor `t` (0-255 scale)
    #[inline]
    pub fn opacity_at(&self, t: f32) -> f32 {
        (1.0 - t) * self.start_opacity + t * self.end_opacity
    }
}

/// Unvalidated wire shape, only used for deserialization
#[derive(Deserialize)]
struct RawParticleSettings {
    start_color: Rgb,
    end_color: Rgb,
    start_opacity: f32,
    end_opacity: f32,
    min_lifespan: f32,
    max_lifespan: f32,
    start_mass: f32,
    end_mass: f32,
}

impl TryFrom<RawParticleSettings> for ParticleSettings {
    type Error = SettingsError;

    fn try_from(raw: RawParticleSettings) -> Result<Self, Self::Error> {
        ParticleSettings::new(
            raw.start_color,
            raw.end_color,
            raw.start_opacity,
            raw.end_opacity,
            raw.min_lifespan,
            raw.max_lifespan,
            raw.start_mass,
            raw.end_mass,
        )
    }
}
