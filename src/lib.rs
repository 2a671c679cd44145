//! Sprite Particles - batched 2D particle systems
//!
//! Core modules:
//! - `sim`: Particle lifecycle engine (emission, integration, reaping)
//! - `renderer`: Render batch, renderable primitives and the WebGPU pipeline
//! - `emitter`: Interval-driven burst emitter with random palettes
//! - `config`: JSON configuration and quality presets
//! - `error`: Settings and config error types

pub mod config;
pub mod emitter;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{EmitterConfig, QualityPreset};
pub use emitter::BurstEmitter;
pub use error::{ConfigError, SettingsError};
pub use renderer::{DrawTarget, RenderBatch, Renderable, RenderableKind, SpriteImage};
pub use sim::{Particle, ParticleSettings, ParticleSystem, PhysicsState};
