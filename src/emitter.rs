//! Burst emitter driver
//!
//! Decides when and where to emit: every `emission_interval` seconds it picks
//! a random palette and mass, builds one `ParticleSettings` and emits a burst
//! at its position. Pausing skips both the system update and emission.

use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EmitterConfig;
use crate::error::SettingsError;
use crate::renderer::RenderableKind;
use crate::sim::{Clock, ParticleSettings, ParticleSystem, Rgb, uniform};

/// Emits random-palette bursts at a fixed interval
#[derive(Debug, Clone)]
pub struct BurstEmitter {
    pub position: Vec2,
    pub paused: bool,
    /// Seconds since the last burst
    timer: f32,
    interval: f32,
    count: usize,
    kind: RenderableKind,
    min_velocity: Vec2,
    max_velocity: Vec2,
    min_lifespan: f32,
    max_lifespan: f32,
    start_opacity: f32,
    end_opacity: f32,
    mass_scale: f32,
    end_color_scale: f32,
    rng: Pcg32,
}

impl BurstEmitter {
    pub fn new(config: &EmitterConfig, seed: u64) -> Self {
        Self {
            position: config.emitter_position(),
            paused: config.start_paused,
            // Fire on the first frame
            timer: config.emission_interval,
            interval: config.emission_interval,
            count: config.emission_count,
            kind: config.shape,
            min_velocity: config.min_velocity(),
            max_velocity: config.max_velocity(),
            min_lifespan: config.min_lifespan,
            max_lifespan: config.max_lifespan,
            start_opacity: config.start_opacity,
            end_opacity: config.end_opacity,
            mass_scale: config.mass_scale,
            end_color_scale: config.end_color_scale,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Offset the emitter, e.g. from held arrow keys
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Random palette and mass for one burst.
    ///
    /// Start color is uniform per channel, end color is a darker copy.
    /// Start mass is in [1/scale, scale] and end mass is start / scale.
    pub fn random_settings(&mut self) -> Result<ParticleSettings, SettingsError> {
        let start_color: Rgb = [
            self.rng.random_range(0..255),
            self.rng.random_range(0..255),
            self.rng.random_range(0..255),
        ];
        let end_color = start_color.map(|c| (c as f32 * self.end_color_scale) as u8);
        let start_mass = uniform(&mut self.rng, 1.0 / self.mass_scale, self.mass_scale);
        let end_mass = start_mass / self.mass_scale;

        ParticleSettings::new(
            start_color,
            end_color,
            self.start_opacity,
            self.end_opacity,
            self.min_lifespan,
            self.max_lifespan,
            start_mass,
            end_mass,
        )
    }

    /// Emit one burst now; returns the number of particles created
    pub fn burst<C: Clock>(
        &mut self,
        system: &mut ParticleSystem<C>,
    ) -> Result<usize, SettingsError> {
        let settings = Rc::new(self.random_settings()?);
        let created = system
            .emit_kind(
                self.kind,
                self.position.x,
                self.position.y,
                self.count,
                &settings,
                self.min_velocity,
                self.max_velocity,
            )
            .len();
        Ok(created)
    }

    /// Accumulate `dt` and emit when the interval has passed.
    /// Returns the number of particles created this call.
    pub fn advance<C: Clock>(
        &mut self,
        dt: f32,
        system: &mut ParticleSystem<C>,
    ) -> Result<usize, SettingsError> {
        self.timer += dt;
        if self.timer > self.interval {
            self.timer = 0.0;
            return self.burst(system);
        }
        Ok(0)
    }

    /// One frame: update the system, then emit. Does nothing while paused.
    pub fn frame<C: Clock>(
        &mut self,
        dt: f32,
        system: &mut ParticleSystem<C>,
    ) -> Result<usize, SettingsError> {
        if self.paused {
            return Ok(0);
        }
        system.update(dt);
        self.advance(dt, system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Renderable, SpriteImage};
    use crate::sim::ManualClock;

    const DT: f32 = 1.0 / 60.0;

    fn system(max_count: usize) -> ParticleSystem<ManualClock> {
        ParticleSystem::with_clock(SpriteImage::default(), max_count, ManualClock::new(0.0), 9)
    }

    #[test]
    fn test_random_palette_relationships() {
        let config = EmitterConfig::default();
        let mut emitter = BurstEmitter::new(&config, 3);
        for _ in 0..100 {
            let s = emitter.random_settings().unwrap();
            for (start, end) in s.start_color().iter().zip(s.end_color()) {
                assert!(*start < 255);
                assert_eq!(end, (*start as f32 * 0.25) as u8);
            }
            assert!(s.start_mass() >= 1.0 / 3.0 && s.start_mass() <= 3.0);
            assert!((s.end_mass() - s.start_mass() / 3.0).abs() < 1e-6);
            assert_eq!(s.min_lifespan(), 1.0);
            assert_eq!(s.max_lifespan(), 4.0);
        }
    }

    #[test]
    fn test_first_frame_emits_then_waits_for_interval() {
        let config = EmitterConfig::default();
        let mut emitter = BurstEmitter::new(&config, 3);
        let mut sys = system(1000);

        assert_eq!(emitter.advance(DT, &mut sys).unwrap(), 20);
        assert_eq!(emitter.advance(DT, &mut sys).unwrap(), 0);

        // 1/12 s is five frames at 60 Hz; the timer must pass the interval
        let mut emitted = 0;
        for _ in 0..6 {
            emitted += emitter.advance(DT, &mut sys).unwrap();
        }
        assert_eq!(emitted, 20);
        assert_eq!(sys.particle_count(), 40);
    }

    #[test]
    fn test_paused_frame_is_noop() {
        let config = EmitterConfig {
            start_paused: true,
            ..EmitterConfig::default()
        };
        let mut emitter = BurstEmitter::new(&config, 3);
        let mut sys = system(1000);
        for _ in 0..30 {
            assert_eq!(emitter.frame(DT, &mut sys).unwrap(), 0);
        }
        assert_eq!(sys.particle_count(), 0);

        emitter.toggle_pause();
        assert_eq!(emitter.frame(DT, &mut sys).unwrap(), 20);
    }

    #[test]
    fn test_bursts_respect_capacity() {
        let config = EmitterConfig {
            max_count: Some(50),
            ..EmitterConfig::default()
        };
        let mut emitter = BurstEmitter::new(&config, 3);
        let mut sys = system(config.max_count());
        for _ in 0..10 {
            emitter.burst(&mut sys).unwrap();
        }
        assert_eq!(sys.particle_count(), 50);
    }

    #[test]
    fn test_burst_with_unsampleable_velocity_does_not_panic() {
        // Built directly, so validation never ran
        let config = EmitterConfig {
            min_start_velocity: [-3e38, 0.0],
            max_start_velocity: [3e38, 0.0],
            ..EmitterConfig::default()
        };
        let mut emitter = BurstEmitter::new(&config, 3);
        let mut sys = system(100);
        assert_eq!(emitter.burst(&mut sys).unwrap(), 20);
        for p in sys.particles() {
            assert_eq!(p.state().vel.x, -3e38);
        }
    }

    #[test]
    fn test_rect_shape_and_movement() {
        let config = EmitterConfig {
            shape: RenderableKind::Rect {
                width: 5.0,
                height: 5.0,
            },
            ..EmitterConfig::default()
        };
        let mut emitter = BurstEmitter::new(&config, 3);
        emitter.move_by(Vec2::new(-80.0, -100.0));
        let mut sys = system(100);
        emitter.burst(&mut sys).unwrap();
        for p in sys.particles() {
            assert_eq!(p.state().pos, Vec2::new(400.0, 400.0));
        }
        let key = sys.particles()[0].renderable().key().unwrap();
        assert!(sys.batch().get(key).is_some_and(|q| !q.soft));
    }
}
