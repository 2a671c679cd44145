//! Particle system: bounded emission, per-frame update, reaping and drawing
//!
//! All particles share one render batch, so a frame costs a single draw no
//! matter how many are alive.

use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{Clock, SystemClock};
use super::particle::Particle;
use super::physics::PhysicsState;
use super::random::uniform_vec2;
use super::settings::ParticleSettings;
use crate::renderer::{DrawTarget, RenderBatch, RenderableKind, SpriteImage};

/// Upper bound on the particle storage reserved up front
const PREALLOCATE_LIMIT: usize = 4096;

/// Owns particles, global forces and the render batch
#[derive(Debug)]
pub struct ParticleSystem<C: Clock = SystemClock> {
    /// Forces (in N) applied to every live particle, in order
    pub forces: Vec<Vec2>,
    particles: Vec<Particle>,
    max_count: usize,
    image: SpriteImage,
    batch: RenderBatch,
    clock: C,
    rng: Pcg32,
    next_id: u32,
}

impl ParticleSystem<SystemClock> {
    /// Real-time system on the wall clock with a random seed
    pub fn new(image: SpriteImage, max_count: usize) -> Self {
        Self::with_clock(image, max_count, SystemClock::new(), rand::random())
    }
}

impl<C: Clock> ParticleSystem<C> {
    /// System with an explicit time source and RNG seed
    pub fn with_clock(image: SpriteImage, max_count: usize, clock: C, seed: u64) -> Self {
        log::debug!("Particle system: max_count={}, seed={}", max_count, seed);
        Self {
            forces: Vec::new(),
            particles: Vec::with_capacity(max_count.min(PREALLOCATE_LIMIT)),
            max_count,
            image,
            batch: RenderBatch::new(),
            clock,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Emit up to `count` sprite particles at `(x, y)`.
    ///
    /// Velocities are sampled component-wise between `min_velocity` and
    /// `max_velocity`. A burst that would exceed `max_count` is truncated.
    /// Returns the particles created by this call.
    pub fn emit(
        &mut self,
        x: f32,
        y: f32,
        count: usize,
        settings: &Rc<ParticleSettings>,
        min_velocity: Vec2,
        max_velocity: Vec2,
    ) -> &[Particle] {
        let kind = RenderableKind::Sprite(self.image);
        self.emit_kind(kind, x, y, count, settings, min_velocity, max_velocity)
    }

    /// Same as [`emit`](Self::emit) but each particle is a `width` × `height`
    /// rectangle.
    #[allow(clippy::too_many_arguments)]
    pub fn emit_rect(
        &mut self,
        x: f32,
        y: f32,
        count: usize,
        settings: &Rc<ParticleSettings>,
        min_velocity: Vec2,
        max_velocity: Vec2,
        width: f32,
        height: f32,
    ) -> &[Particle] {
        let kind = RenderableKind::Rect { width, height };
        self.emit_kind(kind, x, y, count, settings, min_velocity, max_velocity)
    }

    /// Shared emission path for every renderable kind
    #[allow(clippy::too_many_arguments)]
    pub fn emit_kind(
        &mut self,
        kind: RenderableKind,
        x: f32,
        y: f32,
        count: usize,
        settings: &Rc<ParticleSettings>,
        min_velocity: Vec2,
        max_velocity: Vec2,
    ) -> &[Particle] {
        let start = self.particles.len();
        let available = self.max_count.saturating_sub(start);
        let n = count.min(available);
        if n < count {
            log::debug!(
                "Emission truncated: requested {}, created {} (max_count {})",
                count,
                n,
                self.max_count
            );
        }

        let creation_time = self.clock.now();
        let pos = Vec2::new(x, y);
        for _ in 0..n {
            let renderable = kind.create(x, y, &mut self.batch);
            let vel = uniform_vec2(&mut self.rng, min_velocity, max_velocity);
            let state = PhysicsState::new(pos, vel, settings.start_mass());
            let id = self.next_entity_id();
            let particle = Particle::new(
                id,
                renderable,
                state,
                creation_time,
                Rc::clone(settings),
                &mut self.rng,
                &mut self.batch,
            );
            self.particles.push(particle);
        }

        &self.particles[start..]
    }

    /// Advance every particle by `dt`, then reap the dead ones.
    pub fn update(&mut self, dt: f32) {
        let now = self.clock.now();
        for particle in self.particles.iter_mut() {
            particle.update(dt, now, &self.forces, &mut self.batch);
        }

        // Reap in a separate pass, releasing renderables
        let before = self.particles.len();
        let batch = &mut self.batch;
        self.particles.retain_mut(|p| {
            if p.is_dead() {
                p.release(batch);
                false
            } else {
                true
            }
        });
        let reaped = before - self.particles.len();
        if reaped > 0 {
            log::trace!("Reaped {} particles, {} alive", reaped, self.particles.len());
        }
    }

    /// Draw every live particle with one call on `target`
    pub fn draw<T: DrawTarget + ?Sized>(&mut self, target: &mut T) {
        self.batch.draw(target);
    }

    /// Release every particle and its renderable
    pub fn clear(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.release(&mut self.batch);
        }
        self.particles.clear();
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn batch(&self) -> &RenderBatch {
        &self.batch
    }

    pub fn image(&self) -> SpriteImage {
        self.image
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock access for drivers that own simulation time
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}
