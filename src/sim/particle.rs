//! A single particle and its alive → dead lifecycle

use std::rc::Rc;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::physics::PhysicsState;
use super::random::uniform;
use super::settings::{ParticleSettings, rgb_to_vec3};
use crate::renderer::{RenderBatch, Renderable};

/// A particle driving one renderable
#[derive(Debug)]
pub struct Particle {
    id: u32,
    state: PhysicsState,
    settings: Rc<ParticleSettings>,
    /// Seconds, on the owning system's clock
    creation_time: f64,
    /// Sampled once from the settings' lifespan range
    lifespan: f32,
    dead: bool,
    /// Interpolation factor from the last live update
    t: f32,
    color: Vec3,
    opacity: f32,
    renderable: Box<dyn Renderable>,
}

impl Particle {
    /// Create a particle, sampling its lifespan and pushing the start color
    /// and opacity into the renderable.
    pub fn new<R: Rng>(
        id: u32,
        mut renderable: Box<dyn Renderable>,
        state: PhysicsState,
        creation_time: f64,
        settings: Rc<ParticleSettings>,
        rng: &mut R,
        batch: &mut RenderBatch,
    ) -> Self {
        let lifespan = uniform(rng, settings.min_lifespan(), settings.max_lifespan());
        let color = rgb_to_vec3(settings.start_color());
        let opacity = settings.start_opacity();
        renderable.set_color(batch, color);
        renderable.set_opacity(batch, opacity);

        Self {
            id,
            state,
            settings,
            creation_time,
            lifespan,
            dead: false,
            t: 0.0,
            color,
            opacity,
            renderable,
        }
    }

    /// Advance one tick.
    ///
    /// Position is integrated with the previous tick's velocity before the
    /// forces update it. Mass is set from time, not integrated.
    pub fn update(&mut self, dt: f32, current_time: f64, forces: &[Vec2], batch: &mut RenderBatch) {
        if self.dead {
            return;
        }

        let elapsed = (current_time - self.creation_time) as f32;
        if elapsed > self.lifespan {
            self.dead = true;
            return;
        }

        let t = if self.lifespan > 0.0 {
            elapsed / self.lifespan
        } else {
            0.0
        };
        self.t = t;

        self.state.mass = self.settings.mass_at(t);
        self.state.integrate_position(dt);
        self.renderable
            .update(batch, self.state.pos.x, self.state.pos.y);
        self.state.apply_forces(forces, dt);

        self.color = self.settings.color_at(t);
        self.renderable.set_color(batch, self.color);
        self.opacity = self.settings.opacity_at(t);
        self.renderable.set_opacity(batch, self.opacity);
    }

    /// Release the renderable from the batch
    pub(crate) fn release(&mut self, batch: &mut RenderBatch) {
        self.renderable.delete(batch);
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    pub fn settings(&self) -> &Rc<ParticleSettings> {
        &self.settings
    }

    pub fn creation_time(&self) -> f64 {
        self.creation_time
    }

    pub fn lifespan(&self) -> f32 {
        self.lifespan
    }

    /// Elapsed-life fraction as of the last live update
    pub fn t(&self) -> f32 {
        self.t
    }

    /// Current color (0-255 float channels)
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Current opacity (0-255)
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn renderable(&self) -> &dyn Renderable {
        self.renderable.as_ref()
    }
}
