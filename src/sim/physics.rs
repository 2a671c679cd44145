//! Physical state of a single particle

use glam::Vec2;

/// Smallest mass used when turning a force into an acceleration.
///
/// Interpolated mass can get arbitrarily close to zero when `end_mass` is
/// tiny; forces divide by `max(mass, MIN_MASS)` instead.
pub const MIN_MASS: f32 = 1e-4;

/// Position, velocity and mass of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
}

impl PhysicsState {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32) -> Self {
        Self { pos, vel, mass }
    }

    /// Explicit Euler position step using the current velocity
    #[inline]
    pub fn integrate_position(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Accumulate `force / mass * dt` into velocity for every force, in order
    pub fn apply_forces(&mut self, forces: &[Vec2], dt: f32) {
        let mass = self.mass.max(MIN_MASS);
        for force in forces {
            let accel = *force / mass;
            self.vel += accel * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_position() {
        let mut state = PhysicsState::new(Vec2::new(1.0, 2.0), Vec2::new(10.0, -4.0), 1.0);
        state.integrate_position(0.5);
        assert_eq!(state.pos, Vec2::new(6.0, 0.0));
        assert_eq!(state.vel, Vec2::new(10.0, -4.0));
    }

    #[test]
    fn test_apply_forces_in_order() {
        let mut state = PhysicsState::new(Vec2::ZERO, Vec2::ZERO, 2.0);
        let forces = [Vec2::new(4.0, 0.0), Vec2::new(0.0, -8.0)];
        state.apply_forces(&forces, 0.5);
        assert_eq!(state.vel, Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_zero_mass_uses_floor() {
        let mut state = PhysicsState::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        state.apply_forces(&[Vec2::new(1.0, 0.0)], 1.0);
        assert!(state.vel.is_finite());
        assert!((state.vel.x - 1.0 / MIN_MASS).abs() < 1.0);
    }
}
