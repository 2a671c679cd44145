//! Particle lifecycle engine
//!
//! Everything here is CPU-side and single-threaded:
//! - Injected clock and seeded RNG only
//! - One clock snapshot per update
//! - Dead particles are reaped after the update pass, never during it

pub mod clock;
pub mod particle;
pub mod physics;
pub mod random;
pub mod settings;
pub mod system;

pub use clock::{Clock, ManualClock, SystemClock};
pub use particle::Particle;
pub use physics::{MIN_MASS, PhysicsState};
pub use random::{uniform, uniform_vec2};
pub use settings::{ParticleSettings, Rgb, rgb_to_vec3};
pub use system::ParticleSystem;
