//! Sprite Particles headless runner
//!
//! Runs the fixed-step simulation with the burst emitter and logs particle
//! and vertex counts once per simulated second. Window hosts embed the
//! library directly and draw through `renderer::BatchPipeline`.
//!
//! Usage: `sprite-particles [config.json]` (log level via `RUST_LOG`)

use std::process::ExitCode;

use sprite_particles::renderer::FrameStats;
use sprite_particles::sim::{Clock, ManualClock};
use sprite_particles::{
    BurstEmitter, ConfigError, EmitterConfig, ParticleSystem, RenderableKind, SpriteImage,
};

fn run() -> Result<(), ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EmitterConfig::load(path)?,
        None => {
            log::info!("No config given, using defaults");
            EmitterConfig::default()
        }
    };

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Seed: {}", seed);

    let dt = config.refresh_rate;
    let image = match config.shape {
        RenderableKind::Sprite(image) => image,
        RenderableKind::Rect { .. } => SpriteImage::default(),
    };
    let mut system = ParticleSystem::with_clock(
        image,
        config.max_count(),
        ManualClock::new(0.0),
        seed,
    );
    system.forces = config.forces();
    let mut emitter = BurstEmitter::new(&config, seed.wrapping_add(1));

    let frames = (config.duration / dt).round() as u64;
    let frames_per_second = ((1.0 / dt).round() as u64).max(1);
    let mut peak = 0;

    for frame in 1..=frames {
        system.clock_mut().advance(dt as f64);
        emitter.frame(dt, &mut system)?;
        peak = peak.max(system.particle_count());

        let mut stats = FrameStats::default();
        system.draw(&mut stats);

        if frame % frames_per_second == 0 {
            log::info!(
                "t={:.1}s particles={} vertices={} draw_calls={}",
                system.clock().now(),
                system.particle_count(),
                stats.vertices,
                stats.draw_calls
            );
        }
    }

    log::info!(
        "Done: {} frames, peak {} / {} particles",
        frames,
        peak,
        system.max_count()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sprite Particles (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
