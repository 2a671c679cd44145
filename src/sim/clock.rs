//! Time sources
//!
//! The particle system reads one timestamp per update. Real-time hosts use
//! [`SystemClock`]; fixed-step drivers and tests use [`ManualClock`].

use std::time::Instant;

/// Monotonic time in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock advanced explicitly by the driver
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    /// Move time forward by `dt` seconds (negative steps are ignored)
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.now += dt;
        }
    }

    /// Jump to an absolute time, never backwards
    pub fn set(&mut self, time: f64) {
        self.now = self.now.max(time);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let mut clock = ManualClock::new(1.0);
        clock.advance(0.5);
        assert_eq!(clock.now(), 1.5);
        clock.advance(-3.0);
        assert_eq!(clock.now(), 1.5);
        clock.set(1.0);
        assert_eq!(clock.now(), 1.5);
        clock.set(4.0);
        assert_eq!(clock.now(), 4.0);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
