//! Uniform sampling helpers over an injected RNG

use glam::Vec2;
use rand::Rng;
use rand::distr::{Distribution, Uniform};

/// Uniform sample in `[min, max]`.
///
/// Returns `min` exactly when the bounds are equal; reversed bounds are
/// swapped rather than panicking. Bounds with no distribution (non-finite,
/// or a span that overflows `f32`) yield the lower bound.
pub fn uniform<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        return lo;
    }
    match Uniform::new_inclusive(lo, hi) {
        Ok(dist) => dist.sample(rng),
        Err(_) => lo,
    }
}

/// Component-wise uniform sample between two vectors
pub fn uniform_vec2<R: Rng>(rng: &mut R, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(uniform(rng, min.x, max.x), uniform(rng, min.y, max.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_uniform_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 1.0, 4.0);
            assert!((1.0..=4.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_degenerate_and_reversed() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
        let v = uniform(&mut rng, 5.0, -5.0);
        assert!((-5.0..=5.0).contains(&v));
    }

    #[test]
    fn test_uniform_unsampleable_bounds_fall_back() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, -3e38, 3e38), -3e38);
        assert_eq!(uniform(&mut rng, 0.0, f32::INFINITY), 0.0);
        assert_eq!(uniform(&mut rng, f32::NAN, 1.0), 1.0);
    }

    #[test]
    fn test_uniform_vec2_componentwise() {
        let mut rng = Pcg32::seed_from_u64(42);
        let min = Vec2::new(-300.0, -180.0);
        let max = Vec2::new(300.0, -120.0);
        for _ in 0..1000 {
            let v = uniform_vec2(&mut rng, min, max);
            assert!(v.x >= min.x && v.x <= max.x);
            assert!(v.y >= min.y && v.y <= max.y);
        }
    }
}
