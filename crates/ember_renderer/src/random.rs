//! Deterministic random source.
//!
//! Every render job owns its own [`RandomSource`] seeded from the job index,
//! which is what makes a render reproducible no matter which thread runs it.

use ember_math::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Seedable pseudo-random generator with the sampling helpers the tracer needs.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: Pcg64,
}

impl RandomSource {
    /// Create a generator from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Uniform real in `[0, 1)`.
    #[inline]
    pub fn real(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform real in `[min, max)`.
    #[inline]
    pub fn real_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.real()
    }

    /// Uniformly chosen axis index: 0, 1 or 2.
    #[inline]
    pub fn axis(&mut self) -> usize {
        self.rng.gen_range(0..3)
    }

    /// Vector with each component uniform in `[0, 1)`.
    pub fn vec(&mut self) -> Vec3 {
        Vec3::new(self.real(), self.real(), self.real())
    }

    /// Vector with each component uniform in `[min, max)`.
    pub fn vec_range(&mut self, min: f32, max: f32) -> Vec3 {
        Vec3::new(
            self.real_range(min, max),
            self.real_range(min, max),
            self.real_range(min, max),
        )
    }

    /// Rejection-sampled point inside the unit sphere.
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = self.vec_range(-1.0, 1.0);
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }

    /// Random direction on the unit sphere.
    pub fn unit_vector(&mut self) -> Vec3 {
        loop {
            let p = self.in_unit_sphere();
            // Reject samples too close to the origin to normalize safely.
            let len_sq = p.length_squared();
            if len_sq > 1e-12 {
                return p / len_sq.sqrt();
            }
        }
    }

    /// Rejection-sampled point inside the unit disk in the XY plane.
    pub fn in_unit_disk(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(self.real_range(-1.0, 1.0), self.real_range(-1.0, 1.0), 0.0);
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::new(7);
        let mut b = RandomSource::new(7);
        for _ in 0..100 {
            assert_eq!(a.real().to_bits(), b.real().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = RandomSource::new(1);
        let mut b = RandomSource::new(2);
        let sa: Vec<f32> = (0..8).map(|_| a.real()).collect();
        let sb: Vec<f32> = (0..8).map(|_| b.real()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn test_real_range_bounds() {
        let mut rng = RandomSource::new(42);
        for _ in 0..1000 {
            let x = rng.real();
            assert!((0.0..1.0).contains(&x));
            let y = rng.real_range(1.1, 1.7);
            assert!((1.1..=1.7).contains(&y));
        }
    }

    #[test]
    fn test_axis_covers_all_three() {
        let mut rng = RandomSource::new(3);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[rng.axis()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_sphere_and_disk_samples() {
        let mut rng = RandomSource::new(11);
        for _ in 0..1000 {
            assert!(rng.in_unit_sphere().length_squared() <= 1.0);

            let d = rng.in_unit_disk();
            assert!(d.length_squared() <= 1.0);
            assert_eq!(d.z, 0.0);

            assert!((rng.unit_vector().length() - 1.0).abs() < 1e-4);
        }
    }
}
