//! Random sampling for ray generation and scattering.
//!
//! Everything stochastic in the renderer draws from a [`RandomSource`], so a
//! render is a pure function of the seed and the order of draws.

use prism_math::Vec3;
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

/// A uniform random number source.
///
/// Only [`next_f64`](RandomSource::next_f64) is required; the geometric
/// samplers are built on top of it and may be overridden (tests use this to
/// inject fixed directions).
pub trait RandomSource {
    /// A uniform sample in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// A uniform sample in [min, max).
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// A vector with every component uniform in [min, max).
    fn vec3_range(&mut self, min: f64, max: f64) -> Vec3 {
        Vec3::new(
            self.range(min, max),
            self.range(min, max),
            self.range(min, max),
        )
    }

    /// A uniformly distributed unit vector.
    fn unit_vector(&mut self) -> Vec3 {
        // Rejection sampling in the unit ball, skipping points too close to
        // the center to normalize safely
        loop {
            let p = self.vec3_range(-1.0, 1.0);
            let len_sq = p.length_squared();
            if 1e-160 < len_sq && len_sq <= 1.0 {
                return p / len_sq.sqrt();
            }
        }
    }

    /// A uniform point inside the unit disk on the z = 0 plane.
    fn in_unit_disk(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(self.range(-1.0, 1.0), self.range(-1.0, 1.0), 0.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }
}

impl RandomSource for SmallRng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.gen()
    }
}

impl RandomSource for StdRng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.gen()
    }
}

/// Independent random stream for one pixel of a render.
///
/// Seeding per pixel keeps a render bit-identical no matter which thread,
/// or in which order, the pixel is rendered.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> SmallRng {
    let index = (u64::from(y) << 32) | u64::from(x);
    SmallRng::seed_from_u64(seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
