// Re-export glam for convenience
pub use glam::DVec3;

/// Double precision vector used for points, directions and colors.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

// Prism math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Threshold below which every component of a vector counts as zero.
pub const NEAR_ZERO: f64 = 1e-8;

/// Returns true if every component of `v` is within [`NEAR_ZERO`] of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices on the incoming and
/// outgoing side of the surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
