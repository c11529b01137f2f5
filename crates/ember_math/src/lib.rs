// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Components smaller than this are treated as zero by [`near_zero`].
pub const NEAR_ZERO_EPSILON: f32 = 1e-8;

/// Returns true if every component of `v` is within [`NEAR_ZERO_EPSILON`] of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO_EPSILON && v.y.abs() < NEAR_ZERO_EPSILON && v.z.abs() < NEAR_ZERO_EPSILON
}

/// Mirror `v` about the surface normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices across the boundary.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
