//! Axis-aligned, double-sided rectangle primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// Smallest half-thickness given to the flat axis of a rectangle's bounding box.
const FLAT_AXIS_PADDING: f32 = 0.0001;

/// Half-thickness of the flat axis for a plane offset `k`.
///
/// Far from the origin a fixed padding falls below the f32 spacing at `k` and
/// the box collapses to zero thickness, so it grows with `|k|`.
fn flat_axis_padding(k: f32) -> f32 {
    FLAT_AXIS_PADDING.max(k.abs() * f32::EPSILON * 4.0)
}

/// Which plane a rectangle lies in.
///
/// The discriminant is the index of the fixed axis. The two varying axes follow
/// cyclically, so `Yz` spans (y, z), `Zx` spans (z, x) and `Xy` spans (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectanglePlane {
    Yz = 0,
    Zx = 1,
    Xy = 2,
}

impl RectanglePlane {
    /// Index of the fixed axis.
    #[inline]
    pub fn fixed_axis(self) -> usize {
        self as usize
    }

    /// Indices of the first and second varying axes.
    #[inline]
    pub fn varying_axes(self) -> (usize, usize) {
        let w = self.fixed_axis();
        ((w + 1) % 3, (w + 2) % 3)
    }
}

/// A rectangle perpendicular to one coordinate axis.
#[derive(Debug, Clone, Copy)]
pub struct Rectangle {
    plane: RectanglePlane,
    u: Interval,
    v: Interval,
    k: f32,
    material: MaterialId,
}

impl Rectangle {
    /// Create a rectangle spanning `u0..u1` on the plane's first varying axis and
    /// `v0..v1` on its second, at coordinate `k` on the fixed axis.
    ///
    /// Panics if an extent is inverted.
    pub fn new(
        plane: RectanglePlane,
        (u0, u1): (f32, f32),
        (v0, v1): (f32, f32),
        k: f32,
        material: MaterialId,
    ) -> Self {
        assert!(u0 <= u1 && v0 <= v1, "rectangle extents must be ordered");
        Self {
            plane,
            u: Interval::new(u0, u1),
            v: Interval::new(v0, v1),
            k,
            material,
        }
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Rectangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let w = self.plane.fixed_axis();
        let (ui, vi) = self.plane.varying_axes();

        let t = (self.k - ray.origin[w]) / ray.direction[w];
        // Non-finite t means the ray runs parallel to the plane.
        if !t.is_finite() || !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        if !self.u.contains(p[ui]) || !self.v.contains(p[vi]) {
            return None;
        }

        let mut outward_normal = Vec3::ZERO;
        outward_normal[w] = 1.0;
        Some(HitRecord::new(ray, t, p, outward_normal, self.material))
    }

    fn bounding_box(&self, _shutter_time: f32) -> Aabb {
        let w = self.plane.fixed_axis();
        let (ui, vi) = self.plane.varying_axes();

        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        let pad = flat_axis_padding(self.k);
        min[w] = self.k - pad;
        max[w] = self.k + pad;
        min[ui] = self.u.min;
        max[ui] = self.u.max;
        min[vi] = self.v.min;
        max[vi] = self.v.max;
        Aabb::from_corners(min, max)
    }
}
