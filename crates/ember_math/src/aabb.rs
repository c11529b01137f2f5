use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for the BVH.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from its minimum and maximum corners.
    ///
    /// Panics if `min` exceeds `max` on any axis.
    pub fn from_corners(min: Vec3, max: Vec3) -> Self {
        assert!(
            min.cmple(max).all(),
            "AABB minimum {min:?} exceeds maximum {max:?}"
        );
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component gives an infinite inverse, which
    /// the comparisons handle; the `0 * inf` NaN of a ray lying on a face is
    /// discarded by `f32::max`/`f32::min`.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// An empty box; the identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_corners() {
        let aabb = Aabb::from_corners(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    #[should_panic(expected = "exceeds maximum")]
    fn test_aabb_inverted_corners_panic() {
        Aabb::from_corners(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_corners(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_corners(Vec3::new(3.0, -3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(
            surrounding,
            Aabb::from_corners(Vec3::new(0.0, -3.0, 0.0), Vec3::new(10.0, 10.0, 10.0))
        );
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray_t = Interval::new(0.0, f32::INFINITY);

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, ray_t));

        // Diagonal ray through the volume
        let ray = Ray::new(Vec3::splat(-4.0), Vec3::splat(1.0), 0.0);
        assert!(aabb.hit(&ray, ray_t));

        // Ray starting inside
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 0.9), 0.0);
        assert!(aabb.hit(&ray, ray_t));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, ray_t));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, ray_t));
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let aabb = Aabb::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
        assert!(aabb.hit(&ray, Interval::new(0.0, 4.5)));
    }

    #[test]
    fn test_aabb_ray_along_face_does_not_crash() {
        let aabb = Aabb::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Origin lies exactly on the x = 1 face and the ray never leaves that plane.
        let ray = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z, 0.0);
        let _ = aabb.hit(&ray, Interval::new(0.0, f32::INFINITY));

        // Parallel to the face, outside the slab.
        let ray = Ray::new(Vec3::new(1.5, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_flat_box_is_hit_head_on() {
        let aabb = Aabb::from_corners(Vec3::new(-1.0, -1.0, -0.0001), Vec3::new(1.0, 1.0, 0.0001));
        let ray = Ray::new(Vec3::new(0.2, 0.3, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.001, f32::INFINITY)));
    }
}
