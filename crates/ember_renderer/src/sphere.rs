//! Sphere primitive with optional linear motion.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// A sphere primitive.
///
/// A negative radius is allowed: the geometry is unchanged but the outward
/// normal points inwards, which turns a dielectric sphere into a hollow shell.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    velocity: Vec3,
    material: MaterialId,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self::moving(center, radius, material, Vec3::ZERO)
    }

    /// Create a sphere that moves with constant `velocity` while the shutter is open.
    pub fn moving(center: Vec3, radius: f32, material: MaterialId, velocity: Vec3) -> Self {
        Self {
            center,
            radius,
            velocity,
            material,
        }
    }

    /// Center of the sphere at the given shutter time offset.
    #[inline]
    pub fn center(&self, time: f32) -> Vec3 {
        self.center + self.velocity * time
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    fn box_at(&self, time: f32) -> Aabb {
        let rvec = Vec3::splat(self.radius.abs());
        let center = self.center(time);
        Aabb::from_corners(center - rvec, center + rvec)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let center = self.center(ray.time);
        let oc = ray.origin - center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - center) / self.radius;
        Some(HitRecord::new(ray, root, p, outward_normal, self.material))
    }

    fn bounding_box(&self, shutter_time: f32) -> Aabb {
        Aabb::surrounding(&self.box_at(0.0), &self.box_at(shutter_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAT: MaterialId = MaterialId::new(0);

    #[test]
    fn test_sphere_front_hit_from_outside() {
        let r = 1.5;
        let sphere = Sphere::new(Vec3::ZERO, r, MAT);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = sphere
            .hit(&ray, Interval::new(0.0, f32::INFINITY))
            .expect("ray aimed at the center must hit");
        assert!((rec.t - (5.0 - r)).abs() < 1e-5);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert_eq!(rec.material, MAT);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, MAT);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let rec = sphere.hit(&ray, Interval::from_min(0.001)).expect("inside ray must hit");
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MAT);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(sphere.hit(&ray, Interval::from_min(0.001)).is_none());

        // Sphere entirely behind the range
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.25)).is_none());
    }

    #[test]
    fn test_negative_radius_flips_outward_normal() {
        let sphere = Sphere::new(Vec3::ZERO, -1.0, MAT);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = sphere.hit(&ray, Interval::from_min(0.001)).expect("must hit");
        assert!((rec.t - 4.0).abs() < 1e-5);
        // The geometric normal points inwards, so the ray arrives at the back face.
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_center_follows_time() {
        let sphere = Sphere::moving(Vec3::ZERO, 0.5, MAT, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(sphere.center(0.5), Vec3::new(5.0, 0.0, 0.0));

        let ray_early = Ray::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let ray_late = Ray::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.5);
        assert!(sphere.hit(&ray_early, Interval::from_min(0.001)).is_none());
        assert!(sphere.hit(&ray_late, Interval::from_min(0.001)).is_some());
    }

    #[test]
    fn test_bounding_box_covers_motion() {
        let sphere = Sphere::moving(Vec3::ZERO, 1.0, MAT, Vec3::new(0.0, 4.0, 0.0));
        let bbox = sphere.bounding_box(0.5);

        assert_eq!(
            bbox,
            Aabb::from_corners(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 3.0, 1.0))
        );
    }

    #[test]
    fn test_negative_radius_bounding_box_is_valid() {
        let sphere = Sphere::new(Vec3::ZERO, -0.45, MAT);
        let bbox = sphere.bounding_box(0.0);
        assert_eq!(bbox, Aabb::from_corners(Vec3::splat(-0.45), Vec3::splat(0.45)));
    }
}
