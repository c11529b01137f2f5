//! Hittable trait, HitRecord and the closed set of scene primitives.

use crate::{MaterialId, Ray, Rectangle, Sphere};
use ember_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Material at the intersection point
    pub material: MaterialId,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record whose normal is flipped to oppose the ray.
    ///
    /// `outward_normal` is the geometric normal; `front_face` records whether it
    /// already pointed against the ray.
    pub fn new(ray: &Ray, t: f32, p: Vec3, outward_normal: Vec3, material: MaterialId) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            t,
            material,
            front_face,
        }
    }

    /// Keep the closer of two optional hits; the first wins on equal `t`.
    pub fn closest(first: Option<HitRecord>, second: Option<HitRecord>) -> Option<HitRecord> {
        match (first, second) {
            (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Axis-aligned box bounding every position the object takes while the
    /// shutter is open over `[0, shutter_time]`.
    fn bounding_box(&self, shutter_time: f32) -> Aabb;
}

/// Any primitive the BVH can store.
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    Sphere(Sphere),
    Rectangle(Rectangle),
}

impl Hittable for Primitive {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
            Primitive::Rectangle(rect) => rect.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self, shutter_time: f32) -> Aabb {
        match self {
            Primitive::Sphere(sphere) => sphere.bounding_box(shutter_time),
            Primitive::Rectangle(rect) => rect.bounding_box(shutter_time),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Rectangle> for Primitive {
    fn from(rect: Rectangle) -> Self {
        Primitive::Rectangle(rect)
    }
}
