//! Scene container: primitives, materials and the BVH built over them.

use crate::{
    Bvh, Color, HitRecord, Hittable, Material, MaterialId, Primitive, RandomSource, Ray,
    Rectangle, Sphere,
};
use ember_math::Interval;

/// Owns every primitive and material of a render.
///
/// Primitives and materials are added first, then [`Scene::initialize`] builds
/// the BVH exactly once. The scene is read-only from then on.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    rectangles: Vec<Rectangle>,
    materials: Vec<Material>,
    background: Color,
    bvh: Option<Bvh>,
}

impl Scene {
    /// Create an empty scene with a black background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material and return its handle.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        self.assert_mutable();
        let id = MaterialId::new(self.materials.len());
        self.materials.push(material.into());
        id
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.assert_mutable();
        self.assert_known_material(sphere.material());
        self.spheres.push(sphere);
    }

    pub fn add_rectangle(&mut self, rectangle: Rectangle) {
        self.assert_mutable();
        self.assert_known_material(rectangle.material());
        self.rectangles.push(rectangle);
    }

    /// Radiance returned by rays that escape the scene.
    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background_color(&self) -> Color {
        self.background
    }

    /// Build the BVH over every primitive added so far.
    ///
    /// `shutter_time` bounds the motion of moving spheres; `rng` picks the split
    /// axes. Must be called exactly once, after the last addition.
    pub fn initialize(&mut self, shutter_time: f32, rng: &mut RandomSource) {
        assert!(self.bvh.is_none(), "scene is already initialized");

        let objects: Vec<Primitive> = self
            .spheres
            .iter()
            .copied()
            .map(Primitive::from)
            .chain(self.rectangles.iter().copied().map(Primitive::from))
            .collect();

        let bvh = Bvh::new(objects, shutter_time, rng);
        log::info!(
            "Scene initialized: {} spheres, {} rectangles, {} materials, {} BVH nodes",
            self.spheres.len(),
            self.rectangles.len(),
            self.materials.len(),
            bvh.nodes().len()
        );
        self.bvh = Some(bvh);
    }

    pub fn is_initialized(&self) -> bool {
        self.bvh.is_some()
    }

    /// Closest hit along `ray` within `ray_t`.
    ///
    /// An uninitialized scene has nothing to hit.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        debug_assert!(self.is_initialized(), "scene queried before initialize()");
        self.bvh.as_ref()?.hit(ray, ray_t)
    }

    /// Look up a material by handle.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn assert_mutable(&self) {
        assert!(
            self.bvh.is_none(),
            "scene cannot be modified after initialize()"
        );
    }

    fn assert_known_material(&self, id: MaterialId) {
        assert!(
            id.index() < self.materials.len(),
            "unknown material handle {}",
            id.index()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, Lambertian, Metal, RectanglePlane};
    use ember_math::Vec3;

    #[test]
    fn test_material_handles_are_sequential() {
        let mut scene = Scene::new();
        let a = scene.add_material(Lambertian::new(Color::ONE));
        let b = scene.add_material(Metal::new(Color::ONE, 0.1));
        let c = scene.add_material(Dielectric::new(1.5));

        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert!(matches!(scene.material(b), Material::Metal(_)));
        assert_eq!(scene.material_count(), 3);
    }

    #[test]
    fn test_hit_after_initialize() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Lambertian::new(Color::ONE));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, mat));
        scene.add_rectangle(Rectangle::new(RectanglePlane::Xy, (-5.0, 5.0), (-5.0, 5.0), -10.0, mat));
        scene.initialize(0.0, &mut RandomSource::new(1));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let hit = scene.hit(&ray, Interval::from_min(0.001)).expect("must hit");
        assert!((hit.t - 2.0).abs() < 1e-5);

        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), -Vec3::Z, 0.0);
        let hit = scene.hit(&ray, Interval::from_min(0.001)).expect("must hit wall");
        assert!((hit.t - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_background_color() {
        let mut scene = Scene::new();
        assert_eq!(scene.background_color(), Color::ZERO);
        scene.set_background_color(Color::new(0.7, 0.8, 1.0));
        assert_eq!(scene.background_color(), Color::new(0.7, 0.8, 1.0));
    }

    #[test]
    #[should_panic(expected = "after initialize")]
    fn test_add_after_initialize_panics() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Lambertian::new(Color::ONE));
        scene.initialize(0.0, &mut RandomSource::new(1));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, mat));
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut scene = Scene::new();
        scene.initialize(0.0, &mut RandomSource::new(1));
        scene.initialize(0.0, &mut RandomSource::new(1));
    }

    #[test]
    #[should_panic(expected = "unknown material")]
    fn test_unknown_material_panics() {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, MaterialId::new(4)));
    }
}
