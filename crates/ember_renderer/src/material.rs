//! Materials describing how light interacts with surfaces.
//!
//! The set of materials is closed, so dispatch is a `match` over [`Material`]
//! rather than a trait object.

use crate::{hittable::HitRecord, RandomSource, Ray};
use ember_math::{near_zero, reflect, refract, Vec3};

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// Handle to a material stored in a scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl MaterialId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Componentwise weight applied to light returning along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Lambertian (diffuse) material, optionally emissive.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
    emit: Color,
}

impl Lambertian {
    /// Create a new non-emissive Lambertian material with the given albedo.
    pub fn new(albedo: Color) -> Self {
        Self::emissive(albedo, Color::ZERO)
    }

    /// Create a Lambertian surface that also emits `emit`.
    pub fn emissive(albedo: Color, emit: Color) -> Self {
        Self { albedo, emit }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut RandomSource) -> ScatterResult {
        let mut scatter_direction = rec.normal + rng.unit_vector();

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time),
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut RandomSource) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let direction = reflected + self.fuzz * rng.in_unit_sphere();

        // Fuzz pushed the ray below the surface: absorbed
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut RandomSource) -> ScatterResult {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > rng.real() {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        }
    }
}

/// Every material a scene can hold.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    Diffuse(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    #[inline]
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut RandomSource,
    ) -> Option<ScatterResult> {
        match self {
            Material::Diffuse(mat) => Some(mat.scatter(ray_in, rec, rng)),
            Material::Metal(mat) => mat.scatter(ray_in, rec, rng),
            Material::Dielectric(mat) => Some(mat.scatter(ray_in, rec, rng)),
        }
    }

    /// Light emitted at the hit point. Only diffuse surfaces emit.
    #[inline]
    pub fn emitted(&self, _rec: &HitRecord) -> Color {
        match self {
            Material::Diffuse(mat) => mat.emit,
            Material::Metal(_) | Material::Dielectric(_) => Color::ZERO,
        }
    }
}

impl From<Lambertian> for Material {
    fn from(mat: Lambertian) -> Self {
        Material::Diffuse(mat)
    }
}

impl From<Metal> for Material {
    fn from(mat: Metal) -> Self {
        Material::Metal(mat)
    }
}

impl From<Dielectric> for Material {
    fn from(mat: Dielectric) -> Self {
        Material::Dielectric(mat)
    }
}
