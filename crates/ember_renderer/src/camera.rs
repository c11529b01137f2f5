//! Thin-lens camera for ray generation.

use crate::{RandomSource, Ray};
use ember_math::Vec3;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Image width / height
    aperture: f32,     // Lens diameter, 0 for a pinhole
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    // Shutter stays open over [0, shutter_time]
    shutter_time: f32,

    // Cached computed values (set by initialize())
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
            shutter_time: 0.0,
            // Cached values (initialized to defaults)
            origin: Vec3::ZERO,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            lens_radius: 0.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set how long the shutter stays open.
    pub fn with_shutter(mut self, shutter_time: f32) -> Self {
        self.shutter_time = shutter_time;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(w).normalize();
        self.v = w.cross(self.u);

        self.origin = self.look_from;
        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left =
            self.origin - 0.5 * self.horizontal - 0.5 * self.vertical - self.focus_dist * w;
        self.lens_radius = self.aperture * 0.5;
    }

    /// Generate a ray through normalized image coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner and `(1, 1)` the upper-right. The origin
    /// is jittered over the lens and the time drawn from the shutter interval.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut RandomSource) -> Ray {
        let rd = self.lens_radius * rng.in_unit_disk();
        let offset = self.u * rd.x + self.v * rd.y;

        let origin = self.origin + offset;
        let direction = self.lower_left + s * self.horizontal + t * self.vertical - origin;
        let time = rng.real_range(0.0, self.shutter_time);

        Ray::new(origin, direction, time)
    }

    pub fn shutter_time(&self) -> f32 {
        self.shutter_time
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
