//! Core path tracing renderer.
//!
//! Implements uniformly sampled Monte Carlo path tracing:
//! - Recursive ray tracing with configurable depth
//! - Emissive surfaces as the only light sources
//! - Anti-aliasing via multi-sampling, spread over a worker pool

use crate::job::{generate_jobs, JobLayout};
use crate::pool::WorkerPool;
use crate::{Camera, Color, RenderError, Ray, Scene};
use crate::RandomSource;
use ember_math::Interval;
use std::time::Instant;

/// Secondary rays start this far along to avoid re-hitting their own surface.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Number of worker threads
    pub thread_count: usize,
    /// How the image is cut into jobs
    pub layout: JobLayout,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            samples_per_pixel: 50,
            max_depth: 50,
            thread_count: 8,
            layout: JobLayout::default(),
        }
    }
}

impl RenderConfig {
    /// Check the settings a render cannot start without.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if self.thread_count == 0 {
            return Err(RenderError::NoThreads);
        }
        self.layout.validate()
    }
}

/// Compute the radiance arriving along a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating emitted light.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut RandomSource) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, Interval::from_min(SHADOW_ACNE_EPSILON)) else {
        return scene.background_color();
    };

    let material = scene.material(rec.material);
    let emission = material.emitted(&rec);

    match material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, scene, depth - 1, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed, or a pure light source
        None => emission,
    }
}

/// Accumulated render output.
///
/// Each pixel holds the *sum* of its samples. Row 0 is the bottom scanline,
/// matching the camera's `v = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the accumulated sum at column `x` of scanline `y`.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the accumulated sum at column `x` of scanline `y`.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene with the worker pool described by `config`.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    config.validate()?;
    if !scene.is_initialized() {
        return Err(RenderError::SceneNotInitialized);
    }

    let jobs = generate_jobs(config)?;
    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} threads, {} jobs",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        config.thread_count,
        jobs.len()
    );

    let start = Instant::now();
    let pool = WorkerPool::new(config.thread_count);
    let finished = pool.run(jobs, camera, scene, config.width, config.height);

    let mut image = ImageBuffer::new(config.width, config.height, config.samples_per_pixel);
    for job in &finished {
        job.merge_into(&mut image);
    }
    log::info!("Rendered in {:?}", start.elapsed());

    Ok(image)
}
