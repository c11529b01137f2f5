//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over spheres and axis-aligned rectangles,
//! accelerated by a BVH and rendered in parallel by a fixed worker pool.
//! Every job owns a seeded random source, so a render is reproducible
//! for any thread count.

mod bvh;
mod camera;
mod error;
mod hittable;
mod job;
mod material;
mod output;
mod pool;
mod random;
mod rectangle;
mod renderer;
mod scene;
mod sphere;

pub use bvh::{Bvh, BvhNode, BvhNodeKind, NodeIndex};
pub use camera::Camera;
pub use error::{OutputError, RenderError};
pub use hittable::{HitRecord, Hittable, Primitive};
pub use job::{generate_jobs, BlockJob, JobLayout};
pub use material::{Color, Dielectric, Lambertian, Material, MaterialId, Metal, ScatterResult};
pub use output::{color_to_rgb, linear_to_gamma, save_png, write_ppm};
pub use pool::WorkerPool;
pub use random::RandomSource;
pub use rectangle::{Rectangle, RectanglePlane};
pub use renderer::{ray_color, render, ImageBuffer, RenderConfig, SHADOW_ACNE_EPSILON};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};
