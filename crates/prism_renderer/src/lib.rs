//! Prism Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials. Rendering is deterministic for a given seed whether it runs
//! on one thread or across rayon's pool.

mod random;
mod hittable;
mod material;
mod sphere;
mod camera;
mod renderer;
mod bucket;
pub mod output;

pub use random::{pixel_rng, RandomSource};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Material, ScatterResult};
pub use sphere::Sphere;
pub use camera::{Camera, CameraConfig, CameraError, CameraResult, MAX_IMAGE_PIXELS};
pub use renderer::{render, render_pixel, ray_color, sky_color, ImageBuffer, RenderConfig, HIT_T_MIN};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use output::{OutputError, OutputResult};

/// Re-export Vec3 and common math types from prism_math
pub use prism_math::{Interval, Point3, Ray, Vec3};
