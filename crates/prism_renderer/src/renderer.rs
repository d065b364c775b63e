//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Bounded bounce depth with multiplicative attenuation
//! - Sky gradient for rays that escape the scene
//! - Anti-aliasing via multi-sampling
//! - Deterministic per-pixel random streams, sequential or bucketed in parallel

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{output, pixel_rng, Camera, Color, Hittable, RandomSource};
use prism_math::{Interval, Ray};

/// Smallest ray parameter accepted as a hit, to avoid self-intersection
/// from floating point error at the previous bounce.
pub const HIT_T_MIN: f64 = 0.0001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Seed for every random stream in the render
    pub seed: u64,
    /// Render buckets on rayon's thread pool instead of row by row
    pub parallel: bool,
    /// Bucket edge length in pixels for parallel renders
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            parallel: true,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Each bounce multiplies in the hit material's attenuation. The path ends
/// black when `depth` bounces are used up or a material absorbs the ray, and
/// picks up the sky color when the ray escapes the scene.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    rng: &mut dyn RandomSource,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(HIT_T_MIN, f64::INFINITY)) else {
            return throughput * sky_color(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            // Absorbed
            None => return Color::ZERO,
        }
    }

    // Bounce budget exhausted
    Color::ZERO
}

/// Sky gradient background, white at the horizon blending to blue overhead.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Render a single pixel with multi-sampling.
///
/// Returns the sum of all samples; dividing by the sample count is left to
/// the output stage.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RandomSource,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, camera.max_depth(), world, rng);
    }

    pixel_color
}

/// Image buffer of accumulated linear sample sums.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Samples summed into every pixel
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

    /// Get the pixel sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel sum at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to gamma-encoded RGB bytes, row-major from the top.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&output::encode_color(*color, self.samples_per_pixel));
        }
        bytes
    }

    fn copy_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.index(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene to an image buffer.
///
/// Sequential and parallel renders of the same scene, camera and seed produce
/// identical buffers.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let width = camera.image_width();
    let height = camera.image_height();

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} ({})",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        if config.parallel { "parallel" } else { "sequential" }
    );

    let start = Instant::now();
    let image = if config.parallel {
        render_parallel(camera, world, config)
    } else {
        render_sequential(camera, world, config)
    };

    log::info!("Rendered in {:.2?}", start.elapsed());
    image
}

/// Row by row, top to bottom, left to right.
fn render_sequential(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height(), camera.samples_per_pixel());

    for y in 0..image.height {
        log::debug!("Scanlines remaining: {}", image.height - y);
        for x in 0..image.width {
            let mut rng = pixel_rng(config.seed, x, y);
            let color = render_pixel(camera, world, x, y, &mut rng);
            image.set(x, y, color);
        }
    }

    image
}

fn render_parallel(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height(), camera.samples_per_pixel());
    let buckets = generate_buckets(image.width, image.height, config.bucket_size.max(1));
    let total = buckets.len();
    let finished = AtomicUsize::new(0);

    let results: Vec<BucketResult> = buckets
        .into_par_iter()
        .map(|bucket| {
            let pixels = render_bucket(&bucket, camera, world, config.seed);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
            BucketResult::new(bucket, pixels)
        })
        .collect();

    for result in &results {
        image.copy_bucket(result);
    }

    image
}
