//! Camera for ray generation.
//!
//! [`CameraConfig`] holds the user-facing settings; [`Camera::initialize`]
//! validates them and derives the viewport geometry once. A `Camera` never
//! exposes its configuration mutably, so derived state cannot go stale.

use crate::{Hittable, ImageBuffer, RandomSource, RenderConfig};
use prism_math::{Point3, Ray, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from invalid camera configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Image width must be at least 1 pixel")]
    ZeroWidth,

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f64),

    #[error("Focus distance must be positive, got {0}")]
    InvalidFocusDistance(f64),

    #[error("look_from and look_at are the same point")]
    DegenerateView,

    #[error("Up vector is zero or parallel to the view direction")]
    DegenerateUp,

    #[error("Image of {width}x{height:.0} pixels exceeds the pixel limit")]
    ImageTooLarge { width: u32, height: f64 },
}

/// Largest image (width times height) a camera will accept.
pub const MAX_IMAGE_PIXELS: u64 = 1 << 26;

/// Result type for camera setup.
pub type CameraResult<T> = Result<T, CameraError>;

/// Image and view settings for a render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    // Image settings
    pub aspect_ratio: f64,      // Ratio of image width over height
    pub image_width: u32,       // Rendered image width in pixels
    pub samples_per_pixel: u32, // Random samples per pixel
    pub max_depth: u32,         // Max ray bounces into the scene

    // Camera positioning
    pub vfov: f64, // Vertical field of view in degrees
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,

    // Lens settings
    pub defocus_angle: f64, // Variation angle of rays through each pixel, degrees
    pub focus_dist: f64,    // Distance from look_from to the plane of perfect focus
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Point3::new(0.0, 0.0, -1.0),
            look_at: Point3::ZERO,
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    fn validate(&self) -> CameraResult<()> {
        if self.image_width == 0 {
            return Err(CameraError::ZeroWidth);
        }
        if self.samples_per_pixel == 0 {
            return Err(CameraError::ZeroSamples);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFov(self.vfov));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(CameraError::InvalidFocusDistance(self.focus_dist));
        }
        if self.look_from == self.look_at {
            return Err(CameraError::DegenerateView);
        }
        Ok(())
    }
}

/// Image height for `width` at `aspect_ratio`, at least one row.
fn image_height_for(width: u32, aspect_ratio: f64) -> CameraResult<u32> {
    let height = (width as f64 / aspect_ratio).max(1.0);
    let pixels = width as f64 * height.floor();
    if height > u32::MAX as f64 || pixels > MAX_IMAGE_PIXELS as f64 {
        return Err(CameraError::ImageTooLarge { width, height });
    }
    Ok(height as u32)
}

/// An initialized camera generating rays into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    config: CameraConfig,

    // Derived state
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Validate `config` and derive the viewport geometry.
    ///
    /// The same config always yields an identical camera.
    pub fn initialize(config: CameraConfig) -> CameraResult<Self> {
        config.validate()?;

        if config.max_depth == 0 {
            log::warn!("max_depth is 0, every pixel will render black");
        }

        let image_width = config.image_width;
        let image_height = image_height_for(image_width, config.aspect_ratio)?;
        let center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w);
        if !(u.length_squared() > 1e-12) {
            return Err(CameraError::DegenerateUp);
        }
        let u = u.normalize();
        let v = w.cross(u);

        // Vectors across the viewport's horizontal edge and down its vertical edge
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f64;
        let pixel_delta_v = viewport_v / image_height as f64;

        // Calculate upper left pixel location
        let viewport_upper_left = center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        log::debug!(
            "Camera initialized: {}x{}, center {:?}, defocus radius {:.4}",
            image_width,
            image_height,
            center,
            defocus_radius
        );

        Ok(Self {
            config,
            image_height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        })
    }

    /// The configuration this camera was built from.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Rendered image width in pixels.
    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    /// Rendered image height in pixels, derived from width and aspect ratio.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// Camera center (the look-from point).
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The target point is jittered within the pixel's footprint; the origin
    /// is jittered over the defocus disk when depth of field is enabled.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RandomSource) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Render `world` as seen by this camera.
    pub fn render(&self, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
        crate::render(self, world, config)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RandomSource) -> Point3 {
        let p = rng.in_unit_disk();
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

/// Sample a random point in the unit square [-0.5, 0.5) x [-0.5, 0.5).
fn sample_square(rng: &mut dyn RandomSource) -> Vec3 {
    Vec3::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z() -> CameraConfig {
        CameraConfig::new()
            .with_resolution(100, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_camera_initialize() {
        let config = CameraConfig::new()
            .with_resolution(800, 4.0 / 3.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        let camera = Camera::initialize(config).unwrap();

        assert_eq!(camera.image_height(), 600);
        assert_eq!(camera.center(), Vec3::ZERO);
        assert!(camera.w.abs_diff_eq(Vec3::Z, 1e-12));
        assert!(camera.u.abs_diff_eq(Vec3::X, 1e-12));
        assert!(camera.v.abs_diff_eq(Vec3::Y, 1e-12));
    }

    #[test]
    fn test_image_height_at_least_one() {
        let config = looking_down_z().with_resolution(10, 100.0);
        let camera = Camera::initialize(config).unwrap();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let config = looking_down_z().with_lens(40.0, 2.0, 3.5);
        let a = Camera::initialize(config).unwrap();
        let b = Camera::initialize(*a.config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pixel_grid_geometry() {
        let camera = Camera::initialize(looking_down_z()).unwrap();

        // 90 degree fov at focus distance 1 spans [-1, 1] on both axes
        assert!(camera.pixel_delta_u.abs_diff_eq(Vec3::new(0.02, 0.0, 0.0), 1e-12));
        assert!(camera.pixel_delta_v.abs_diff_eq(Vec3::new(0.0, -0.02, 0.0), 1e-12));
        assert!(camera.pixel00_loc.abs_diff_eq(Vec3::new(-0.99, 0.99, -1.0), 1e-12));
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::initialize(looking_down_z()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().z < 0.0);
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_ray_stays_in_pixel_footprint() {
        let camera = Camera::initialize(looking_down_z()).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let ray = camera.get_ray(0, 0, &mut rng);
            // Hits the viewport plane z = -1 at t = 1
            let p = ray.at(1.0);
            assert!(p.x > -1.0 - 1e-12 && p.x < -0.98 + 1e-12);
            assert!(p.y > 0.98 - 1e-12 && p.y < 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_defocus_origin_within_disk() {
        let config = looking_down_z().with_lens(90.0, 10.0, 2.0);
        let camera = Camera::initialize(config).unwrap();
        let radius = 2.0 * (5.0_f64).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(1);

        let mut moved = false;
        for _ in 0..200 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let offset = ray.origin() - camera.center();
            assert!(offset.length() < radius + 1e-12);
            assert!(offset.z.abs() < 1e-12);
            moved |= offset.length() > 0.0;
        }
        assert!(moved);
    }

    #[test]
    fn test_invalid_configs() {
        let base = looking_down_z();

        let mut c = base;
        c.image_width = 0;
        assert_eq!(Camera::initialize(c), Err(CameraError::ZeroWidth));

        let c = base.with_quality(0, 10);
        assert_eq!(Camera::initialize(c), Err(CameraError::ZeroSamples));

        let c = base.with_resolution(100, 0.0);
        assert_eq!(Camera::initialize(c), Err(CameraError::InvalidAspectRatio(0.0)));

        let c = base.with_lens(180.0, 0.0, 1.0);
        assert_eq!(Camera::initialize(c), Err(CameraError::InvalidFov(180.0)));

        let c = base.with_lens(90.0, 0.0, 0.0);
        assert_eq!(Camera::initialize(c), Err(CameraError::InvalidFocusDistance(0.0)));

        let c = base.with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert_eq!(Camera::initialize(c), Err(CameraError::DegenerateView));

        let c = base.with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert_eq!(Camera::initialize(c), Err(CameraError::DegenerateUp));
    }

    #[test]
    fn test_oversized_images_rejected() {
        let base = looking_down_z();

        // A tiny aspect ratio would push the height past u32::MAX
        let c = base.with_resolution(1, 1e-12);
        assert!(matches!(Camera::initialize(c), Err(CameraError::ImageTooLarge { width: 1, .. })));

        let c = base.with_resolution(u32::MAX, 1e-9);
        assert!(matches!(Camera::initialize(c), Err(CameraError::ImageTooLarge { .. })));

        // Wide but one row tall still counts every pixel
        let c = base.with_resolution(u32::MAX, 1e12);
        assert!(matches!(Camera::initialize(c), Err(CameraError::ImageTooLarge { .. })));

        // Right at the limit is accepted
        let c = base.with_resolution(8192, 1.0);
        let camera = Camera::initialize(c).unwrap();
        assert_eq!(camera.image_height(), 8192);
    }

    #[test]
    fn test_zero_depth_is_valid() {
        let camera = Camera::initialize(looking_down_z().with_quality(4, 0)).unwrap();
        assert_eq!(camera.max_depth(), 0);
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let json = r#"{ "image_width": 320, "aspect_ratio": 2.0, "look_from": [0.0, 1.0, 4.0] }"#;
        let config: CameraConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.image_width, 320);
        assert_eq!(config.aspect_ratio, 2.0);
        assert_eq!(config.look_from, Vec3::new(0.0, 1.0, 4.0));
        assert_eq!(config.samples_per_pixel, CameraConfig::default().samples_per_pixel);
    }
}
