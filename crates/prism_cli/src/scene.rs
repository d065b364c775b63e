//! Built-in scenes and their default cameras.

use std::sync::Arc;

use prism_math::{Point3, Vec3};
use prism_renderer::{CameraConfig, Color, HittableList, Material, Sphere};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cli::SceneKind;

/// Build the requested scene along with the camera it is framed for.
pub fn build_scene(kind: SceneKind, seed: u64) -> (HittableList, CameraConfig) {
    let world = match kind {
        SceneKind::Cover => cover_scene(seed),
        SceneKind::Quick => quick_scene(),
    };
    log::debug!("Built {:?} scene with {} spheres", kind, world.len());
    (world, default_camera())
}

/// Wide shot of the feature spheres with a shallow depth of field.
pub fn default_camera() -> CameraConfig {
    CameraConfig::new()
        .with_resolution(1200, 16.0 / 9.0)
        .with_quality(500, 50)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
}

fn add_sphere(world: &mut HittableList, center: Point3, radius: f64, material: Arc<Material>) {
    world.add(Arc::new(Sphere::new(center, radius, material)));
}

/// Ground plus the glass, diffuse and mirror feature spheres.
fn quick_scene() -> HittableList {
    let mut world = HittableList::new();
    add_ground(&mut world);
    add_feature_spheres(&mut world);
    world
}

/// The quick scene surrounded by a jittered grid of small spheres.
fn cover_scene(seed: u64) -> HittableList {
    let mut world = HittableList::new();
    let mut rng = StdRng::seed_from_u64(seed);

    add_ground(&mut world);

    // Shared by every small glass sphere
    let glass = Arc::new(Material::dielectric(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            // Keep clear of the mirror sphere
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                Arc::new(Material::lambertian(albedo))
            } else if choose_mat < 0.95 {
                let albedo = random_color(&mut rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Material::metal(albedo, fuzz))
            } else {
                glass.clone()
            };

            add_sphere(&mut world, center, 0.2, material);
        }
    }

    add_feature_spheres(&mut world);
    world
}

fn add_ground(world: &mut HittableList) {
    let ground = Arc::new(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    add_sphere(world, Point3::new(0.0, -1000.0, 0.0), 1000.0, ground);
}

fn add_feature_spheres(world: &mut HittableList) {
    add_sphere(world, Point3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Material::dielectric(1.5)));
    add_sphere(
        world,
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::lambertian(Color::new(0.4, 0.2, 0.1))),
    );
    add_sphere(
        world,
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    );
}

fn random_color(rng: &mut StdRng, min: f64, max: f64) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}
