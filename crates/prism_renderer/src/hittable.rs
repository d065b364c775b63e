//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::Material;
use prism_math::{Interval, Point3, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point, shared with the primitive
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against
    /// the ray.
    ///
    /// `outward_normal` is assumed to have unit length.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3, material: &'a Material) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly within `ray_t`.
    ///
    /// Returns the nearest such hit, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// A list of hittable objects.
///
/// Iteration order is insertion order, which only matters for exact ties in
/// `t`: the earlier object wins.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Sphere};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<Material> {
        Arc::new(Material::lambertian(Color::splat(0.5)))
    }

    #[test]
    fn test_set_face_normal_outside() {
        let mat = Material::lambertian(Color::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = HitRecord::new(&ray, 4.0, Vec3::Z, &mat);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_set_face_normal_inside() {
        let mat = Material::lambertian(Color::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::new(&ray, 1.0, Vec3::Z, &mat);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);

        // Re-orienting against a ray from outside flips both together
        let outside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        rec.set_face_normal(&outside, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_set_face_normal_opposes_ray() {
        let mat = Material::lambertian(Color::ONE);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let dir = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let n = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            if n.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(Vec3::ZERO, dir);
            let rec = HitRecord::new(&ray, 1.0, n.normalize(), &mat);
            assert!(ray.direction().dot(rec.normal) <= 0.0);
        }
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(world.is_empty());
        assert!(world.hit(&ray, Interval::new(0.001, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_list_add_and_clear() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(Vec3::ZERO, 1.0, grey())));
        world.add(Arc::new(Sphere::new(Vec3::X * 3.0, 1.0, grey())));
        assert_eq!(world.len(), 2);

        world.clear();
        assert!(world.is_empty());
    }

    #[test]
    fn test_list_returns_closest() {
        let near_mat = grey();
        let far_mat = Arc::new(Material::metal(Color::ONE, 0.0));

        let mut world = HittableList::new();
        // Insert the far sphere first so the shrinking bound is exercised
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, far_mat)));
        world.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, near_mat.clone())));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = world.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();

        assert!((rec.t - 2.0).abs() < 1e-12);
        assert!(std::ptr::eq(rec.material, near_mat.as_ref()));
    }

    #[test]
    fn test_list_matches_naive_scan() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut world = HittableList::new();
        let mut spheres = Vec::new();

        for _ in 0..40 {
            let center = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let sphere = Arc::new(Sphere::new(center, rng.gen_range(0.2..2.0), grey()));
            spheres.push(sphere.clone());
            world.add(sphere);
        }

        let ray_t = Interval::new(0.001, f64::INFINITY);
        for _ in 0..300 {
            let dir = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let ray = Ray::new(Vec3::new(0.0, 0.0, 15.0), dir);

            let naive = spheres
                .iter()
                .filter_map(|s| s.hit(&ray, ray_t))
                .map(|rec| rec.t)
                .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))));

            let listed = world.hit(&ray, ray_t).map(|rec| rec.t);
            assert_eq!(listed, naive);
        }
    }
}
