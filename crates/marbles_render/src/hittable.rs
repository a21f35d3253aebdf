//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray};
use marbles_math::{Interval, Vec3};

/// Placeholder material for HitRecord::default(); black diffuse so a
/// record that was never filled in contributes nothing.
static PLACEHOLDER_MATERIAL: Material = Material::Lambertian { albedo: Vec3::ZERO };

/// Record of a ray-object intersection.
///
/// Created and consumed within a single intersection query; never
/// persisted past it.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &PLACEHOLDER_MATERIAL,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;
}

/// A list of hittable objects.
///
/// Grows only while the scene is being built; read-only during
/// shading, so it can be shared freely across render threads.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
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

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            // Tighten the upper bound to the closest hit found so far
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Sphere};
    use std::sync::Arc;

    fn gray() -> Arc<Material> {
        Arc::new(Material::Lambertian {
            albedo: Color::new(0.5, 0.5, 0.5),
        })
    }

    #[test]
    fn test_empty_list_never_hits() {
        let list = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(list.is_empty());
        assert!(!list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut list = HittableList::new();
        let far = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, gray());
        let near = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, gray());
        // Insertion order must not matter; the far sphere goes first
        list.add(Box::new(far));
        list.add(Box::new(near));
        assert_eq!(list.len(), 2);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // Nearest surface of the near sphere is at t=2
        assert!((rec.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_face_normal_flip() {
        let mut rec = HitRecord::default();
        let outward = Vec3::Y;

        // Ray moving down against the outward normal: front face
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        rec.set_face_normal(&ray, outward);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Y);

        // Ray moving up along the outward normal: back face, flipped
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        rec.set_face_normal(&ray, outward);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Y);
    }
}
