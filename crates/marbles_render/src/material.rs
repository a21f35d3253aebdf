//! Materials as a closed set of scattering behaviors.

use crate::{gen_f32, hittable::HitRecord, Ray};
use marbles_math::Vec3;
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter: the bounced ray and the color
/// multiplier applied to whatever light it gathers.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    pub attenuation: Color,
    pub ray: Ray,
}

/// The material kinds a sphere can carry.
///
/// One material instance may be shared by many spheres (via `Arc`);
/// materials are immutable once created and never know which spheres
/// reference them.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Diffuse surface with the given albedo.
    Lambertian { albedo: Color },
    /// Reflective surface. `fuzz` of 0 is a perfect mirror; larger
    /// values perturb the reflection. Expected in [0, 1] but not
    /// clamped, the serializer distinguishes exact zero.
    Metal { albedo: Color, fuzz: f32 },
    /// Transparent surface with the given index of refraction.
    Dielectric { ir: f32 },
}

impl Material {
    /// Scatter an incoming ray at a hit point.
    ///
    /// Returns `Some(Scatter)` if the ray bounces, or `None` if it is
    /// absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if scatter_direction.length_squared() < 1e-8 {
                    scatter_direction = rec.normal;
                }

                Some(Scatter {
                    attenuation: albedo,
                    ray: Ray::new(rec.p, scatter_direction),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let scattered_dir = reflected + fuzz * random_in_unit_sphere(rng);

                // Only scatter if the bounced ray leaves the surface;
                // a fuzzed reflection into the surface is absorbed.
                if scattered_dir.dot(rec.normal) > 0.0 {
                    Some(Scatter {
                        attenuation: albedo,
                        ray: Ray::new(rec.p, scattered_dir),
                    })
                } else {
                    None
                }
            }
            Material::Dielectric { ir } => {
                // Glass absorbs nothing
                let attenuation = Color::ONE;
                let refraction_ratio = if rec.front_face { 1.0 / ir } else { ir };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction =
                    if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                        reflect(unit_direction, rec.normal)
                    } else {
                        refract(unit_direction, rec.normal, refraction_ratio)
                    };

                Some(Scatter {
                    attenuation,
                    ray: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Generate a random vector inside the unit sphere.
pub(crate) fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if v.length_squared() < 1.0 {
            return v;
        }
    }
}

/// Generate a random unit vector on the unit sphere.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for a uniform distribution on the sphere
    loop {
        let v = random_in_unit_sphere(rng);
        let len_sq = v.length_squared();
        if len_sq > 1e-6 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn front_face_record(normal: Vec3) -> HitRecord<'static> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            t: 1.0,
            front_face: true,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let material = Material::Lambertian {
            albedo: Color::new(0.8, 0.3, 0.3),
        };
        let rec = front_face_record(Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.attenuation, Color::new(0.8, 0.3, 0.3));
            // Diffuse bounces always leave the surface
            assert!(scatter.ray.direction().length_squared() > 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Material::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        };
        let rec = front_face_record(Vec3::Y);
        // 45 degree incoming ray in the XZ=0 plane
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(7);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scatter.ray.direction().normalize() - expected).length() < 1e-6);
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        let material = Material::Metal {
            albedo: Color::ONE,
            fuzz: 0.0,
        };
        // A record whose normal agrees with the incoming direction:
        // the reflection points into the surface and must be absorbed.
        let rec = front_face_record(Vec3::new(0.0, -1.0, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(7);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_dielectric_always_scatters() {
        let material = Material::Dielectric { ir: 1.5 };
        let mut rng = StdRng::seed_from_u64(7);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.1));

        // Entering and exiting hits both produce a ray, never absorption
        for front_face in [true, false] {
            for _ in 0..100 {
                let rec = HitRecord {
                    normal: Vec3::Y,
                    front_face,
                    t: 1.0,
                    ..HitRecord::default()
                };
                let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
                assert_eq!(scatter.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_random_in_unit_sphere_stays_inside() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = random_in_unit_sphere(&mut rng);
            assert!(v.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }
}
