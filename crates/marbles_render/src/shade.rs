//! Core shading: the color gathered along a ray.

use crate::{Color, HitRecord, Hittable, Ray};
use marbles_math::Interval;
use rand::RngCore;

/// Minimum hit distance; rejects self-intersections with the surface
/// a bounce just left ("shadow acne").
const T_MIN: f32 = 0.001;

/// Compute the color seen along a ray.
///
/// Bounces the ray through the scene up to `depth` times, multiplying
/// the throughput by each surface's attenuation. A ray that escapes
/// the scene picks up the sky gradient; an absorbed ray or an
/// exhausted bounce budget gathers no light and yields black. Neither
/// outcome is an error.
///
/// The bounce loop carries an explicit countdown rather than
/// recursing, so termination never depends on stack limits.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut throughput = Color::ONE;
    let mut current = *ray;

    for _ in 0..depth {
        let mut rec = HitRecord::default();
        if !world.hit(&current, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
            return throughput * sky_gradient(&current);
        }

        match rec.material.scatter(&current, &rec, rng) {
            Some(scatter) => {
                throughput *= scatter.attenuation;
                current = scatter.ray;
            }
            // Absorbed
            None => return Color::ZERO,
        }
    }

    // Bounce budget exhausted
    Color::ZERO
}

/// Background gradient: white at the horizon blending to sky blue
/// overhead, keyed on the vertical component of the ray direction.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}
