//! Marbles - CPU path tracing over procedural sphere scenes.
//!
//! A Monte Carlo path tracer for the classic "random marbles" scene:
//! a ground sphere, a jittered grid of small spheres with randomly
//! chosen materials, and three fixed large spheres. The generated
//! scene can be rendered directly or exported as GLSL constant tables
//! for an external shader-based renderer.

mod bucket;
mod camera;
mod hittable;
mod material;
mod output;
mod render;
mod scene;
mod shade;
mod sphere;
mod tables;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Material, Scatter};
pub use output::{save_png, save_ppm, write_ppm, OutputError};
pub use render::{color_to_rgb, linear_to_gamma, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{generate, GeneratedScene, SceneConfig};
pub use shade::{ray_color, sky_gradient};
pub use sphere::Sphere;
pub use tables::{MaterialKind, MaterialRef, SceneTables};

/// Re-export Vec3 and common math types from marbles_math
pub use marbles_math::{Interval, Ray, Vec3};

use rand::RngCore;

/// Draw a uniform f32 in [0, 1) from a dynamically dispatched rng.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rand::Rng::gen(rng)
}

/// Draw a uniform f32 in [min, max) from a dynamically dispatched rng.
#[inline]
pub fn gen_range_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    rand::Rng::gen_range(rng, min..max)
}
