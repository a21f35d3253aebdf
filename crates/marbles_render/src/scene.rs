//! Procedural generation of the marbles scene.
//!
//! A large ground sphere, a jittered grid of small spheres with
//! randomly chosen materials, and three fixed large spheres. One zone
//! around the metal showcase sphere is kept clear, and the number of
//! grid candidates is capped so the exported scene stays small enough
//! for the external shader to handle.

use crate::{gen_f32, gen_range_f32, Color, HittableList, Material, Sphere};
use marbles_math::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for scene generation. `Default` is the reference
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Half-open candidate grid range on both horizontal axes
    pub grid_min: i32,
    pub grid_max: i32,
    /// Cell stride; coarser than 1 keeps the sphere count down
    pub grid_step: u32,
    /// Random offset applied to a candidate within its cell
    pub jitter: f32,
    /// Radius (and height) of the small spheres
    pub small_radius: f32,
    /// No small sphere may be placed within `exclusion_radius` of this
    /// point; it is reserved for a large foreground sphere
    pub exclusion_center: Vec3,
    pub exclusion_radius: f32,
    /// Hard cap on grid candidates; generation stops once spent
    pub budget: u32,
    /// Probability of a diffuse small sphere
    pub diffuse_weight: f32,
    /// Probability of a metal small sphere (the remainder is glass)
    pub metal_weight: f32,
    /// Metal fuzz is drawn from [0, max_fuzz)
    pub max_fuzz: f32,
    /// Index of refraction shared by every glass sphere
    pub glass_ir: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            grid_min: -11,
            grid_max: 11,
            grid_step: 3,
            jitter: 0.9,
            small_radius: 0.2,
            exclusion_center: Vec3::new(4.0, 0.2, 0.0),
            exclusion_radius: 0.9,
            budget: 120,
            diffuse_weight: 0.8,
            metal_weight: 0.15,
            max_fuzz: 0.5,
            glass_ir: 1.5,
        }
    }
}

/// The generated scene: every placed sphere in generation order
/// (ground first, then small spheres, then the three large ones).
pub struct GeneratedScene {
    pub spheres: Vec<Sphere>,
}

impl GeneratedScene {
    /// Build the renderable world containing every generated sphere.
    ///
    /// The spheres share their material instances with the generation
    /// list, so this is cheap.
    pub fn world(&self) -> HittableList {
        let mut world = HittableList::new();
        for sphere in &self.spheres {
            world.add(Box::new(sphere.clone()));
        }
        world
    }
}

/// Generate the scene.
///
/// All randomness comes from `rng`, so a seeded rng reproduces the
/// exact same scene.
pub fn generate(config: &SceneConfig, rng: &mut dyn RngCore) -> GeneratedScene {
    let mut spheres = Vec::new();

    let ground_material = Arc::new(Material::Lambertian {
        albedo: Color::new(0.5, 0.5, 0.5),
    });
    spheres.push(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground_material,
    ));

    let step = config.grid_step.max(1) as usize;
    let mut candidates = 0u32;

    'grid: for a in (config.grid_min..config.grid_max).step_by(step) {
        for b in (config.grid_min..config.grid_max).step_by(step) {
            candidates += 1;
            if candidates > config.budget {
                log::debug!("small-sphere budget of {} spent, stopping", config.budget);
                break 'grid;
            }

            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + config.jitter * gen_f32(rng),
                config.small_radius,
                b as f32 + config.jitter * gen_f32(rng),
            );

            // Keep the foreground zone clear
            if (center - config.exclusion_center).length() <= config.exclusion_radius {
                continue;
            }

            let material = if choose_mat < config.diffuse_weight {
                // The product of two random colors skews dark
                Arc::new(Material::Lambertian {
                    albedo: random_color(rng) * random_color(rng),
                })
            } else if choose_mat < config.diffuse_weight + config.metal_weight {
                Arc::new(Material::Metal {
                    albedo: random_color_in(rng, 0.5, 1.0),
                    fuzz: gen_range_f32(rng, 0.0, config.max_fuzz),
                })
            } else {
                Arc::new(Material::Dielectric {
                    ir: config.glass_ir,
                })
            };

            spheres.push(Sphere::new(center, config.small_radius, material));
        }
    }

    // The three showcase spheres: glass, diffuse, mirror
    spheres.push(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::Dielectric {
            ir: config.glass_ir,
        }),
    ));
    spheres.push(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        }),
    ));
    spheres.push(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        }),
    ));

    log::info!("generated scene with {} spheres", spheres.len());

    GeneratedScene { spheres }
}

fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}

fn random_color_in(rng: &mut dyn RngCore, min: f32, max: f32) -> Color {
    Color::new(
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
    )
}
