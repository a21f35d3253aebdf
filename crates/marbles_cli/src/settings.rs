//! Render settings with the reference-scene defaults.

use marbles_math::Vec3;
use marbles_render::{RenderConfig, SceneConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Everything the renderer needs, loadable from a JSON file.
///
/// Defaults reproduce the reference configuration: a 1200-wide 16:9
/// frame looking at the scene origin from (13, 2, 3) through a narrow
/// 20 degree lens focused 10 units out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    pub aspect_ratio: f32,
    pub seed: u64,

    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    pub vfov: f32,
    pub defocus_angle: f32,
    pub focus_dist: f32,

    pub render: RenderConfig,
    pub scene: SceneConfig,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 1200,
            aspect_ratio: 16.0 / 9.0,
            seed: 0,
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 20.0,
            defocus_angle: 0.6,
            focus_dist: 10.0,
            render: RenderConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl RenderSettings {
    /// Image resolution, height derived from the aspect ratio.
    pub fn resolution(&self) -> (u32, u32) {
        let height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        (self.image_width, height)
    }

    /// The rng used for scene generation.
    pub fn scene_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution() {
        let settings = RenderSettings::default();
        assert_eq!(settings.resolution(), (1200, 675));
    }

    #[test]
    fn test_settings_json_round_trip() {
        let settings = RenderSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: RenderSettings = serde_json::from_str(&json).unwrap();

        assert_eq!(back.image_width, settings.image_width);
        assert_eq!(back.look_from, settings.look_from);
        assert_eq!(back.render.max_depth, settings.render.max_depth);
        assert_eq!(back.scene.budget, settings.scene.budget);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let partial: RenderSettings =
            serde_json::from_str(r#"{"image_width": 400, "seed": 7}"#).unwrap();
        assert_eq!(partial.image_width, 400);
        assert_eq!(partial.seed, 7);
        // Untouched fields keep the reference defaults
        assert_eq!(partial.vfov, 20.0);
        assert_eq!(partial.scene.exclusion_radius, 0.9);
    }
}
