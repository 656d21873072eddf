//! Scene assembly: one builder driven by [`SceneConfig`], plus named presets.

mod lakeside;
mod minimal;
mod ocean;
mod studio;

pub use lakeside::create_lakeside_config;
pub use minimal::create_minimal_config;
pub use ocean::create_ocean_config;
pub use studio::create_studio_config;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::geometry::{create_plane, create_sphere, Mesh};
use crate::lights::LightRig;
use crate::shading::{BackgroundShading, GlassParams, LiquidShading};
use crate::types::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScenePreset {
    /// Liquid sphere, frosted glass bowl and grey gradient under an HDR sky
    #[default]
    Lakeside,
    /// Same layout lit by a key/fill rig, no environment map
    Studio,
    /// Low-poly sphere over the gradient only
    Minimal,
    /// Blue gradient variant
    Ocean,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 4] = [
        ScenePreset::Lakeside,
        ScenePreset::Studio,
        ScenePreset::Minimal,
        ScenePreset::Ocean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::Lakeside => "lakeside",
            ScenePreset::Studio => "studio",
            ScenePreset::Minimal => "minimal",
            ScenePreset::Ocean => "ocean",
        }
    }

    pub fn config(self) -> SceneConfig {
        match self {
            ScenePreset::Lakeside => create_lakeside_config(),
            ScenePreset::Studio => create_studio_config(),
            ScenePreset::Minimal => create_minimal_config(),
            ScenePreset::Ocean => create_ocean_config(),
        }
    }
}

impl fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenePreset {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SceneError::UnknownPreset(s.to_string()))
    }
}

/// A mesh placed in the world. Lower `render_order` draws first.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub transform: Transform,
    pub render_order: i32,
}

/// Everything the renderer needs, built once per configuration
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    pub liquid: SceneObject,
    pub liquid_shading: LiquidShading,
    pub backdrop: Option<SceneObject>,
    pub glass: GlassParams,
    pub background: SceneObject,
    pub background_shading: BackgroundShading,
    pub lights: LightRig,
}

impl Scene {
    /// Liquid transform with the driver's spin added to the configured rotation.
    pub fn liquid_transform(&self, spin: Vec3) -> Transform {
        Transform {
            rotation: self.liquid.transform.rotation + spin,
            ..self.liquid.transform
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.liquid.mesh.triangle_count()
            + self.backdrop.as_ref().map_or(0, |b| b.mesh.triangle_count())
            + self.background.mesh.triangle_count()
    }
}

pub fn build_scene(config: &SceneConfig) -> Result<Scene> {
    config.validate()?;

    let sphere = &config.sphere;
    let liquid = SceneObject {
        mesh: create_sphere(sphere.radius, sphere.width_segments, sphere.height_segments),
        transform: sphere.transform,
        render_order: 1,
    };

    let backdrop = config.backdrop.enabled.then(|| {
        let b = &config.backdrop;
        SceneObject {
            mesh: create_sphere(b.radius, b.width_segments, b.height_segments),
            transform: b.transform,
            render_order: 0,
        }
    });

    let bg = &config.background;
    let background = SceneObject {
        mesh: create_plane(bg.width, bg.height, 1, 1),
        transform: bg.transform,
        render_order: -1,
    };

    let scene = Scene {
        name: config.name.clone(),
        liquid,
        liquid_shading: sphere.liquid,
        backdrop,
        glass: config.backdrop.glass,
        background,
        background_shading: bg.shading,
        lights: config.lights.clone(),
    };

    log::info!(
        "Scene '{}' built: {} triangles{}",
        scene.name,
        scene.triangle_count(),
        if scene.backdrop.is_some() { ", with backdrop" } else { "" }
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ScenePreset::ALL {
            assert_eq!(preset.name().parse::<ScenePreset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!("forest".parse::<ScenePreset>(), Err(SceneError::UnknownPreset(_))));
    }

    #[test]
    fn test_every_preset_builds() {
        for preset in ScenePreset::ALL {
            let scene = build_scene(&preset.config()).unwrap();
            assert_eq!(scene.name, preset.name());
        }
    }

    #[test]
    fn test_spin_adds_to_base_rotation() {
        let mut config = create_minimal_config();
        config.sphere.transform.rotation = Vec3::new(0.1, 0.0, 0.0);
        let scene = build_scene(&config).unwrap();
        let t = scene.liquid_transform(Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(t.rotation, Vec3::new(0.1, 0.5, 0.0));
    }
}
