//! Scene configuration record.
//!
//! Every field has a default; the defaults describe the lakeside scene, so a
//! JSON file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::lights::LightRig;
use crate::shading::{BackgroundShading, GlassParams, LiquidShading};
use crate::types::Transform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub transform: Transform,
    pub liquid: LiquidShading,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            width_segments: 128,
            height_segments: 128,
            transform: Transform::default(),
            liquid: LiquidShading::default(),
        }
    }
}

/// Inverted sphere behind the liquid, shaded as frosted glass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub enabled: bool,
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub transform: Transform,
    pub glass: GlassParams,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 10.0,
            width_segments: 128,
            height_segments: 128,
            transform: Transform::at(Vec3::new(0.0, 0.0, -6.0)).with_scale(Vec3::new(-1.0, 1.0, 1.0)),
            glass: GlassParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub width: f32,
    pub height: f32,
    pub transform: Transform,
    pub shading: BackgroundShading,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            transform: Transform::at(Vec3::new(0.0, 0.0, -12.0)).with_scale(Vec3::new(5.0, 5.0, 1.0)),
            shading: BackgroundShading::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

/// Per-tick steps of the animation driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub liquid_step: f32,
    pub background_step: f32,
    /// Radians per tick about X, Y and Z
    pub rotation_step: Vec3,
    /// Optional period bounding both time uniforms; unbounded when absent
    pub time_wrap: Option<f32>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            liquid_step: 0.05,
            background_step: 0.01,
            rotation_step: Vec3::new(0.0005, 0.0099, 0.0),
            time_wrap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Equirectangular HDR image; `None` disables the environment
    pub path: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("textures/lakeside_4k.hdr")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    pub sphere: SphereConfig,
    pub backdrop: BackdropConfig,
    pub background: BackgroundConfig,
    pub lights: LightRig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub environment: EnvironmentConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "lakeside".to_string(),
            sphere: SphereConfig::default(),
            backdrop: BackdropConfig::default(),
            background: BackgroundConfig::default(),
            lights: LightRig::default(),
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded scene config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let check = |ok: bool, msg: &str| {
            if ok {
                Ok(())
            } else {
                Err(SceneError::InvalidConfig(msg.to_string()))
            }
        };

        check(self.sphere.radius > 0.0, "sphere.radius must be positive")?;
        check(
            self.sphere.width_segments >= 3 && self.sphere.height_segments >= 2,
            "sphere needs at least 3x2 segments",
        )?;
        if self.backdrop.enabled {
            check(self.backdrop.radius > 0.0, "backdrop.radius must be positive")?;
            check(
                self.backdrop.width_segments >= 3 && self.backdrop.height_segments >= 2,
                "backdrop needs at least 3x2 segments",
            )?;
            check(self.backdrop.glass.ior >= 1.0, "backdrop.glass.ior must be at least 1")?;
        }
        check(
            self.background.width > 0.0 && self.background.height > 0.0,
            "background plane must have a positive size",
        )?;
        check(
            self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0,
            "camera.fov_degrees must be in (0, 180)",
        )?;
        check(
            self.camera.near > 0.0 && self.camera.far > self.camera.near,
            "camera needs 0 < near < far",
        )?;
        check(
            self.camera.position != self.camera.target,
            "camera.position and camera.target must differ",
        )?;
        check(
            self.animation.liquid_step >= 0.0 && self.animation.background_step >= 0.0,
            "clock steps must be non-negative",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_radius() {
        let mut config = SceneConfig::default();
        config.sphere.radius = 0.0;
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_disabled_backdrop_skips_its_checks() {
        let mut config = SceneConfig::default();
        config.backdrop.enabled = false;
        config.backdrop.radius = -1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SceneConfig = serde_json::from_str(r#"{ "sphere": { "radius": 1.5 } }"#).unwrap();
        assert_eq!(config.sphere.radius, 1.5);
        assert_eq!(config.sphere.width_segments, 128);
        assert_eq!(config.animation, AnimationConfig::default());
    }
}
