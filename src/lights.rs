use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::{LightsUniform, MAX_DIRECTIONAL_LIGHTS};

/// A light infinitely far away. `direction` is the way the light travels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color,
            intensity,
        }
    }

    /// Radiance arriving at a surface with normal `normal`.
    pub fn irradiance(&self, normal: Vec3) -> Vec3 {
        self.color * self.intensity * normal.dot(-self.direction).max(0.0)
    }
}

/// Ambient term plus up to [`MAX_DIRECTIONAL_LIGHTS`] directional lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub directional: Vec<DirectionalLight>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::ambient_only()
    }
}

impl LightRig {
    /// Shader materials ignore lights; the backdrop only sees a soft ambient.
    pub fn ambient_only() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.6,
            directional: Vec::new(),
        }
    }

    /// Warm key light from the upper left, cool fill from the right.
    pub fn studio() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.35,
            directional: vec![
                DirectionalLight::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(1.0, 0.95, 0.85), 1.1),
                DirectionalLight::new(Vec3::new(-1.0, -0.2, -0.5), Vec3::new(0.7, 0.8, 1.0), 0.4),
            ],
        }
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient_color * self.ambient_intensity
    }

    /// Total diffuse irradiance for `normal`.
    pub fn irradiance(&self, normal: Vec3) -> Vec3 {
        self.directional
            .iter()
            .take(MAX_DIRECTIONAL_LIGHTS)
            .fold(self.ambient(), |acc, light| acc + light.irradiance(normal))
    }

    /// Pack for the GPU; lights beyond the limit are dropped.
    pub fn to_uniform(&self) -> LightsUniform {
        let mut uniform = LightsUniform {
            ambient: self.ambient().to_array(),
            count: self.directional.len().min(MAX_DIRECTIONAL_LIGHTS) as u32,
            directions: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            colors: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        };

        for (i, light) in self.directional.iter().take(MAX_DIRECTIONAL_LIGHTS).enumerate() {
            uniform.directions[i] = light.direction.extend(0.0).to_array();
            uniform.colors[i] = (light.color * light.intensity).extend(0.0).to_array();
        }

        uniform
    }
}
