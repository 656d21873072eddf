use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{FragmentSample, ShadedFragment, ShadingModel, ShadingUniforms};
use crate::math::{mix_vec3, smoothstep};

/// Which gradient formula the background plane uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientStyle {
    /// Grey smoothstep gradient with a rolling vertical wave.
    #[default]
    Grey,
    /// Linear dark-to-light blue blend with a slow global sway.
    Blue,
}

impl GradientStyle {
    /// Value handed to the shader as a float selector.
    pub fn as_uniform(self) -> f32 {
        match self {
            GradientStyle::Grey => 0.0,
            GradientStyle::Blue => 1.0,
        }
    }
}

/// Opaque animated gradient on the background plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundShading {
    pub style: GradientStyle,
    pub bottom_color: Vec3,
    pub top_color: Vec3,
}

impl Default for BackgroundShading {
    fn default() -> Self {
        Self::grey()
    }
}

impl BackgroundShading {
    pub fn grey() -> Self {
        Self {
            style: GradientStyle::Grey,
            bottom_color: Vec3::splat(0.3),
            top_color: Vec3::splat(0.75),
        }
    }

    pub fn blue() -> Self {
        Self {
            style: GradientStyle::Blue,
            bottom_color: Vec3::new(0.1, 0.1, 0.3),
            top_color: Vec3::new(0.8, 0.9, 1.0),
        }
    }

    /// Blend factor between bottom and top colours.
    pub fn gradient_factor(&self, uv: Vec2, time: f32) -> f32 {
        match self.style {
            GradientStyle::Grey => {
                let wave = (uv.y * 5.0 + time * 0.5).sin() * 0.1;
                smoothstep(0.2, 0.8, uv.y + wave)
            }
            GradientStyle::Blue => uv.y + (time * 0.1).sin() * 0.1,
        }
    }

    pub fn color_at(&self, uv: Vec2, time: f32) -> Vec3 {
        mix_vec3(
            self.bottom_color,
            self.top_color,
            self.gradient_factor(uv, time),
        )
    }
}

impl ShadingModel for BackgroundShading {
    fn shade(&self, fragment: &FragmentSample, uniforms: &ShadingUniforms) -> ShadedFragment {
        ShadedFragment::opaque(self.color_at(fragment.uv, uniforms.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grey_extremes() {
        let bg = BackgroundShading::grey();
        // uv.y = 0 at t = 0: wave = 0, factor clamps to 0
        assert!((bg.color_at(Vec2::new(0.5, 0.0), 0.0) - Vec3::splat(0.3)).length() < 1e-6);
        // uv.y = 1 at t = 0: 1 + sin(5) * 0.1 = 0.904, above the upper edge
        assert!((bg.color_at(Vec2::new(0.5, 1.0), 0.0) - Vec3::splat(0.75)).length() < 1e-6);
    }

    #[test]
    fn test_grey_stays_within_palette() {
        let bg = BackgroundShading::grey();
        for i in 0..=20 {
            let c = bg.color_at(Vec2::new(0.0, i as f32 / 20.0), i as f32 * 0.37);
            assert!(c.x >= 0.3 - 1e-6 && c.x <= 0.75 + 1e-6);
        }
    }

    #[test]
    fn test_blue_is_linear_in_uv() {
        let bg = BackgroundShading::blue();
        assert!((bg.gradient_factor(Vec2::new(0.0, 0.25), 0.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_shade_is_opaque() {
        let bg = BackgroundShading::default();
        let fragment = FragmentSample::new(Vec2::splat(0.5), Vec3::Z, -Vec3::Z);
        assert_eq!(bg.shade(&fragment, &ShadingUniforms::at(3.0)).alpha, 1.0);
    }
}
