use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{FragmentSample, ShadedFragment, ShadingModel, ShadingUniforms, SurfaceSample};
use crate::math::mix_vec3;

/// Deformed "liquid" surface: sine/cosine vertex waves, a drifting base
/// colour, Fresnel rim and a soft moving highlight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidShading {
    pub deep_color: Vec3,
    pub shallow_color: Vec3,
    pub wave_frequency: f32,
    pub primary_amplitude: f32,
    pub secondary_amplitude: f32,
    pub primary_speed: f32,
    pub secondary_speed: f32,
    pub highlight_strength: f32,
}

impl Default for LiquidShading {
    fn default() -> Self {
        Self {
            deep_color: Vec3::new(0.0, 0.3, 0.8),
            shallow_color: Vec3::new(0.2, 0.6, 1.0),
            wave_frequency: 6.0,
            primary_amplitude: 0.08,
            secondary_amplitude: 0.04,
            primary_speed: 1.5,
            secondary_speed: 1.2,
            highlight_strength: 0.55,
        }
    }
}

impl LiquidShading {
    /// Scalar offset along the normal for an object-space position.
    pub fn wave(&self, position: Vec3, time: f32) -> f32 {
        (position.x * self.wave_frequency + time * self.primary_speed).sin()
            * self.primary_amplitude
            + (position.y * self.wave_frequency + time * self.secondary_speed).cos()
                * self.secondary_amplitude
    }

    /// Bound on `|wave|` for these parameters.
    pub fn max_amplitude(&self) -> f32 {
        self.primary_amplitude.abs() + self.secondary_amplitude.abs()
    }

    /// Blend factor between the deep and shallow colours.
    pub fn base_blend(time: f32) -> f32 {
        (time * 0.3).sin() * 0.5 + 0.5
    }

    pub fn base_color(&self, time: f32) -> Vec3 {
        mix_vec3(self.deep_color, self.shallow_color, Self::base_blend(time))
    }

    /// Rim term; `view_dir` points from the eye to the fragment.
    pub fn fresnel(view_dir: Vec3, normal: Vec3) -> f32 {
        (1.0 - view_dir.dot(normal)).powi(2) * 0.5
    }

    pub fn highlight(&self, uv: Vec2, time: f32) -> f32 {
        let drift = (time * 0.3).sin() * 0.05;
        let distance = (uv - Vec2::splat(0.5) + Vec2::splat(drift)).length();
        (1.0 - distance).powi(8) * self.highlight_strength
    }

    /// Opacity; exceeds 1.0 for part of every cycle.
    pub fn alpha(time: f32) -> f32 {
        0.9 + (time * 0.5).sin() * 0.5
    }
}

impl ShadingModel for LiquidShading {
    fn displace(&self, sample: &SurfaceSample, uniforms: &ShadingUniforms) -> Vec3 {
        // The normal is not updated after displacement.
        sample.position + sample.normal * self.wave(sample.position, uniforms.time)
    }

    fn shade(&self, fragment: &FragmentSample, uniforms: &ShadingUniforms) -> ShadedFragment {
        let t = uniforms.time;
        let fresnel = Self::fresnel(fragment.view_direction(), fragment.normal);
        let highlight = Vec3::ONE * self.highlight(fragment.uv, t);

        ShadedFragment {
            color: self.base_color(t) + highlight + Vec3::splat(fresnel * 0.5),
            alpha: Self::alpha(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_wave_at_origin() {
        // sin(0) * 0.08 + cos(0) * 0.04
        let liquid = LiquidShading::default();
        assert!(close(liquid.wave(Vec3::ZERO, 0.0), 0.04));
    }

    #[test]
    fn test_default_amplitude_bound() {
        assert!(close(LiquidShading::default().max_amplitude(), 0.12));
    }

    #[test]
    fn test_displace_moves_along_normal() {
        let liquid = LiquidShading::default();
        let sample = SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec2::ZERO);
        let displaced = liquid.displace(&sample, &ShadingUniforms::at(0.0));
        assert!(close(displaced.x, 0.0));
        assert!(close(displaced.y, 0.0));
        assert!(close(displaced.z, 0.04));
    }

    #[test]
    fn test_displace_keeps_unnormalized_scale() {
        // A longer normal scales the offset; nothing renormalizes it.
        let liquid = LiquidShading::default();
        let sample = SurfaceSample::new(Vec3::ZERO, Vec3::Z * 2.0, Vec2::ZERO);
        let displaced = liquid.displace(&sample, &ShadingUniforms::at(0.0));
        assert!(close(displaced.z, 0.08));
    }

    #[test]
    fn test_base_color_midpoint_at_zero() {
        let liquid = LiquidShading::default();
        let mid = (liquid.deep_color + liquid.shallow_color) * 0.5;
        assert!((liquid.base_color(0.0) - mid).length() < 1e-6);
    }

    #[test]
    fn test_fresnel_head_on_and_grazing() {
        // Eye looking down -Z at a surface facing +Z
        assert!(close(LiquidShading::fresnel(-Vec3::Z, Vec3::Z), 2.0));
        assert!(close(LiquidShading::fresnel(-Vec3::Z, Vec3::X), 0.5));
    }

    #[test]
    fn test_highlight_peaks_at_center() {
        let liquid = LiquidShading::default();
        assert!(close(liquid.highlight(Vec2::splat(0.5), 0.0), 0.55));
        assert!(liquid.highlight(Vec2::ZERO, 0.0) < 0.01);
    }

    #[test]
    fn test_shade_is_unclamped() {
        let liquid = LiquidShading::default();
        let fragment = FragmentSample::new(Vec2::splat(0.5), Vec3::Z, Vec3::new(0.0, 0.0, -5.0));
        let shaded = liquid.shade(&fragment, &ShadingUniforms::at(std::f32::consts::PI));
        assert!(shaded.color.max_element() > 1.0);
        assert!(shaded.alpha > 1.0);
    }
}
