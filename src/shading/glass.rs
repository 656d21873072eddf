use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{FragmentSample, ShadedFragment, ShadingModel, ShadingUniforms};
use crate::environment::EnvironmentMap;
use crate::lights::LightRig;
use crate::math::hex_to_rgb;

/// Physical-style parameters of the frosted glass backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassParams {
    pub color: Vec3,
    pub transmission: f32,
    pub opacity: f32,
    pub ior: f32,
    pub thickness: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl Default for GlassParams {
    fn default() -> Self {
        Self {
            color: hex_to_rgb(0xffffff),
            transmission: 0.9,
            opacity: 1.0,
            ior: 1.1,
            thickness: 2.0,
            roughness: 0.3,
            metalness: 0.0,
            clearcoat: 1.0,
            clearcoat_roughness: 0.2,
        }
    }
}

impl GlassParams {
    /// Reflectance at normal incidence from the index of refraction.
    pub fn f0(&self) -> f32 {
        ((self.ior - 1.0) / (self.ior + 1.0)).powi(2)
    }

    /// Schlick Fresnel of the base layer plus the clearcoat layer.
    pub fn fresnel(&self, cos_theta: f32) -> f32 {
        let grazing = (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5);
        let f0 = self.f0() * (1.0 - self.metalness) + self.metalness;
        let base = f0 + (1.0 - f0) * grazing;
        let coat = self.clearcoat * (0.04 + 0.96 * grazing) * (1.0 - self.clearcoat_roughness * 0.5);
        (base + coat).min(1.0)
    }
}

/// Glass shading evaluated against a light rig and an optional environment.
///
/// Unlike the liquid, fragments are expected in world orientation: `normal`
/// is a world normal and `view_position` is relative to the eye, unrotated.
pub struct GlassShading<'a> {
    pub params: GlassParams,
    pub lights: &'a LightRig,
    pub environment: Option<&'a EnvironmentMap>,
}

impl<'a> GlassShading<'a> {
    pub fn new(params: GlassParams, lights: &'a LightRig, environment: Option<&'a EnvironmentMap>) -> Self {
        Self {
            params,
            lights,
            environment,
        }
    }

    fn reflection(&self, direction: Vec3) -> Vec3 {
        match self.environment {
            Some(env) => env.sample(direction),
            None => self.lights.ambient(),
        }
    }
}

impl ShadingModel for GlassShading<'_> {
    fn shade(&self, fragment: &FragmentSample, _uniforms: &ShadingUniforms) -> ShadedFragment {
        let p = &self.params;
        let view = fragment.view_direction();

        // Seen from inside the inverted sphere the stored normal faces away.
        let mut normal = fragment.normal.normalize_or_zero();
        if view.dot(normal) > 0.0 {
            normal = -normal;
        }

        let cos_theta = (-view.dot(normal)).clamp(0.0, 1.0);
        let fresnel = p.fresnel(cos_theta);

        let diffuse = p.color * self.lights.irradiance(normal) * (1.0 - p.transmission) * (1.0 - p.metalness);
        let reflected = view - 2.0 * view.dot(normal) * normal;
        let specular = self.reflection(reflected) * fresnel * (1.0 - p.roughness * 0.5);
        let scatter = p.color * p.transmission * (1.0 - (-p.thickness * 0.05).exp());

        ShadedFragment {
            color: diffuse + specular + scatter,
            alpha: (p.opacity * (1.0 - p.transmission * (1.0 - fresnel))).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_f0_for_default_ior() {
        let p = GlassParams::default();
        // ((1.1 - 1) / 2.1)^2
        assert!((p.f0() - 0.002_267_6).abs() < 1e-6);
    }

    #[test]
    fn test_fresnel_grows_towards_grazing() {
        let p = GlassParams::default();
        assert!(p.fresnel(0.1) > p.fresnel(0.9));
        assert!(p.fresnel(0.0) <= 1.0);
    }

    #[test]
    fn test_head_on_glass_is_mostly_transparent() {
        let lights = LightRig::default();
        let glass = GlassShading::new(GlassParams::default(), &lights, None);
        let fragment = FragmentSample::new(Vec2::splat(0.5), Vec3::Z, Vec3::new(0.0, 0.0, -5.0));
        let shaded = glass.shade(&fragment, &ShadingUniforms::default());
        assert!(shaded.alpha < 0.25);
        assert!(shaded.alpha >= 0.0);
    }

    #[test]
    fn test_inward_normal_is_flipped() {
        let lights = LightRig::default();
        let glass = GlassShading::new(GlassParams::default(), &lights, None);
        let v = Vec3::new(0.0, 0.0, -5.0);
        let outward = glass.shade(&FragmentSample::new(Vec2::ZERO, Vec3::Z, v), &ShadingUniforms::default());
        let inward = glass.shade(&FragmentSample::new(Vec2::ZERO, -Vec3::Z, v), &ShadingUniforms::default());
        assert!((outward.color - inward.color).length() < 1e-6);
    }
}
