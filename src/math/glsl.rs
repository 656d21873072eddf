//! Scalar helpers with GLSL semantics, so CPU shading reads like the WGSL.

use glam::Vec3;

/// `mix(a, b, t)`; `t` is not clamped.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Component-wise `mix` for colours.
#[inline]
pub fn mix_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Hermite smoothstep between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(mix(0.3, 0.75, 0.0), 0.3);
        assert_eq!(mix(0.3, 0.75, 1.0), 0.75);
    }

    #[test]
    fn test_mix_extrapolates() {
        // GLSL mix does not clamp the factor
        assert!((mix(0.0, 1.0, 1.5) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.2, 0.8, 0.0), 0.0);
        assert_eq!(smoothstep(0.2, 0.8, 1.0), 1.0);
        assert!((smoothstep(0.2, 0.8, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mix_vec3_midpoint() {
        let c = mix_vec3(Vec3::ZERO, Vec3::ONE, 0.5);
        assert!((c - Vec3::splat(0.5)).length() < 1e-6);
    }
}
