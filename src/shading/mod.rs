//! CPU reference of the procedural shading model.
//!
//! Every material here has a WGSL twin under `src/shaders/`; the functions in
//! this module are the tested contract and the shaders mirror them.

mod background;
mod glass;
mod liquid;

pub use background::{BackgroundShading, GradientStyle};
pub use glass::{GlassParams, GlassShading};
pub use liquid::LiquidShading;

use glam::{Vec2, Vec3};

/// Per-vertex input supplied by mesh geometry (object space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl SurfaceSample {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position, normal, uv }
    }
}

/// Per-pixel input produced by rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSample {
    pub uv: Vec2,
    /// Interpolated normal in view space.
    pub normal: Vec3,
    /// Fragment position in view space (camera at the origin).
    pub view_position: Vec3,
}

impl FragmentSample {
    pub fn new(uv: Vec2, normal: Vec3, view_position: Vec3) -> Self {
        Self {
            uv,
            normal,
            view_position,
        }
    }

    /// Direction from the camera towards the fragment.
    pub fn view_direction(&self) -> Vec3 {
        self.view_position.normalize_or_zero()
    }
}

/// Uniform inputs shared by a draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShadingUniforms {
    pub time: f32,
}

impl ShadingUniforms {
    pub fn at(time: f32) -> Self {
        Self { time }
    }
}

/// Colour and opacity of one fragment. Neither is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedFragment {
    pub color: Vec3,
    pub alpha: f32,
}

impl ShadedFragment {
    pub fn opaque(color: Vec3) -> Self {
        Self { color, alpha: 1.0 }
    }
}

/// A material's vertex and fragment stages.
pub trait ShadingModel {
    /// Object-space position handed to projection. Defaults to pass-through.
    fn displace(&self, sample: &SurfaceSample, _uniforms: &ShadingUniforms) -> Vec3 {
        sample.position
    }

    fn shade(&self, fragment: &FragmentSample, uniforms: &ShadingUniforms) -> ShadedFragment;
}
