use glam::{Mat4, Vec3};

use crate::shading::{BackgroundShading, GlassParams, LiquidShading};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Interleaved mesh vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

/// Per-mesh transform and clock
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub time: f32,
    pub _pad: [f32; 3],
}

impl ObjectUniform {
    pub fn new(model: Mat4, time: f32) -> Self {
        // Inverse-transpose keeps normals perpendicular under non-uniform scale
        let normal_matrix = model.inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            time,
            _pad: [0.0; 3],
        }
    }
}

/// Ambient plus directional lights, world space
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub ambient: [f32; 3],
    pub count: u32,
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LiquidUniform {
    pub deep_color: [f32; 3],
    pub wave_frequency: f32,
    pub shallow_color: [f32; 3],
    pub primary_amplitude: f32,
    pub secondary_amplitude: f32,
    pub primary_speed: f32,
    pub secondary_speed: f32,
    pub highlight_strength: f32,
}

impl From<&LiquidShading> for LiquidUniform {
    fn from(liquid: &LiquidShading) -> Self {
        Self {
            deep_color: liquid.deep_color.to_array(),
            wave_frequency: liquid.wave_frequency,
            shallow_color: liquid.shallow_color.to_array(),
            primary_amplitude: liquid.primary_amplitude,
            secondary_amplitude: liquid.secondary_amplitude,
            primary_speed: liquid.primary_speed,
            secondary_speed: liquid.secondary_speed,
            highlight_strength: liquid.highlight_strength,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackgroundUniform {
    pub bottom_color: [f32; 3],
    pub style: f32,
    pub top_color: [f32; 3],
    pub _pad: f32,
}

impl From<&BackgroundShading> for BackgroundUniform {
    fn from(bg: &BackgroundShading) -> Self {
        Self {
            bottom_color: bg.bottom_color.to_array(),
            style: bg.style.as_uniform(),
            top_color: bg.top_color.to_array(),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlassUniform {
    pub color: [f32; 3],
    pub transmission: f32,
    pub opacity: f32,
    pub ior: f32,
    pub thickness: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    /// 1.0 once the environment texture is bound, 0.0 before
    pub env_available: f32,
}

impl GlassUniform {
    pub fn new(params: &GlassParams, env_available: bool) -> Self {
        Self {
            color: params.color.to_array(),
            transmission: params.transmission,
            opacity: params.opacity,
            ior: params.ior,
            thickness: params.thickness,
            roughness: params.roughness,
            metalness: params.metalness,
            clearcoat: params.clearcoat,
            clearcoat_roughness: params.clearcoat_roughness,
            env_available: if env_available { 1.0 } else { 0.0 },
        }
    }
}

/// Object-space transform: translation, XYZ Euler rotation and scale
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = glam::Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_struct_sizes() {
        // Must match the WGSL struct layouts
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 144);
        assert_eq!(std::mem::size_of::<LiquidUniform>(), 48);
        assert_eq!(std::mem::size_of::<BackgroundUniform>(), 32);
        assert_eq!(std::mem::size_of::<GlassUniform>(), 48);
    }

    #[test]
    fn test_transform_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_negative_scale_mirrors_x() {
        let m = Transform::at(Vec3::new(0.0, 0.0, -6.0))
            .with_scale(Vec3::new(-1.0, 1.0, 1.0))
            .matrix();
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(-1.0, 0.0, -6.0)).length() < 1e-6);
    }
}
