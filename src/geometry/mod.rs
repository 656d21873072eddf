mod plane;
mod sphere;

pub use plane::create_plane;
pub use sphere::create_sphere;

use glam::{Vec2, Vec3};

use crate::shading::SurfaceSample;
use crate::types::Vertex;

/// Indexed triangle list ready for upload
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertices as shading inputs
    pub fn surface_samples(&self) -> impl Iterator<Item = SurfaceSample> + '_ {
        self.vertices.iter().map(|v| {
            SurfaceSample::new(
                Vec3::from_array(v.position),
                Vec3::from_array(v.normal),
                Vec2::from_array(v.uv),
            )
        })
    }
}
