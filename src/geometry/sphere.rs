use std::f32::consts::PI;

use super::Mesh;
use crate::types::Vertex;

/// UV sphere centred on the origin.
///
/// Produces `(width_segments + 1) * (height_segments + 1)` vertices with a
/// duplicated seam column, `uv = (u, 1 - v)` with the pole rows shifted half
/// a segment, and no degenerate triangles at the poles.
pub fn create_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let row_len = width_segments + 1;
    let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;

        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        let theta = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * PI * 2.0;

            let position = [
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ];
            let normal = glam::Vec3::from_array(position).normalize_or_zero();

            vertices.push(Vertex::new(position, normal.to_array(), [u + u_offset, 1.0 - v]));
        }
    }

    let index = |ix: u32, iy: u32| iy * row_len + ix;
    let mut indices = Vec::with_capacity((width_segments * (height_segments * 2 - 2) * 3) as usize);

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = index(ix + 1, iy);
            let b = index(ix, iy);
            let c = index(ix, iy + 1);
            let d = index(ix + 1, iy + 1);

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_sphere_counts() {
        let mesh = create_sphere(2.0, 16, 8);
        assert_eq!(mesh.vertex_count(), 17 * 9);
        assert_eq!(mesh.triangle_count(), 16 * (8 * 2 - 2));
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = create_sphere(2.0, 12, 6);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 2.0).abs() < 1e-4, "vertex off radius: {}", len);
        }
    }

    #[test]
    fn test_sphere_poles() {
        let mesh = create_sphere(1.0, 8, 4);
        let top = mesh.vertices[0];
        let bottom = mesh.vertices[mesh.vertex_count() - 1];
        assert!((top.position[1] - 1.0).abs() < 1e-6);
        assert!((bottom.position[1] + 1.0).abs() < 1e-6);
        assert_eq!(top.uv[1], 1.0);
        assert_eq!(bottom.uv[1], 0.0);
    }

    #[test]
    fn test_sphere_clamps_segments() {
        let mesh = create_sphere(1.0, 0, 0);
        assert_eq!(mesh.vertex_count(), 4 * 3);
    }
}
