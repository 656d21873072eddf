use super::Mesh;
use crate::types::Vertex;

/// Plane in the XY plane facing +Z, centred on the origin.
pub fn create_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let grid_x = width_segments.max(1);
    let grid_y = height_segments.max(1);
    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;

    let mut vertices = Vec::with_capacity(((grid_x + 1) * (grid_y + 1)) as usize);
    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height * 0.5;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width * 0.5;
            vertices.push(Vertex::new(
                [x, -y, 0.0],
                [0.0, 0.0, 1.0],
                [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
            ));
        }
    }

    let row_len = grid_x + 1;
    let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + row_len * iy;
            let b = ix + row_len * (iy + 1);
            let c = (ix + 1) + row_len * (iy + 1);
            let d = (ix + 1) + row_len * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh { vertices, indices }
}
