use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::types::CameraUniform;

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl Camera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: config.position,
            target: config.target,
            fov_y: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            aspect: 1.0,
            projection: Mat4::IDENTITY,
        };
        camera.on_resize(width, height);
        camera
    }

    /// Keep the aspect ratio equal to the viewport's. Zero sizes (minimized
    /// windows) leave the camera untouched.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection();
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        let view = self.view();
        CameraUniform {
            view_proj: (self.projection * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_aspect() {
        let camera = Camera::new(&CameraConfig::default(), 800, 600);
        assert_eq!(camera.aspect(), 800.0 / 600.0);
    }

    #[test]
    fn test_zero_height_is_ignored() {
        let mut camera = Camera::new(&CameraConfig::default(), 800, 600);
        camera.on_resize(1024, 0);
        assert_eq!(camera.aspect(), 800.0 / 600.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(&CameraConfig::default(), 640, 480);
        let clip = camera.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
