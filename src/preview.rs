//! CPU rendition of the scene for headless snapshots.
//!
//! Rays are cast per pixel against the analytic shapes (plane, backdrop
//! sphere, liquid sphere) and shaded with the same functions the GPU runs.
//! The liquid silhouette is the undisplaced sphere; the wave only moves the
//! shaded point. Layers are blended in draw order with colour and alpha
//! clamped first, as a UNORM render target would.

use std::f32::consts::PI;
use std::path::Path;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::core::Viewport;
use crate::error::{Result, SceneError};
use crate::math::to_rgba8;
use crate::shading::{
    FragmentSample, GlassShading, ShadedFragment, ShadingModel, ShadingUniforms, SurfaceSample,
};
use crate::state::SceneState;

/// RGBA8 image, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PreviewFrame {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| SceneError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Snapshot written to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    fn to_object(&self, inv_model: &Mat4) -> Ray {
        Ray {
            origin: inv_model.transform_point3(self.origin),
            direction: inv_model.transform_vector3(self.direction),
        }
    }
}

/// Nearest positive hit of a ray with a sphere of `radius` at the origin
fn intersect_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let a = ray.direction.dot(ray.direction);
    let half_b = ray.origin.dot(ray.direction);
    let c = ray.origin.dot(ray.origin) - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    [(-half_b - sqrt_d) / a, (-half_b + sqrt_d) / a]
        .into_iter()
        .find(|t| *t > 1e-4)
}

/// Texture coordinate of a point on the generated UV sphere
fn sphere_uv(normal: Vec3) -> Vec2 {
    let theta = normal.y.clamp(-1.0, 1.0).acos();
    let phi = normal.z.atan2(-normal.x).rem_euclid(2.0 * PI);
    Vec2::new(phi / (2.0 * PI), 1.0 - theta / PI)
}

fn blend(dst: Vec3, src: ShadedFragment) -> Vec3 {
    let alpha = src.alpha.clamp(0.0, 1.0);
    src.color.clamp(Vec3::ZERO, Vec3::ONE) * alpha + dst * (1.0 - alpha)
}

/// View-space fragment inputs for a point on the liquid sphere. Both the
/// normal and the view position come from the undisplaced surface; the wave
/// only moves the rasterised vertex.
fn liquid_fragment(sample: &SurfaceSample, model_view: &Mat4, normal_matrix: &Mat3) -> FragmentSample {
    FragmentSample::new(
        sample.uv,
        (*normal_matrix * sample.normal).normalize_or_zero(),
        model_view.transform_point3(sample.position),
    )
}

/// Render the current state into an RGBA8 frame.
///
/// `viewport` should match the state's so the camera aspect agrees with it.
pub fn render_preview(state: &SceneState, viewport: Viewport) -> PreviewFrame {
    let scene = state.scene();
    let camera = state.camera();
    let view = camera.view();
    let inv_view_proj = camera.view_proj().inverse();
    let environment = state.environment().map();

    let background_model = scene.background.transform.matrix();
    let background_inv = background_model.inverse();
    let (plane_w, plane_h) = {
        let bg = &state.config().background;
        (bg.width, bg.height)
    };
    let background_uniforms = state.background_uniforms();

    let backdrop = scene.backdrop.as_ref().map(|b| {
        let model = b.transform.matrix();
        (model, model.inverse(), state.config().backdrop.radius)
    });
    let glass = GlassShading::new(scene.glass, &scene.lights, environment);

    let liquid_model = state.liquid_model();
    let liquid_inv = liquid_model.inverse();
    let liquid_model_view = view * liquid_model;
    let liquid_normal_matrix = Mat3::from_mat4(liquid_model_view).inverse().transpose();
    let liquid_radius = state.config().sphere.radius;
    let liquid_uniforms = state.liquid_uniforms();

    let mut pixels = Vec::with_capacity(viewport.buffer_size());

    for y in 0..viewport.height {
        for x in 0..viewport.width {
            let ndc_x = (x as f32 + 0.5) / viewport.width as f32 * 2.0 - 1.0;
            let ndc_y = 1.0 - (y as f32 + 0.5) / viewport.height as f32 * 2.0;
            let near = inv_view_proj * glam::Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
            let far = inv_view_proj * glam::Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
            let near = near.xyz() / near.w;
            let far = far.xyz() / far.w;
            let ray = Ray {
                origin: camera.position,
                direction: (far - near).normalize_or_zero(),
            };

            let mut color = Vec3::ZERO;

            // Background plane, z = 0 in object space
            let local = ray.to_object(&background_inv);
            if local.direction.z.abs() > 1e-8 {
                let t = -local.origin.z / local.direction.z;
                let p = local.origin + local.direction * t;
                if t > 0.0 && p.x.abs() <= plane_w * 0.5 && p.y.abs() <= plane_h * 0.5 {
                    let uv = Vec2::new(p.x / plane_w + 0.5, p.y / plane_h + 0.5);
                    let fragment = FragmentSample::new(uv, Vec3::Z, Vec3::ZERO);
                    color = blend(
                        color,
                        scene.background_shading.shade(&fragment, &background_uniforms),
                    );
                }
            }

            // Glass backdrop, shaded in world orientation
            if let Some((model, inv, radius)) = &backdrop {
                let local = ray.to_object(inv);
                if let Some(t) = intersect_sphere(&local, *radius) {
                    let p = local.origin + local.direction * t;
                    let world = model.transform_point3(p);
                    let normal = (inv.transpose().transform_vector3(p / *radius)).normalize_or_zero();
                    let fragment = FragmentSample::new(sphere_uv(p / *radius), normal, world - camera.position);
                    color = blend(color, glass.shade(&fragment, &ShadingUniforms::default()));
                }
            }

            // Liquid sphere, shaded in view space
            let local = ray.to_object(&liquid_inv);
            if let Some(t) = intersect_sphere(&local, liquid_radius) {
                let p = local.origin + local.direction * t;
                let n = p / liquid_radius;
                let sample = SurfaceSample::new(p, n, sphere_uv(n));
                let fragment =
                    liquid_fragment(&sample, &liquid_model_view, &liquid_normal_matrix);
                color = blend(color, scene.liquid_shading.shade(&fragment, &liquid_uniforms));
            }

            pixels.extend_from_slice(&to_rgba8(color, 1.0));
        }
    }

    PreviewFrame {
        width: viewport.width,
        height: viewport.height,
        pixels,
    }
}
