//! Explicit per-run context: scene, camera, animation and environment.
//!
//! The host event loop owns one [`SceneState`] and calls
//! [`on_resize`](SceneState::on_resize) and [`tick`](SceneState::tick);
//! renderers read from it and never write back.

use glam::Mat4;

use crate::animation::AnimationDriver;
use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::core::Viewport;
use crate::environment::{EnvironmentLoader, EnvironmentStatus};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::scenes::{build_scene, Scene};
use crate::shading::ShadingUniforms;

/// Result of one driver tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub frame: FrameInfo,
    /// True on the one tick where the environment map became available
    pub environment_ready: bool,
}

pub struct SceneState {
    config: SceneConfig,
    scene: Scene,
    camera: Camera,
    driver: AnimationDriver,
    environment: EnvironmentLoader,
    viewport: Viewport,
}

impl SceneState {
    /// Build the scene and start loading the environment map, if any.
    pub fn new(config: SceneConfig, viewport: Viewport) -> Result<Self> {
        let environment = EnvironmentLoader::from_config(config.environment.path.as_deref());
        Self::with_environment(config, viewport, environment)
    }

    pub fn with_environment(
        config: SceneConfig,
        viewport: Viewport,
        environment: EnvironmentLoader,
    ) -> Result<Self> {
        let scene = build_scene(&config)?;
        let camera = Camera::new(&config.camera, viewport.width, viewport.height);
        let driver = AnimationDriver::new(&config.animation);

        Ok(Self {
            config,
            scene,
            camera,
            driver,
            environment,
            viewport,
        })
    }

    /// Track the new viewport and keep the camera aspect equal to `width / height`.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.on_resize(width, height);
    }

    /// Advance the animation by one fixed step and pick up a finished
    /// environment load, if one arrived.
    pub fn tick(&mut self) -> Tick {
        let frame = self.driver.tick();
        let environment_ready = self.environment.poll();
        Tick {
            frame,
            environment_ready,
        }
    }

    pub fn frame(&self) -> FrameInfo {
        self.driver.frame()
    }

    pub fn liquid_uniforms(&self) -> ShadingUniforms {
        ShadingUniforms::at(self.driver.liquid_time())
    }

    pub fn background_uniforms(&self) -> ShadingUniforms {
        ShadingUniforms::at(self.driver.background_time())
    }

    /// Liquid model matrix including the current spin
    pub fn liquid_model(&self) -> Mat4 {
        self.scene.liquid_transform(self.driver.rotation()).matrix()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut AnimationDriver {
        &mut self.driver
    }

    pub fn environment(&self) -> &EnvironmentLoader {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut EnvironmentLoader {
        &mut self.environment
    }

    pub fn environment_status(&self) -> EnvironmentStatus {
        self.environment.status()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
