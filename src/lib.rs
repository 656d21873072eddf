pub mod animation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod environment;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod lights;
pub mod math;
pub mod preview;
pub mod renderer;
pub mod scenes;
pub mod shading;
pub mod state;
pub mod types;

pub use error::{Result, SceneError};
pub use scenes::{build_scene, Scene, ScenePreset};
pub use state::{SceneState, Tick};
