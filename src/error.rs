use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown scene preset '{0}' (expected one of: lakeside, studio, minimal, ocean)")]
    UnknownPreset(String),

    #[error("invalid scene config: {0}")]
    InvalidConfig(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode environment map {path}")]
    Environment {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write snapshot {path}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create render surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("render surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("no compatible GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),
}
