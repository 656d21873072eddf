//! Equirectangular environment map, decoded off the frame loop.
//!
//! The decoder runs on its own thread and hands the result back through a
//! oneshot channel. The frame loop only ever calls [`EnvironmentLoader::poll`],
//! which never blocks.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::thread;

use futures::channel::oneshot;
use glam::Vec3;

use crate::error::{Result, SceneError};

/// Linear RGBA32F pixels, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

impl EnvironmentMap {
    /// `pixels` must hold `width * height * 4` floats.
    pub fn from_rgba32f(width: u32, height: u32, pixels: Vec<f32>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (width > 0 && height > 0 && pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// One-texel map of a single colour.
    pub fn solid(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color.x, color.y, color.z, 1.0],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|source| SceneError::Environment {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba32f();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Equirectangular texture coordinate of a world direction.
    pub fn direction_to_uv(direction: Vec3) -> (f32, f32) {
        let d = direction.normalize_or_zero();
        let u = d.z.atan2(d.x) * (0.5 / PI) + 0.5;
        let v = d.y.clamp(-1.0, 1.0).asin() * (1.0 / PI) + 0.5;
        (u, v)
    }

    /// Nearest-texel lookup, matching the non-filtering GPU sampler.
    pub fn sample(&self, direction: Vec3) -> Vec3 {
        let (u, v) = Self::direction_to_uv(direction);
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = (((1.0 - v) * self.height as f32) as u32).min(self.height - 1);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Vec3::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentStatus {
    /// No environment configured
    Disabled,
    /// Decoder still running
    Pending,
    Ready,
    /// Decode failed; the scene renders without it
    Failed,
}

pub struct EnvironmentLoader {
    path: Option<PathBuf>,
    status: EnvironmentStatus,
    receiver: Option<oneshot::Receiver<Result<EnvironmentMap>>>,
    map: Option<EnvironmentMap>,
}

impl EnvironmentLoader {
    pub fn disabled() -> Self {
        Self {
            path: None,
            status: EnvironmentStatus::Disabled,
            receiver: None,
            map: None,
        }
    }

    /// Start decoding `path` on a worker thread.
    pub fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = oneshot::channel();
        let worker_path = path.clone();

        let spawned = thread::Builder::new()
            .name("environment-loader".to_string())
            .spawn(move || {
                // The receiver may be gone if the scene was dropped first
                let _ = sender.send(EnvironmentMap::load(&worker_path));
            });

        match spawned {
            Ok(_) => {
                log::info!("Loading environment map {}", path.display());
                Self {
                    path: Some(path),
                    status: EnvironmentStatus::Pending,
                    receiver: Some(receiver),
                    map: None,
                }
            }
            Err(e) => {
                log::warn!("Could not start environment loader: {}", e);
                Self {
                    path: Some(path),
                    status: EnvironmentStatus::Failed,
                    receiver: None,
                    map: None,
                }
            }
        }
    }

    /// Start loading when a path is configured, otherwise stay disabled.
    pub fn from_config(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::spawn(path.to_path_buf()),
            None => Self::disabled(),
        }
    }

    /// Already-decoded map, for callers that loaded it themselves.
    pub fn ready(map: EnvironmentMap) -> Self {
        Self {
            path: None,
            status: EnvironmentStatus::Ready,
            receiver: None,
            map: Some(map),
        }
    }

    /// Check for a finished decode. Returns true exactly once, on the poll
    /// that observes the map becoming available.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = self.receiver.as_mut() else {
            return false;
        };

        match receiver.try_recv() {
            Ok(None) => false,
            Ok(Some(Ok(map))) => {
                let (w, h) = map.dimensions();
                log::info!("Environment map ready ({}x{})", w, h);
                self.map = Some(map);
                self.status = EnvironmentStatus::Ready;
                self.receiver = None;
                true
            }
            Ok(Some(Err(e))) => {
                log::warn!("{}; continuing without environment", error_chain(&e));
                self.status = EnvironmentStatus::Failed;
                self.receiver = None;
                false
            }
            Err(oneshot::Canceled) => {
                log::warn!("Environment loader exited without a result");
                self.status = EnvironmentStatus::Failed;
                self.receiver = None;
                false
            }
        }
    }

    /// Wait for the decoder. Only for headless snapshots, never the frame loop.
    pub fn wait(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            match futures::executor::block_on(receiver) {
                Ok(Ok(map)) => {
                    self.map = Some(map);
                    self.status = EnvironmentStatus::Ready;
                }
                Ok(Err(e)) => {
                    log::warn!("{}; continuing without environment", error_chain(&e));
                    self.status = EnvironmentStatus::Failed;
                }
                Err(oneshot::Canceled) => self.status = EnvironmentStatus::Failed,
            }
        }
    }

    pub fn status(&self) -> EnvironmentStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == EnvironmentStatus::Ready
    }

    pub fn map(&self) -> Option<&EnvironmentMap> {
        self.map.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn error_chain(error: &SceneError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_map_samples_everywhere() {
        let map = EnvironmentMap::solid(Vec3::new(0.2, 0.4, 0.6));
        for dir in [Vec3::X, Vec3::Y, -Vec3::Z, Vec3::new(1.0, -1.0, 0.5)] {
            assert_eq!(map.sample(dir), Vec3::new(0.2, 0.4, 0.6));
        }
    }

    #[test]
    fn test_up_maps_to_top_row() {
        let (_, v) = EnvironmentMap::direction_to_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-6);
        let (_, v) = EnvironmentMap::direction_to_uv(-Vec3::Y);
        assert!(v.abs() < 1e-6);
    }

    #[test]
    fn test_from_rgba32f_checks_length() {
        assert!(EnvironmentMap::from_rgba32f(2, 2, vec![0.0; 16]).is_some());
        assert!(EnvironmentMap::from_rgba32f(2, 2, vec![0.0; 15]).is_none());
    }

    #[test]
    fn test_disabled_loader_never_becomes_ready() {
        let mut loader = EnvironmentLoader::disabled();
        assert!(!loader.poll());
        assert_eq!(loader.status(), EnvironmentStatus::Disabled);
        assert!(loader.map().is_none());
    }

    /// Poll until the decoder finishes, counting how often `poll` reported ready.
    fn poll_until_settled(loader: &mut EnvironmentLoader) -> usize {
        let mut ready = 0;
        for _ in 0..2000 {
            if loader.poll() {
                ready += 1;
            }
            if loader.status() != EnvironmentStatus::Pending {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        ready
    }

    #[test]
    fn test_poll_reports_ready_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.hdr");
        image::Rgb32FImage::from_pixel(4, 2, image::Rgb([0.5, 0.25, 1.0]))
            .save(&path)
            .unwrap();

        let mut loader = EnvironmentLoader::spawn(path);
        assert_eq!(poll_until_settled(&mut loader), 1);
        assert_eq!(loader.status(), EnvironmentStatus::Ready);

        // Later polls never report it again
        for _ in 0..10 {
            assert!(!loader.poll());
        }

        let map = loader.map().unwrap();
        assert_eq!(map.dimensions(), (4, 2));
        assert!((map.sample(Vec3::X) - Vec3::new(0.5, 0.25, 1.0)).length() < 1e-2);
    }

    #[test]
    fn test_poll_marks_missing_file_failed() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = EnvironmentLoader::spawn(dir.path().join("missing.hdr"));

        assert_eq!(poll_until_settled(&mut loader), 0);
        assert_eq!(loader.status(), EnvironmentStatus::Failed);
        assert!(loader.map().is_none());
        assert!(!loader.poll());
    }

    #[test]
    fn test_missing_file_fails_without_panicking() {
        let mut loader = EnvironmentLoader::spawn(PathBuf::from("does/not/exist.hdr"));
        loader.wait();
        assert_eq!(loader.status(), EnvironmentStatus::Failed);
        assert!(!loader.is_available());
    }
}
