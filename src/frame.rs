use glam::Vec3;

/// Snapshot of the animation state after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Time uniform of the liquid material
    pub liquid_time: f32,
    /// Time uniform of the background gradient
    pub background_time: f32,
    /// Euler angles (XYZ) applied to the liquid sphere
    pub rotation: Vec3,
}

impl FrameInfo {
    pub fn new(number: u64, liquid_time: f32, background_time: f32, rotation: Vec3) -> Self {
        Self {
            number,
            liquid_time,
            background_time,
            rotation,
        }
    }
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0, Vec3::ZERO)
    }
}
