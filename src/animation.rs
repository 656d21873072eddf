//! Fixed-step animation driver.
//!
//! Time is logical: every tick advances each clock by its own step no matter
//! how much wall-clock time passed. Values are derived from the tick count
//! (`ticks * step`) so long runs never accumulate summation drift.

use glam::Vec3;

use crate::config::AnimationConfig;
use crate::frame::FrameInfo;

/// A time uniform advanced by a fixed step per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderClock {
    step: f32,
    ticks: u64,
    wrap: Option<f32>,
}

impl ShaderClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            ticks: 0,
            wrap: None,
        }
    }

    /// Keep the value in `[0, period)`. Non-positive periods are ignored.
    pub fn with_wrap(mut self, period: Option<f32>) -> Self {
        self.wrap = period.filter(|p| *p > 0.0);
        self
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn advance(&mut self, ticks: u64) {
        self.ticks += ticks;
    }

    pub fn value(&self) -> f32 {
        match self.wrap {
            None => self.ticks as f32 * self.step,
            Some(period) => {
                let raw = self.ticks as f64 * self.step as f64;
                raw.rem_euclid(period as f64) as f32
            }
        }
    }
}

/// Per-axis rotation advanced by a fixed step per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    step: Vec3,
    ticks: u64,
}

impl Spin {
    pub fn new(step: Vec3) -> Self {
        Self { step, ticks: 0 }
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn advance(&mut self, ticks: u64) {
        self.ticks += ticks;
    }

    /// Euler angles in radians
    pub fn angles(&self) -> Vec3 {
        self.step * self.ticks as f32
    }
}

/// Owns every value that changes per frame: the liquid clock, the
/// background clock and the sphere spin. Nothing else is mutated.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    liquid: ShaderClock,
    background: ShaderClock,
    spin: Spin,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            liquid: ShaderClock::new(config.liquid_step).with_wrap(config.time_wrap),
            background: ShaderClock::new(config.background_step).with_wrap(config.time_wrap),
            spin: Spin::new(config.rotation_step),
            ticks: 0,
        }
    }

    /// Advance one display frame.
    pub fn tick(&mut self) -> FrameInfo {
        self.liquid.tick();
        self.background.tick();
        self.spin.tick();
        self.ticks += 1;
        self.frame()
    }

    /// Advance `ticks` frames at once; same result as calling [`tick`](Self::tick) repeatedly.
    pub fn advance(&mut self, ticks: u64) -> FrameInfo {
        self.liquid.advance(ticks);
        self.background.advance(ticks);
        self.spin.advance(ticks);
        self.ticks += ticks;
        self.frame()
    }

    pub fn frame(&self) -> FrameInfo {
        FrameInfo::new(
            self.ticks,
            self.liquid.value(),
            self.background.value(),
            self.spin.angles(),
        )
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn liquid_time(&self) -> f32 {
        self.liquid.value()
    }

    pub fn background_time(&self) -> f32 {
        self.background.value()
    }

    pub fn rotation(&self) -> Vec3 {
        self.spin.angles()
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        let clock = ShaderClock::new(0.05);
        assert_eq!(clock.value(), 0.0);
    }

    #[test]
    fn clock_wraps_into_period() {
        let mut clock = ShaderClock::new(1.0).with_wrap(Some(4.0));
        clock.advance(5);
        assert!((clock.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clock_ignores_non_positive_period() {
        let mut clock = ShaderClock::new(1.0).with_wrap(Some(0.0));
        clock.advance(5);
        assert_eq!(clock.value(), 5.0);
    }

    #[test]
    fn driver_clocks_are_independent() {
        let mut driver = AnimationDriver::default();
        driver.tick();
        assert_eq!(driver.liquid_time(), 0.05);
        assert_eq!(driver.background_time(), 0.01);
    }

    #[test]
    fn advance_matches_repeated_ticks() {
        let mut stepped = AnimationDriver::default();
        for _ in 0..37 {
            stepped.tick();
        }
        let mut jumped = AnimationDriver::default();
        jumped.advance(37);
        assert_eq!(stepped.frame(), jumped.frame());
    }
}
