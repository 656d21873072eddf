use super::clock::Clock;

/// Frames-per-second meter over a fixed reporting interval
#[derive(Debug)]
pub struct FpsCounter {
    clock: Clock,
    interval: f32,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            clock: Clock::new(),
            interval,
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Record a frame using wall-clock time. Returns the new rate when an
    /// interval completes.
    pub fn frame(&mut self) -> Option<f32> {
        let delta = self.clock.tick();
        self.record(delta)
    }

    /// Record a frame that took `delta` seconds.
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed >= self.interval {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
