//! Frames-per-second sampling for the window title.

use std::time::Instant;

/// Seconds between samples.
pub const FPS_SAMPLE_SECONDS: f64 = 0.25;

/// Counts frames and reports a rounded rate once per sample period.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    start: Instant,
    frames: u32,
    last_sample: f64,
    current: Option<u32>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frames: 0,
            last_sample: 0.0,
            current: None,
        }
    }

    /// Count a frame now. Returns the new rate when a sample completed.
    pub fn frame(&mut self) -> Option<u32> {
        let now = self.start.elapsed().as_secs_f64();
        self.frame_at(now)
    }

    /// Count a frame at `now` seconds after the counter was created.
    pub fn frame_at(&mut self, now: f64) -> Option<u32> {
        self.frames += 1;
        let elapsed = now - self.last_sample;
        if elapsed <= FPS_SAMPLE_SECONDS {
            return None;
        }

        let fps = (f64::from(self.frames) / elapsed).round() as u32;
        self.frames = 0;
        self.last_sample = now;
        self.current = Some(fps);
        Some(fps)
    }

    /// Last completed sample, if any.
    pub fn current(&self) -> Option<u32> {
        self.current
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Window title carrying the frame rate.
pub fn fps_title(base: &str, fps: u32) -> String {
    if base.is_empty() {
        format!("{fps} FPS")
    } else {
        format!("{base} - {fps} FPS")
    }
}
