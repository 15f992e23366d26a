//! Simulated time, advanced by a fixed step every rendered frame.
//!
//! The step is independent of wall-clock time: one frame is always
//! `step` simulated seconds, however long it took to draw.

use tracing::warn;

/// Default step: one simulated day per frame.
pub const DEFAULT_TIME_STEP: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    time: f64,
    step: f64,
    frame_count: u64,
}

impl SimClock {
    /// A clock at `t = 0`. Non-finite steps fall back to
    /// [`DEFAULT_TIME_STEP`].
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() {
            step
        } else {
            warn!(step, "Invalid time step, using one day per frame");
            DEFAULT_TIME_STEP
        };
        Self {
            time: 0.0,
            step,
            frame_count: 0,
        }
    }

    /// Advance one frame and return the new simulated time.
    ///
    /// Time is `frame_count * step` rather than a running sum, so long runs
    /// do not accumulate rounding drift.
    pub fn advance(&mut self) -> f64 {
        self.frame_count += 1;
        self.time = self.frame_count as f64 * self.step;
        self.time
    }

    /// Simulated seconds since start.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP)
    }
}
