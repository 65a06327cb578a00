//! Frame timing

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame deltas into a count of fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Timestamp of the previous frame (ms), 0 before the first
    last_time: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped; one step on the first frame
    pub fn delta(&mut self, time_ms: f64) -> f32 {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time_ms;
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Add a frame delta and return how many fixed steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Don't carry a backlog past the substep cap
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Forget the previous timestamp (tab was hidden)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = 0.0;
    }
}

/// Rolling frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp (ms)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
