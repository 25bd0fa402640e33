//! Frame timing utilities

use std::time::{Duration, Instant};

/// Longest delta a single frame may report, in seconds.
///
/// A stalled frame (debugger break, window drag) would otherwise teleport
/// every entity across the world on the next tick.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Wall-clock frame timer
///
/// Call [`Timer::update`] once per frame; it returns the elapsed seconds
/// since the previous call, clamped to [`MAX_FRAME_DELTA`].
#[derive(Debug)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a timer whose first delta is measured from now
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the current instant and return the frame delta in seconds
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by an explicit duration (fixed-step drivers and tests)
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        self.delta_time = elapsed.as_secs_f32().min(MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Sum of all reported deltas
    #[must_use]
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of updates so far
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Stopwatch for timing a section of a frame
#[derive(Debug)]
pub struct Stopwatch {
    started: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start_new()
    }
}

impl Stopwatch {
    /// Create a running stopwatch
    #[must_use]
    pub fn start_new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Restart from zero
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Elapsed time since the last (re)start
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time in milliseconds
    #[must_use]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_accumulates() {
        let mut timer = Timer::new();
        let dt = timer.advance(Duration::from_millis(16));
        assert_relative_eq!(dt, 0.016, epsilon = 1e-6);
        timer.advance(Duration::from_millis(16));
        assert_eq!(timer.frame_count(), 2);
        assert_relative_eq!(timer.total_time(), 0.032, epsilon = 1e-6);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut timer = Timer::new();
        let dt = timer.advance(Duration::from_secs(3));
        assert_relative_eq!(dt, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_zero_delta() {
        let mut timer = Timer::new();
        assert_eq!(timer.advance(Duration::ZERO), 0.0);
        assert_eq!(timer.average_fps(), 0.0);
    }
}
