//! Frame clock

use std::time::Instant;

/// Longest frame the clock will report, in seconds
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Monotonic scene time, advanced once per frame
pub struct GameClock {
    /// Total elapsed scene time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance by an explicit step, clamped to [0, MAX_FRAME_TIME]
    pub fn advance(&mut self, seconds: f64) {
        // A stalled window (drag, breakpoint) must not jump the scene
        self.delta_time = seconds.clamp(0.0, MAX_FRAME_TIME);
        self.total_time += self.delta_time;
    }

    pub fn seconds(&self) -> f32 {
        self.total_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = GameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, 0.0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::new();
        clock.advance(0.1);
        clock.advance(0.05);
        assert!((clock.total_time - 0.15).abs() < 1e-10);
        assert!((clock.delta_time - 0.05).abs() < 1e-10);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = GameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time, MAX_FRAME_TIME);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, MAX_FRAME_TIME);
    }

    #[test]
    fn test_time_is_monotonic() {
        let mut clock = GameClock::new();
        let mut last = clock.total_time;
        for _ in 0..10 {
            clock.tick();
            assert!(clock.total_time >= last);
            last = clock.total_time;
        }
    }
}
