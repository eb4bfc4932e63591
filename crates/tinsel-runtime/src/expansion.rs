//! The shared expansion scalar: one register, one writer, many readers

use std::cell::Cell;
use std::rc::Rc;
use tinsel_core::ExpansionConfig;

/// Upper bound of the expansion scalar
pub const EXPANSION_MAX: f32 = 5.0;

/// Storage for the expansion value. Writing requires `&mut`, and the register
/// is not `Clone`, so whoever owns it is the only writer.
#[derive(Debug, Default)]
pub struct ExpansionRegister {
    value: Rc<Cell<f32>>,
}

impl ExpansionRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, value: f32) {
        self.value.set(value);
    }

    pub fn get(&self) -> f32 {
        self.value.get()
    }

    /// A read-only view of the same storage
    pub fn handle(&self) -> ExpansionHandle {
        ExpansionHandle {
            value: Rc::clone(&self.value),
        }
    }
}

/// Read-only handle to the register, cloned into every reader
#[derive(Debug, Clone)]
pub struct ExpansionHandle {
    value: Rc<Cell<f32>>,
}

impl ExpansionHandle {
    pub fn get(&self) -> f32 {
        self.value.get()
    }
}

/// Smooths the current expansion toward a user-controlled target
#[derive(Debug)]
pub struct ExpansionDriver {
    current: f32,
    target: f32,
    max: f32,
    smoothing: f32,
    wheel_sensitivity: f32,
    register: ExpansionRegister,
}

impl Default for ExpansionDriver {
    fn default() -> Self {
        Self::new(&ExpansionConfig::default())
    }
}

impl ExpansionDriver {
    pub fn new(config: &ExpansionConfig) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&config.smoothing),
            "smoothing outside [0, 1] would overshoot"
        );
        Self {
            current: 0.0,
            target: 0.0,
            max: config.max.min(EXPANSION_MAX),
            smoothing: config.smoothing,
            wheel_sensitivity: config.wheel_sensitivity,
            register: ExpansionRegister::new(),
        }
    }

    pub fn handle(&self) -> ExpansionHandle {
        self.register.handle()
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Set the target, clamped to [0, max]. Non-finite values are ignored.
    pub fn set_target(&mut self, target: f32) {
        if !target.is_finite() {
            tracing::warn!(target: "director", value = target, "ignoring non-finite expansion target");
            return;
        }
        self.target = target.clamp(0.0, self.max);
    }

    /// Move the target by wheel travel in pixels
    pub fn nudge(&mut self, pixels: f32) {
        self.set_target(self.target + pixels * self.wheel_sensitivity);
    }

    /// One smoothing step; writes and returns the new current value
    pub fn tick(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.smoothing;
        self.current = self.current.clamp(0.0, self.max);
        self.register.write(self.current);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_one_value() {
        let mut register = ExpansionRegister::new();
        let a = register.handle();
        let b = a.clone();
        register.write(2.5);
        assert_eq!(a.get(), 2.5);
        assert_eq!(b.get(), 2.5);
        assert_eq!(register.get(), 2.5);
    }

    #[test]
    fn target_is_clamped() {
        let mut driver = ExpansionDriver::default();
        driver.set_target(12.0);
        assert_eq!(driver.target(), EXPANSION_MAX);
        driver.set_target(-3.0);
        assert_eq!(driver.target(), 0.0);
        driver.set_target(f32::NAN);
        assert_eq!(driver.target(), 0.0);
    }

    #[test]
    fn wheel_nudges_accumulate() {
        let mut driver = ExpansionDriver::default();
        driver.nudge(100.0);
        assert!((driver.target() - 0.15).abs() < 1e-6);
        driver.nudge(100_000.0);
        assert_eq!(driver.target(), EXPANSION_MAX);
        driver.nudge(-100_000.0);
        assert_eq!(driver.target(), 0.0);
    }

    #[test]
    fn smoothing_stays_bounded_and_converges() {
        let mut driver = ExpansionDriver::default();
        let handle = driver.handle();
        driver.set_target(5.0);

        let mut last = 0.0;
        for _ in 0..100 {
            let value = driver.tick();
            assert!((0.0..=EXPANSION_MAX).contains(&value));
            assert!(value >= last);
            assert_eq!(handle.get(), value);
            last = value;
        }
        // 5 * 0.95^100
        assert!((EXPANSION_MAX - last - 5.0 * 0.95f32.powi(100)).abs() < 1e-3);

        for _ in 0..100 {
            driver.tick();
        }
        assert!((driver.current() - 5.0).abs() < 1e-3);
        assert!(driver.current() <= EXPANSION_MAX);
    }

    #[test]
    fn first_tick_moves_five_percent() {
        let mut driver = ExpansionDriver::default();
        driver.set_target(4.0);
        assert!((driver.tick() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn collapsing_returns_to_zero() {
        let mut driver = ExpansionDriver::default();
        driver.set_target(5.0);
        for _ in 0..50 {
            driver.tick();
        }
        driver.set_target(0.0);
        for _ in 0..400 {
            assert!(driver.tick() >= 0.0);
        }
        assert!(driver.current() < 1e-3);
    }
}
