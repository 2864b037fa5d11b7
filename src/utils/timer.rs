//! # Countdown Timer
//!
//! Monotonic countdown fed by per-tick elapsed time. Nothing blocks; the host
//! loop calls [`Timer::update`] once per frame.

use serde::{Deserialize, Serialize};

/// Countdown measured in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    remaining: f32,
    infinite: bool,
}

impl Timer {
    /// Creates a timer that is over after `duration` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use dice_arena::Timer;
    ///
    /// let mut timer = Timer::new(1.0);
    /// timer.update(0.6);
    /// assert!(!timer.is_over());
    /// timer.update(0.6);
    /// assert!(timer.is_over());
    /// ```
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            infinite: false,
        }
    }

    /// A timer that never runs out.
    pub fn infinite() -> Self {
        Self {
            remaining: 1.0,
            infinite: true,
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        if self.remaining > 0.0 && !self.infinite {
            self.remaining -= delta_time;
        }
    }

    pub fn is_over(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Seconds left, never negative.
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}
