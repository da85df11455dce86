use std::time::Duration;

use bevy::prelude::*;

/// Bounded-duration effect driven by a monotonic clock.
///
/// Progress is derived from the wall-clock delta since [`TimedEffect::start`],
/// never from frame counts. Easing is left to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TimedEffect {
    duration: Duration,
    active: bool,
    started_at: Duration,
}

impl TimedEffect {
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: false,
            started_at: Duration::ZERO,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts the effect. Restarts it when it is already running.
    pub fn start(&mut self, now: Duration) {
        self.active = true;
        self.started_at = now;
    }

    /// Current progress in `[0, 1]`, `None` while inactive.
    ///
    /// The tick that first reaches 1 still reports it and deactivates the effect.
    pub fn tick(&mut self, now: Duration) -> Option<f32> {
        if !self.active {
            return None;
        }

        let progress = self.progress_at(now);
        if progress >= 1.0 {
            self.active = false;
        }
        Some(progress)
    }

    fn progress_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Rises then falls, zero at both ends.
pub fn ease_recoil(progress: f32) -> f32 {
    (progress * std::f32::consts::PI).sin()
}

/// Full intensity at the start, fast decay towards the end.
pub fn ease_flash(progress: f32) -> f32 {
    1.0 - progress * progress
}
