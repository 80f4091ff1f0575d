//! Point breathing animation.

use std::f32::consts::PI;

use crate::config::BreathingConfig;

/// Swells a point's draw scale once per click.
#[derive(Debug, Clone)]
pub struct PointAnimator {
    config: BreathingConfig,
    remaining: f32,
}

impl PointAnimator {
    /// Creates an idle animator.
    pub fn new(config: BreathingConfig) -> Self {
        Self {
            config,
            remaining: 0.0,
        }
    }

    /// Starts (or restarts) a breath.
    pub fn trigger(&mut self) {
        self.remaining = self.config.duration;
    }

    /// Counts down by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
    }

    /// Whether a breath is in progress.
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Draw scale: `lerp(1, scale, sin(progress · π))`, 1 when idle.
    pub fn scale(&self) -> f32 {
        if !self.is_active() {
            return 1.0;
        }
        let progress = 1.0 - self.remaining / self.config.duration;
        let swell = (progress * PI).sin();
        1.0 + (self.config.scale - 1.0) * swell
    }
}
