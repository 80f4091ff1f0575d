//! Pluck vibration of a string.

use std::f32::consts::{PI, TAU};

use crate::config::VibrationConfig;
use crate::geometry::Vec2;

/// Time-decaying multi-harmonic oscillation, started once per note.
///
/// Both ends stay fixed; samples in between are displaced perpendicular to
/// the string by `sin(π t)` of the current oscillation.
#[derive(Debug, Clone)]
pub struct StringVibrationAnimator {
    config: VibrationConfig,
    start: Vec2,
    end: Vec2,
    remaining: f32,
}

impl StringVibrationAnimator {
    /// Creates an idle animator.
    pub fn new(config: VibrationConfig, start: Vec2, end: Vec2) -> Self {
        Self {
            config,
            start,
            end,
            remaining: 0.0,
        }
    }

    /// Captures the endpoints and restarts the countdown.
    pub fn trigger(&mut self, start: Vec2, end: Vec2) {
        self.start = start;
        self.end = end;
        self.remaining = self.config.duration;
    }

    /// Tracks the string while it moves.
    pub fn set_base(&mut self, start: Vec2, end: Vec2) {
        self.start = start;
        self.end = end;
    }

    /// Counts down by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        }
    }

    /// Stops immediately.
    pub fn stop(&mut self) {
        self.remaining = 0.0;
    }

    /// Whether the vibration is still running.
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds since the last trigger, capped at the duration.
    pub fn elapsed(&self) -> f32 {
        self.config.duration - self.remaining
    }

    /// Exponential decay of the amplitude: `exp(-k · elapsed / duration)`.
    pub fn decay(&self) -> f32 {
        (-self.config.decay_rate * self.elapsed() / self.config.duration).exp()
    }

    /// Signed displacement at the middle of the string at clock `time`.
    pub fn oscillation(&self, time: f32) -> f32 {
        let c = &self.config;
        let phase = TAU * c.frequency_hz * time;
        let wave =
            phase.sin() + c.harmonic2 * (2.0 * phase).sin() + c.harmonic3 * (3.0 * phase).sin();
        c.amplitude * self.decay() * wave
    }

    /// Writes the current shape into `out`.
    ///
    /// Active: `samples` points along the string. Idle: the two endpoints.
    pub fn render_into(&self, out: &mut Vec<Vec2>, time: f32) {
        out.clear();
        if !self.is_active() {
            out.push(self.start);
            out.push(self.end);
            return;
        }

        let normal = (self.end - self.start).perp().normalize_or_zero();
        let oscillation = self.oscillation(time);
        let last = (self.config.samples - 1).max(1) as f32;
        for i in 0..self.config.samples {
            let t = i as f32 / last;
            let displacement = oscillation * (PI * t).sin();
            out.push(self.start.lerp(self.end, t) + normal * displacement);
        }
        // sin(π) is not exactly zero in f32
        if let Some(tail) = out.last_mut() {
            *tail = self.end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> StringVibrationAnimator {
        StringVibrationAnimator::new(VibrationConfig::default(), Vec2::ZERO, Vec2::new(4.0, 0.0))
    }

    #[test]
    fn test_idle_renders_endpoints() {
        let animator = horizontal();
        let mut out = Vec::new();
        animator.render_into(&mut out, 0.3);
        assert_eq!(out, vec![Vec2::ZERO, Vec2::new(4.0, 0.0)]);
    }

    #[test]
    fn test_active_renders_fixed_ends() {
        let mut animator = horizontal();
        animator.trigger(Vec2::ZERO, Vec2::new(4.0, 0.0));
        animator.tick(0.05);

        let mut out = Vec::new();
        // 1/60 s into a 15 Hz wave is well away from a zero crossing
        animator.render_into(&mut out, 1.0 / 60.0);
        assert_eq!(out.len(), 20);
        assert_eq!(out[0], Vec2::ZERO);
        assert_eq!(out[19], Vec2::new(4.0, 0.0));

        let middle = out[10];
        assert!(middle.y.abs() > 0.01);
        // Displacement is perpendicular: x stays on the base lerp
        assert!((middle.x - 4.0 * 10.0 / 19.0).abs() < 1e-5);
    }

    #[test]
    fn test_decay_is_monotonic() {
        let mut animator = horizontal();
        animator.trigger(Vec2::ZERO, Vec2::new(4.0, 0.0));
        assert_eq!(animator.decay(), 1.0);

        let mut previous = animator.decay();
        for _ in 0..10 {
            animator.tick(0.04);
            assert!(animator.decay() < previous);
            previous = animator.decay();
        }
    }

    #[test]
    fn test_expiry_collapses_to_two_points() {
        let mut animator = horizontal();
        animator.trigger(Vec2::ZERO, Vec2::new(4.0, 0.0));
        animator.tick(0.6);
        assert!(!animator.is_active());

        let mut out = Vec::new();
        animator.render_into(&mut out, 0.1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_retrigger_restarts_countdown() {
        let mut animator = horizontal();
        animator.trigger(Vec2::ZERO, Vec2::new(4.0, 0.0));
        animator.tick(0.4);
        animator.trigger(Vec2::ZERO, Vec2::new(4.0, 0.0));
        assert_eq!(animator.elapsed(), 0.0);
    }
}
