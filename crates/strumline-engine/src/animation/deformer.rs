//! Proximity deformation of a string.

use std::f32::consts::TAU;

use crate::config::DeformerConfig;
use crate::geometry::Vec2;

/// Where a point last touched the string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Position of the touching point.
    pub point: Vec2,
    /// Radius of influence around it.
    pub radius: f32,
}

/// Bends a string toward a nearby point, with a perpendicular ripple.
///
/// Each collision sets the target intensity to 1. Every frame the current
/// intensity lerps toward the target, and the target itself decays toward 0
/// at the same rate, so a deformation fades out on its own once the point
/// moves away.
#[derive(Debug, Clone)]
pub struct StringDeformer {
    config: DeformerConfig,
    start: Vec2,
    end: Vec2,
    collision: Option<Collision>,
    current: f32,
    target: f32,
}

impl StringDeformer {
    /// Creates a deformer at rest.
    pub fn new(config: DeformerConfig, start: Vec2, end: Vec2) -> Self {
        Self {
            config,
            start,
            end,
            collision: None,
            current: 0.0,
            target: 0.0,
        }
    }

    /// Tracks the string while it moves.
    pub fn set_base(&mut self, start: Vec2, end: Vec2) {
        self.start = start;
        self.end = end;
    }

    /// Records a collision for this frame.
    pub fn trigger(&mut self, collision: Collision) {
        self.collision = Some(collision);
        self.target = 1.0;
    }

    /// Advances the intensity smoothing by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let factor = (dt.max(0.0) / self.config.smoothing).clamp(0.0, 1.0);
        self.current += (self.target - self.current) * factor;
        self.target += (0.0 - self.target) * factor;
    }

    /// Current deformation intensity in `[0, 1]`.
    pub fn intensity(&self) -> f32 {
        self.current
    }

    /// Whether the string is drawn deformed.
    pub fn is_active(&self) -> bool {
        self.current > self.config.rest_threshold && self.collision.is_some()
    }

    /// Displaces `polyline` in place.
    ///
    /// At rest the polyline is left untouched. When active, a two-point line
    /// is first resampled to `segments` points between the base endpoints;
    /// a longer polyline (a vibrating string) is displaced where it is.
    ///
    /// # Arguments
    /// * `polyline` - Current shape of the string
    /// * `time` - Frame clock in seconds, drives the ripple
    pub fn apply(&self, polyline: &mut Vec<Vec2>, time: f32) {
        let Some(collision) = self.collision else {
            return;
        };
        if !self.is_active() || !(collision.radius > 0.0) {
            return;
        }

        if polyline.len() <= 2 {
            let last = (self.config.segments - 1).max(1) as f32;
            polyline.clear();
            polyline.extend(
                (0..self.config.segments).map(|i| self.start.lerp(self.end, i as f32 / last)),
            );
        }

        let ripple = (time * self.config.ripple_hz * TAU).sin() * self.config.ripple_amplitude;
        for sample in polyline.iter_mut() {
            let distance = sample.distance(collision.point);
            if distance >= collision.radius {
                continue;
            }
            let s = 1.0 - distance / collision.radius;
            let toward = (collision.point - *sample).normalize_or_zero();
            let pull = toward * (self.config.strength * s * s * self.current);
            let wobble = toward.perp() * (ripple * s * self.current);
            *sample += pull + wobble;
        }
    }
}
