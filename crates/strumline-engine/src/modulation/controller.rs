//! Vibrato intensity smoothing.
//!
//! The interaction detector sets a target strength once per frame; the
//! controller relaxes its current intensity toward it. Release is faster than
//! attack everywhere in the engine: a plucker leaving the string silences the
//! vibrato quicker than an approaching one builds it up.

/// Moves `current` toward `target` by `min(1, dt / tau)` of the gap.
///
/// A non-positive `tau` jumps straight to the target.
pub fn smooth_toward(current: f32, target: f32, dt: f32, tau: f32) -> f32 {
    if !(tau > 0.0) {
        return target;
    }
    let factor = (dt.max(0.0) / tau).min(1.0);
    current + (target - current) * factor
}

/// Smooths a target vibrato strength into a current intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct VibratoController {
    current: f32,
    target: f32,
    attack_tau: f32,
    release_tau: f32,
}

impl VibratoController {
    /// Creates a controller at rest.
    ///
    /// # Arguments
    /// * `attack_tau` - Time constant while the intensity rises, in seconds
    /// * `release_tau` - Time constant while it falls; not longer than `attack_tau`
    pub fn new(attack_tau: f32, release_tau: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            attack_tau,
            release_tau,
        }
    }

    /// Sets the target intensity, clamped to `[0, 1]`.
    pub fn set_target(&mut self, target: f32) {
        self.target = if target.is_finite() {
            target.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Advances the smoothing by `dt` seconds and returns the new intensity.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let tau = if self.target > self.current {
            self.attack_tau
        } else {
            self.release_tau
        };
        self.current = smooth_toward(self.current, self.target, dt, tau).clamp(0.0, 1.0);
        self.current
    }

    /// Current intensity in `[0, 1]`.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Target intensity in `[0, 1]`.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Drops both target and intensity to zero.
    pub fn reset(&mut self) {
        self.current = 0.0;
        self.target = 0.0;
    }
}
