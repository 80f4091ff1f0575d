//! Vibrato pitch modulation.
//!
//! The modulation is a sine LFO in semitones scaled by an intensity in
//! `[0, 1]`; it becomes a playback-rate (or frequency) ratio of `2^(m/12)`.

use serde::{Deserialize, Serialize};

/// Vibrato depth and rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VibratoModulation {
    /// Peak deviation in semitones at full intensity.
    pub depth_semitones: f64,
    /// LFO rate in Hz.
    pub rate_hz: f64,
}

impl Default for VibratoModulation {
    fn default() -> Self {
        Self {
            depth_semitones: 0.5,
            rate_hz: 5.5,
        }
    }
}

impl VibratoModulation {
    /// Pitch offset in semitones at time `t` for the given intensity.
    ///
    /// `m(t) = sin(2π · rate · t) · depth · intensity`
    pub fn offset_semitones(&self, t: f64, intensity: f64) -> f64 {
        (std::f64::consts::TAU * self.rate_hz * t).sin()
            * self.depth_semitones
            * intensity.clamp(0.0, 1.0)
    }

    /// Frequency ratio at time `t` for the given intensity.
    pub fn pitch_ratio(&self, t: f64, intensity: f64) -> f64 {
        semitones_to_ratio(self.offset_semitones(t, intensity))
    }

    /// Largest ratio this modulation reaches at `intensity`.
    ///
    /// Grows monotonically with intensity.
    pub fn peak_ratio(&self, intensity: f64) -> f64 {
        semitones_to_ratio(self.depth_semitones.abs() * intensity.clamp(0.0, 1.0))
    }
}

/// A vibrato with a fixed intensity, rendered straight into a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakedVibrato {
    /// Depth and rate.
    pub modulation: VibratoModulation,
    /// Fixed intensity in `[0, 1]`.
    pub intensity: f64,
}

impl BakedVibrato {
    /// Frequency ratio at time `t`.
    pub fn pitch_ratio(&self, t: f64) -> f64 {
        self.modulation.pitch_ratio(t, self.intensity)
    }
}

/// Converts a semitone offset to a frequency ratio.
pub fn semitones_to_ratio(semitones: f64) -> f64 {
    2.0_f64.powf(semitones / 12.0)
}

/// Applies a semitone offset to a frequency.
///
/// # Arguments
/// * `frequency` - Base frequency in Hz
/// * `semitones` - Offset in semitones (may be negative)
///
/// # Returns
/// Modulated frequency in Hz
pub fn apply_pitch_modulation(frequency: f64, semitones: f64) -> f64 {
    frequency * semitones_to_ratio(semitones)
}
