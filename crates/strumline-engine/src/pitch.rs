//! Geometry-to-pitch mapping.
//!
//! The pitch circle is read like a clock face: 12 o'clock is C and every 30°
//! clockwise adds one semitone. The string length, measured in radii, selects
//! the octave between 3 and 7.

use serde::{Deserialize, Serialize};

use crate::geometry::{LineGeometry, Vec2};

/// Degrees of arc per semitone.
pub const DEGREES_PER_SEMITONE: f32 = 30.0;

/// Highest continuous pitch class; keeps `floor` from wrapping to 12.
pub const MAX_PITCH_CLASS: f32 = 11.99;

/// Lowest octave the geometry can select.
pub const BASE_OCTAVE: f32 = 3.0;

/// Frequency of C3 in Hz, the default base of the mapping.
pub const C3_HZ: f64 = 130.81;

/// Note names indexed by pitch class, spelled with sharps.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch derived from a string's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchState {
    /// Continuous pitch class in `[0, 12)`.
    pub pitch_class: f32,
    /// Continuous octave in `[3, 7]`.
    pub octave: f32,
    /// Frequency of the quantized note in Hz.
    pub frequency_hz: f64,
}

impl PitchState {
    /// Semitone index within the octave (`floor(pitch_class) mod 12`).
    pub fn semitone(&self) -> usize {
        (self.pitch_class.floor().max(0.0) as usize) % 12
    }

    /// Whole octave number.
    pub fn octave_number(&self) -> i32 {
        self.octave.floor() as i32
    }

    /// Note name such as `D#5`.
    pub fn note_name(&self) -> String {
        format!("{}{}", NOTE_NAMES[self.semitone()], self.octave_number())
    }

    /// Whether this pitch differs from `other` by more than `threshold` in
    /// pitch class or octave.
    pub fn differs_from(&self, other: &PitchState, threshold: f32) -> bool {
        (self.pitch_class - other.pitch_class).abs() > threshold
            || (self.octave - other.octave).abs() > threshold
    }
}

/// Maps string geometry to pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchGeometry {
    /// Frequency at octave 3, pitch class 0.
    pub min_frequency_hz: f64,
}

impl Default for PitchGeometry {
    fn default() -> Self {
        Self {
            min_frequency_hz: C3_HZ,
        }
    }
}

impl PitchGeometry {
    /// Creates a mapping with the given base frequency.
    pub fn new(min_frequency_hz: f64) -> Self {
        Self { min_frequency_hz }
    }

    /// Computes the pitch for a string pivoting around `center`.
    ///
    /// Returns `None` when `radius` is not positive; callers keep their
    /// previous pitch in that case.
    pub fn compute(&self, origin: Vec2, center: Vec2, radius: f32) -> Option<PitchState> {
        if !(radius > 0.0) {
            return None;
        }

        let line = LineGeometry::new(origin, center, radius);
        let pitch_class = pitch_class_for_angle(line.angle_from_12());
        let octave = (line.length() / radius).clamp(1.0, 5.0) + (BASE_OCTAVE - 1.0);
        let frequency_hz = self.frequency_for(pitch_class, octave);

        Some(PitchState {
            pitch_class,
            octave,
            frequency_hz,
        })
    }

    /// Computes the pitch of a line geometry.
    pub fn compute_line(&self, line: &LineGeometry) -> Option<PitchState> {
        self.compute(line.origin, line.center, line.radius)
    }

    /// Frequency of the note at `floor(pitch_class)` in octave `floor(octave)`.
    pub fn frequency_for(&self, pitch_class: f32, octave: f32) -> f64 {
        let octaves_up = octave.floor() as i32 - BASE_OCTAVE as i32;
        let semitones = pitch_class.floor() as i32 + octaves_up * 12;
        self.min_frequency_hz * 2f64.powf(f64::from(semitones) / 12.0)
    }
}

/// Continuous pitch class for a clock angle in degrees.
pub fn pitch_class_for_angle(angle: f32) -> f32 {
    (angle / DEGREES_PER_SEMITONE).clamp(0.0, MAX_PITCH_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_at(angle: f32, length: f32) -> Vec2 {
        Vec2::from_clock_angle(angle, length)
    }

    #[test]
    fn test_pitch_class_per_thirty_degrees() {
        let geometry = PitchGeometry::default();
        for step in 0..12 {
            let angle = step as f32 * 30.0;
            let pitch = geometry
                .compute(origin_at(angle, 4.0), Vec2::ZERO, 2.0)
                .unwrap();
            assert!(
                (pitch.pitch_class - step as f32).abs() < 1e-3,
                "angle {} gave pitch class {}",
                angle,
                pitch.pitch_class
            );
        }
    }

    #[test]
    fn test_pitch_class_clamps_below_twelve() {
        assert_eq!(pitch_class_for_angle(359.999), MAX_PITCH_CLASS);
    }

    #[test]
    fn test_octave_clamped_to_range() {
        let geometry = PitchGeometry::default();
        let short = geometry.compute(origin_at(0.0, 0.1), Vec2::ZERO, 2.0).unwrap();
        let long = geometry.compute(origin_at(0.0, 100.0), Vec2::ZERO, 2.0).unwrap();
        assert_eq!(short.octave, 3.0);
        assert_eq!(long.octave, 7.0);
    }

    #[test]
    fn test_base_frequency() {
        let geometry = PitchGeometry::default();
        assert!((geometry.frequency_for(0.0, 3.0) - 130.81).abs() < 0.01);
        let octave_up = geometry.frequency_for(0.0, 4.0);
        assert!((octave_up - 261.62).abs() < 0.01);
        assert!((octave_up / geometry.frequency_for(0.0, 3.0) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_note_names() {
        let geometry = PitchGeometry::default();
        let c = geometry.compute(origin_at(1.0, 2.0), Vec2::ZERO, 2.0).unwrap();
        assert_eq!(c.note_name(), "C3");
        let f_sharp = geometry.compute(origin_at(181.0, 2.0), Vec2::ZERO, 2.0).unwrap();
        assert_eq!(f_sharp.note_name(), "F#3");
    }

    #[test]
    fn test_non_positive_radius_skips_pitch() {
        let geometry = PitchGeometry::default();
        assert!(geometry.compute(Vec2::new(1.0, 1.0), Vec2::ZERO, 0.0).is_none());
        assert!(geometry.compute(Vec2::new(1.0, 1.0), Vec2::ZERO, -1.0).is_none());
        assert!(geometry.compute(Vec2::new(1.0, 1.0), Vec2::ZERO, f32::NAN).is_none());
    }

    #[test]
    fn test_zero_length_string_is_defined() {
        let geometry = PitchGeometry::default();
        let pitch = geometry.compute(Vec2::ZERO, Vec2::ZERO, 2.0).unwrap();
        assert_eq!(pitch.pitch_class, 0.0);
        assert_eq!(pitch.octave, 3.0);
        assert!(pitch.frequency_hz > 0.0);
    }

    #[test]
    fn test_differs_from_threshold() {
        let a = PitchState {
            pitch_class: 3.0,
            octave: 5.0,
            frequency_hz: 622.25,
        };
        let small = PitchState {
            pitch_class: 3.05,
            ..a
        };
        let large = PitchState {
            pitch_class: 3.2,
            ..a
        };
        assert!(!small.differs_from(&a, 0.1));
        assert!(large.differs_from(&a, 0.1));
    }
}
