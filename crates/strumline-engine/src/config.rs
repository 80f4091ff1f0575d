//! Engine configuration.
//!
//! Every tunable is a named numeric constant supplied at construction time.
//! All sections default to the instrument's stock tuning, so a JSON file only
//! needs the values it changes:
//!
//! ```json
//! { "string": { "radius": 1.5 }, "vibrato": { "depth_semitones": 0.8 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::envelope::{AdsrParams, ClickParams};
use crate::error::{EngineError, EngineResult};
use crate::modulation::VibratoModulation;
use crate::pitch::C3_HZ;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Base seed for click noise. `None` draws from OS entropy.
    pub seed: Option<u32>,
    /// String voice and pitch mapping.
    pub string: StringConfig,
    /// Point click voice.
    pub click: ClickConfig,
    /// Vibrato smoothing and depth.
    pub vibrato: VibratoConfig,
    /// Proximity deformation of the string.
    pub deformer: DeformerConfig,
    /// Pluck vibration of the string.
    pub vibration: VibrationConfig,
    /// Point breathing animation.
    pub breathing: BreathingConfig,
    /// Interaction and grab distances.
    pub interaction: InteractionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: None,
            string: StringConfig::default(),
            click: ClickConfig::default(),
            vibrato: VibratoConfig::default(),
            deformer: DeformerConfig::default(),
            vibration: VibrationConfig::default(),
            breathing: BreathingConfig::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

/// String voice and pitch mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringConfig {
    /// Pitch circle radius; one radius of string length is one octave step.
    pub radius: f32,
    /// Frequency at octave 3, pitch class 0 (C3).
    pub min_frequency_hz: f64,
    /// Length of every rendered note in seconds.
    pub note_duration: f64,
    /// Note envelope.
    pub envelope: AdsrParams,
    /// Output volume of the voice.
    pub volume: f32,
    /// Pitch class / octave change needed before a drag re-triggers a note.
    pub retrigger_threshold: f32,
}

impl Default for StringConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            min_frequency_hz: C3_HZ,
            note_duration: 0.5,
            envelope: AdsrParams::default(),
            volume: 0.8,
            retrigger_threshold: 0.1,
        }
    }
}

/// Point click voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClickConfig {
    /// Click buffer length in seconds.
    pub duration: f64,
    /// Click envelope.
    pub envelope: ClickParams,
    /// Output volume of the voice.
    pub volume: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            duration: 0.08,
            envelope: ClickParams::default(),
            volume: 0.8,
        }
    }
}

/// Vibrato smoothing and depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VibratoConfig {
    /// Time constant while intensity rises, in seconds.
    pub attack_tau: f32,
    /// Time constant while intensity falls; must not exceed `attack_tau`.
    pub release_tau: f32,
    /// Peak pitch deviation at full intensity, in semitones.
    pub depth_semitones: f64,
    /// Vibrato rate in Hz.
    pub rate_hz: f64,
}

impl Default for VibratoConfig {
    fn default() -> Self {
        let modulation = VibratoModulation::default();
        Self {
            attack_tau: 0.1,
            release_tau: 0.05,
            depth_semitones: modulation.depth_semitones,
            rate_hz: modulation.rate_hz,
        }
    }
}

impl VibratoConfig {
    /// Depth and rate as a modulation.
    pub fn modulation(&self) -> VibratoModulation {
        VibratoModulation {
            depth_semitones: self.depth_semitones,
            rate_hz: self.rate_hz,
        }
    }
}

/// Proximity deformation of the string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeformerConfig {
    /// Maximum pull toward the collision point, in world units.
    pub strength: f32,
    /// Smoothing time constant of the deformation intensity, in seconds.
    pub smoothing: f32,
    /// Samples along the string while deformed.
    pub segments: usize,
    /// Perpendicular ripple amplitude, in world units.
    pub ripple_amplitude: f32,
    /// Ripple frequency in Hz.
    pub ripple_hz: f32,
    /// Intensity at or below which the string is drawn straight.
    pub rest_threshold: f32,
}

impl Default for DeformerConfig {
    fn default() -> Self {
        Self {
            strength: 0.8,
            smoothing: 0.6,
            segments: 6,
            ripple_amplitude: 0.15,
            ripple_hz: 8.0,
            rest_threshold: 0.01,
        }
    }
}

/// Pluck vibration of the string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VibrationConfig {
    /// Initial displacement amplitude, in world units.
    pub amplitude: f32,
    /// Fundamental frequency of the visual oscillation, in Hz.
    pub frequency_hz: f32,
    /// Length of the effect in seconds.
    pub duration: f32,
    /// Relative strength of the 2nd harmonic.
    pub harmonic2: f32,
    /// Relative strength of the 3rd harmonic.
    pub harmonic3: f32,
    /// Exponential decay constant over the whole duration.
    pub decay_rate: f32,
    /// Samples along the string while vibrating.
    pub samples: usize,
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.3,
            frequency_hz: 15.0,
            duration: 0.5,
            harmonic2: 0.4,
            harmonic3: 0.2,
            decay_rate: 2.5,
            samples: 20,
        }
    }
}

/// Point breathing animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreathingConfig {
    /// Peak draw scale.
    pub scale: f32,
    /// Length of one breath in seconds.
    pub duration: f32,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            scale: 1.3,
            duration: 0.3,
        }
    }
}

/// Interaction and grab distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// How close a point must be to a string to interact.
    pub detection_radius: f32,
    /// How close the pointer must be to an anchor to grab it.
    pub grab_radius: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            detection_radius: 2.0,
            grab_radius: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value the engine relies on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }

        if !(self.string.radius > 0.0) {
            return Err(EngineError::geometry(format!(
                "string radius must be positive, got {}",
                self.string.radius
            )));
        }
        positive("string.min_frequency_hz", self.string.min_frequency_hz)?;
        duration("string.note_duration", self.string.note_duration)?;
        non_negative("string.retrigger_threshold", f64::from(self.string.retrigger_threshold))?;
        volume("string.volume", self.string.volume)?;
        adsr(&self.string.envelope)?;

        duration("click.duration", self.click.duration)?;
        volume("click.volume", self.click.volume)?;
        non_negative("click.envelope.attack", self.click.envelope.attack)?;
        non_negative("click.envelope.decay", self.click.envelope.decay)?;

        positive("vibrato.attack_tau", f64::from(self.vibrato.attack_tau))?;
        positive("vibrato.release_tau", f64::from(self.vibrato.release_tau))?;
        if self.vibrato.release_tau > self.vibrato.attack_tau {
            return Err(EngineError::invalid_param(
                "vibrato.release_tau",
                format!(
                    "release ({}) must not be slower than attack ({})",
                    self.vibrato.release_tau, self.vibrato.attack_tau
                ),
            ));
        }
        non_negative("vibrato.depth_semitones", self.vibrato.depth_semitones)?;
        non_negative("vibrato.rate_hz", self.vibrato.rate_hz)?;

        non_negative("deformer.strength", f64::from(self.deformer.strength))?;
        positive("deformer.smoothing", f64::from(self.deformer.smoothing))?;
        non_negative("deformer.ripple_amplitude", f64::from(self.deformer.ripple_amplitude))?;
        non_negative("deformer.ripple_hz", f64::from(self.deformer.ripple_hz))?;
        samples("deformer.segments", self.deformer.segments)?;
        non_negative("deformer.rest_threshold", f64::from(self.deformer.rest_threshold))?;

        non_negative("vibration.amplitude", f64::from(self.vibration.amplitude))?;
        non_negative("vibration.frequency_hz", f64::from(self.vibration.frequency_hz))?;
        duration("vibration.duration", f64::from(self.vibration.duration))?;
        non_negative("vibration.harmonic2", f64::from(self.vibration.harmonic2))?;
        non_negative("vibration.harmonic3", f64::from(self.vibration.harmonic3))?;
        non_negative("vibration.decay_rate", f64::from(self.vibration.decay_rate))?;
        samples("vibration.samples", self.vibration.samples)?;

        positive("breathing.scale", f64::from(self.breathing.scale))?;
        duration("breathing.duration", f64::from(self.breathing.duration))?;

        positive("interaction.detection_radius", f64::from(self.interaction.detection_radius))?;
        positive("interaction.grab_radius", f64::from(self.interaction.grab_radius))?;

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> EngineResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_param(name, format!("must be positive, got {}", value)))
    }
}

fn non_negative(name: &str, value: f64) -> EngineResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid_param(name, format!("must not be negative, got {}", value)))
    }
}

fn duration(name: &str, value: f64) -> EngineResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidDuration {
            name: name.to_string(),
            duration: value,
        })
    }
}

fn volume(name: &str, value: f32) -> EngineResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid_param(name, format!("must be in [0, 1], got {}", value)))
    }
}

fn samples(name: &str, value: usize) -> EngineResult<()> {
    if value >= 2 {
        Ok(())
    } else {
        Err(EngineError::invalid_param(name, format!("needs at least 2 samples, got {}", value)))
    }
}

fn adsr(params: &AdsrParams) -> EngineResult<()> {
    non_negative("string.envelope.attack", params.attack)?;
    non_negative("string.envelope.decay", params.decay)?;
    non_negative("string.envelope.release", params.release)?;
    if !(0.0..=1.0).contains(&params.sustain) {
        return Err(EngineError::invalid_param(
            "string.envelope.sustain",
            format!("must be in [0, 1], got {}", params.sustain),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "string": { "radius": 1.5 }, "vibrato": { "depth_semitones": 0.8 } }"#,
        )
        .unwrap();

        assert_eq!(config.string.radius, 1.5);
        assert_eq!(config.string.note_duration, 0.5);
        assert_eq!(config.vibrato.depth_semitones, 0.8);
        assert_eq!(config.vibrato.attack_tau, 0.1);
        assert_eq!(config.deformer, DeformerConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "strnig": {} }"#).unwrap_err();
        assert_eq!(err.code(), "ENGINE_005");
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut config = EngineConfig::default();
        config.string.radius = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_slow_release_rejected() {
        let mut config = EngineConfig::default();
        config.vibrato.release_tau = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vibrato.release_tau"));
    }

    #[test]
    fn test_single_sample_polyline_rejected() {
        let mut config = EngineConfig::default();
        config.deformer.segments = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_animation_values_must_be_finite() {
        let cases: [(&str, fn(&mut EngineConfig)); 9] = [
            ("deformer.strength", |c| c.deformer.strength = f32::NAN),
            ("deformer.ripple_amplitude", |c| c.deformer.ripple_amplitude = -0.1),
            ("deformer.ripple_hz", |c| c.deformer.ripple_hz = f32::INFINITY),
            ("vibration.amplitude", |c| c.vibration.amplitude = f32::NAN),
            ("vibration.frequency_hz", |c| c.vibration.frequency_hz = -1.0),
            ("vibration.harmonic2", |c| c.vibration.harmonic2 = f32::NAN),
            ("vibration.harmonic3", |c| c.vibration.harmonic3 = -0.2),
            ("vibration.decay_rate", |c| c.vibration.decay_rate = f32::NAN),
            ("breathing.scale", |c| c.breathing.scale = 0.0),
        ];
        for (name, corrupt) in cases {
            let mut config = EngineConfig::default();
            corrupt(&mut config);
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(name), "{} accepted: {}", name, err);
        }
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = EngineConfig {
            sample_rate: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidSampleRate { rate: 0 })
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = EngineConfig {
            seed: Some(7),
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}
