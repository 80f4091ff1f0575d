//! Amplitude envelopes.
//!
//! Both shapes are stateless functions of elapsed time: the string's sustained
//! ADSR and the point's attack-decay click. Every segment is linear, so the
//! curve is continuous at each phase boundary.

use serde::{Deserialize, Serialize};

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.6,
            release: 0.3,
        }
    }
}

impl AdsrParams {
    /// Creates new ADSR parameters.
    ///
    /// Negative times are clamped to zero and the sustain level to `[0, 1]`.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }

    /// Returns parameters that fit inside a note of `duration` seconds.
    ///
    /// When attack, decay and release together exceed the duration they are
    /// compressed proportionally, so the sustain phase shrinks to nothing and
    /// release still ends exactly at `duration`.
    pub fn fit(&self, duration: f64) -> AdsrParams {
        let clean = AdsrParams::new(self.attack, self.decay, self.sustain, self.release);
        if !(duration > 0.0) {
            return AdsrParams {
                attack: 0.0,
                decay: 0.0,
                release: 0.0,
                ..clean
            };
        }

        let total = clean.attack + clean.decay + clean.release;
        if total <= duration {
            return clean;
        }

        let scale = duration / total;
        AdsrParams {
            attack: clean.attack * scale,
            decay: clean.decay * scale,
            sustain: clean.sustain,
            release: clean.release * scale,
        }
    }

    /// Amplitude at time `t` of a note lasting `duration` seconds.
    pub fn value_at(&self, t: f64, duration: f64) -> f64 {
        if !(t >= 0.0) || t >= duration {
            return 0.0;
        }

        let p = self.fit(duration);
        let sustain_start = p.attack + p.decay;
        let release_start = duration - p.release;

        if t < p.attack {
            t / p.attack
        } else if t < sustain_start {
            let progress = (t - p.attack) / p.decay;
            1.0 - progress * (1.0 - p.sustain)
        } else if t < release_start {
            p.sustain
        } else {
            let progress = ((t - release_start) / p.release).clamp(0.0, 1.0);
            p.sustain * (1.0 - progress)
        }
    }
}

/// Click envelope parameters (attack then decay to silence).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClickParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
}

impl Default for ClickParams {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.06,
        }
    }
}

impl ClickParams {
    /// Creates new click parameters, clamping negative times to zero.
    pub fn new(attack: f64, decay: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
        }
    }

    /// Amplitude at time `t`. Silent after `attack + decay`.
    pub fn value_at(&self, t: f64) -> f64 {
        let p = ClickParams::new(self.attack, self.decay);
        if !(t >= 0.0) {
            0.0
        } else if t < p.attack {
            t / p.attack
        } else if t < p.attack + p.decay {
            1.0 - (t - p.attack) / p.decay
        } else {
            0.0
        }
    }
}

/// Envelope shape applied to a rendered buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Sustained attack-decay-sustain-release.
    Adsr(AdsrParams),
    /// Short percussive attack-decay.
    Click(ClickParams),
}

impl Envelope {
    /// Amplitude at time `t` of a buffer lasting `duration` seconds.
    pub fn value_at(&self, t: f64, duration: f64) -> f64 {
        match self {
            Envelope::Adsr(params) => params.value_at(t, duration),
            Envelope::Click(params) => {
                if t >= duration {
                    0.0
                } else {
                    params.value_at(t)
                }
            }
        }
    }

    /// Generates the envelope curve sampled at `sample_rate` for `duration`.
    ///
    /// # Returns
    /// `round(sample_rate * duration)` values in `[0, 1]`
    pub fn generate(&self, sample_rate: f64, duration: f64) -> Vec<f64> {
        let num_samples = sample_count(sample_rate, duration);
        (0..num_samples)
            .map(|i| self.value_at(i as f64 / sample_rate, duration))
            .collect()
    }
}

/// Number of samples in a buffer of `duration` seconds.
pub fn sample_count(sample_rate: f64, duration: f64) -> usize {
    if !(duration > 0.0) || !(sample_rate > 0.0) {
        return 0;
    }
    (sample_rate * duration).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adsr_default() {
        let params = AdsrParams::default();
        assert_eq!(params.attack, 0.01);
        assert_eq!(params.decay, 0.1);
        assert_eq!(params.sustain, 0.6);
        assert_eq!(params.release, 0.3);
    }

    #[test]
    fn test_adsr_phases() {
        let params = AdsrParams::new(0.1, 0.1, 0.5, 0.2);
        let duration = 1.0;

        assert_eq!(params.value_at(0.0, duration), 0.0);
        assert!((params.value_at(0.05, duration) - 0.5).abs() < 1e-9);
        assert!((params.value_at(0.15, duration) - 0.75).abs() < 1e-9);
        assert_eq!(params.value_at(0.5, duration), 0.5);
        assert!((params.value_at(0.9, duration) - 0.25).abs() < 1e-9);
        assert_eq!(params.value_at(1.0, duration), 0.0);
    }

    #[test]
    fn test_adsr_compressed_when_too_long() {
        let params = AdsrParams::new(0.2, 0.2, 0.5, 0.6);
        let fitted = params.fit(0.5);

        let total = fitted.attack + fitted.decay + fitted.release;
        assert!((total - 0.5).abs() < 1e-12);
        assert!((fitted.attack / fitted.release - 0.2 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_adsr_never_nan() {
        let degenerate = [
            AdsrParams::new(0.0, 0.0, 0.5, 0.0),
            AdsrParams::new(0.0, 0.0, 0.5, 1.0),
            AdsrParams::new(1.0, 1.0, 0.5, 1.0),
            AdsrParams::new(-1.0, -1.0, 2.0, -1.0),
        ];
        for params in degenerate {
            for i in 0..100 {
                let t = i as f64 * 0.01;
                let value = params.value_at(t, 0.5);
                assert!(value.is_finite(), "{:?} at {} gave {}", params, t, value);
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_click_shape() {
        let click = ClickParams::new(0.01, 0.04);
        assert_eq!(click.value_at(0.0), 0.0);
        assert!((click.value_at(0.005) - 0.5).abs() < 1e-9);
        assert!((click.value_at(0.01) - 1.0).abs() < 1e-9);
        assert!((click.value_at(0.03) - 0.5).abs() < 1e-9);
        assert_eq!(click.value_at(0.05), 0.0);
        assert_eq!(click.value_at(0.2), 0.0);
    }

    #[test]
    fn test_generate_length() {
        let envelope = Envelope::Adsr(AdsrParams::default());
        assert_eq!(envelope.generate(1000.0, 0.5).len(), 500);
        assert_eq!(envelope.generate(44100.0, 0.08).len(), 3528);
        assert!(envelope.generate(44100.0, 0.0).is_empty());
    }
}
