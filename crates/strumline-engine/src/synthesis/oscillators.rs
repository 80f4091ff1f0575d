//! Sine tone synthesis for the string voice.

use rand_pcg::Pcg32;

use crate::modulation::BakedVibrato;

use super::Synthesizer;

/// Two times pi.
pub const TWO_PI: f64 = std::f64::consts::TAU;

/// Phase accumulator for frequency-varying oscillators.
#[derive(Debug, Clone)]
pub struct PhaseAccumulator {
    phase: f64,
    sample_rate: f64,
}

impl PhaseAccumulator {
    /// Creates an accumulator starting at phase zero.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Returns the current phase in radians, then advances by one sample at
    /// `frequency` Hz.
    pub fn advance(&mut self, frequency: f64) -> f64 {
        let current = self.phase;
        self.phase += TWO_PI * frequency / self.sample_rate;
        if self.phase >= TWO_PI {
            self.phase %= TWO_PI;
        }
        current
    }
}

/// Sine wave synthesizer.
#[derive(Debug, Clone)]
pub struct SineTone {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Fixed vibrato rendered into the tone.
    pub vibrato: Option<BakedVibrato>,
}

impl SineTone {
    /// Creates a plain sine tone.
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            vibrato: None,
        }
    }
}

impl Synthesizer for SineTone {
    fn synthesize(&self, num_samples: usize, sample_rate: f64, _rng: &mut Pcg32) -> Vec<f64> {
        match self.vibrato {
            None => (0..num_samples)
                .map(|i| (TWO_PI * self.frequency * (i as f64 / sample_rate)).sin())
                .collect(),
            Some(vibrato) => {
                let mut phase_acc = PhaseAccumulator::new(sample_rate);
                (0..num_samples)
                    .map(|i| {
                        let t = i as f64 / sample_rate;
                        let freq = self.frequency * vibrato.pitch_ratio(t);
                        phase_acc.advance(freq).sin()
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulation::VibratoModulation;
    use crate::rng::create_rng;

    fn zero_crossings(samples: &[f64]) -> usize {
        samples
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count()
    }

    #[test]
    fn test_sine_frequency_by_zero_crossings() {
        let samples = SineTone::new(100.0).synthesize(44100, 44100.0, &mut create_rng(0));
        let crossings = zero_crossings(&samples);
        assert!((crossings as i64 - 200).abs() <= 2, "got {}", crossings);
    }

    #[test]
    fn test_zero_intensity_vibrato_matches_plain_tone() {
        let plain = SineTone::new(330.0).synthesize(2000, 44100.0, &mut create_rng(0));
        let baked = SineTone {
            frequency: 330.0,
            vibrato: Some(BakedVibrato {
                modulation: VibratoModulation::default(),
                intensity: 0.0,
            }),
        }
        .synthesize(2000, 44100.0, &mut create_rng(0));

        for (a, b) in plain.iter().zip(&baked) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_phase_wraps() {
        let mut acc = PhaseAccumulator::new(100.0);
        for _ in 0..1000 {
            let phase = acc.advance(37.0);
            assert!((0.0..TWO_PI).contains(&phase));
        }
    }
}
