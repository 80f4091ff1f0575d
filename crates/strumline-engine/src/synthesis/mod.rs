//! Waveform synthesis.
//!
//! Each note trigger renders a fresh mono buffer:
//! - `oscillators` - Sine tone for the string, with optional baked vibrato
//! - `noise` - White noise burst for the point's click
//!
//! [`WaveformSynthesizer`] combines a source with an envelope and owns the
//! noise generator of the instrument it belongs to.

pub mod noise;
pub mod oscillators;

use rand_pcg::Pcg32;

use crate::envelope::{sample_count, AdsrParams, ClickParams, Envelope};
use crate::modulation::BakedVibrato;

pub use noise::NoiseBurst;
pub use oscillators::{PhaseAccumulator, SineTone};

/// Common trait for sample sources.
pub trait Synthesizer {
    /// Generates raw (un-enveloped) audio samples.
    ///
    /// # Arguments
    /// * `num_samples` - Number of samples to generate
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `rng` - Random source for noise
    ///
    /// # Returns
    /// Vector of audio samples in range [-1.0, 1.0]
    fn synthesize(&self, num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64>;
}

/// A rendered mono buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples in `[-1, 1]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Creates a buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Root-mean-square level.
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        (sum / self.samples.len() as f64).sqrt()
    }
}

/// What to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    /// Sine tone at a frequency, optionally with vibrato baked in.
    Tone {
        /// Frequency in Hz.
        frequency_hz: f64,
        /// Fixed vibrato rendered into the buffer.
        vibrato: Option<BakedVibrato>,
    },
    /// Uniform white noise.
    Noise,
}

/// Renders enveloped buffers for one voice.
#[derive(Debug, Clone)]
pub struct WaveformSynthesizer {
    sample_rate: u32,
    rng: Pcg32,
}

impl WaveformSynthesizer {
    /// Creates a synthesizer.
    ///
    /// # Arguments
    /// * `sample_rate` - Output sample rate in Hz
    /// * `rng` - Noise generator owned by this voice
    pub fn new(sample_rate: u32, rng: Pcg32) -> Self {
        Self { sample_rate, rng }
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Renders `source` shaped by `envelope`.
    ///
    /// Returns `None` for requests that cannot produce sound: a non-positive
    /// duration, a non-positive frequency, or a zero sample rate. These are
    /// no-ops rather than errors because they arise from degenerate geometry.
    pub fn render(
        &mut self,
        source: Source,
        duration: f64,
        envelope: &Envelope,
    ) -> Option<AudioBuffer> {
        if let Source::Tone { frequency_hz, .. } = source {
            if !(frequency_hz > 0.0) || !frequency_hz.is_finite() {
                log::debug!(target: "strumline::synth", "skipping tone at {} Hz", frequency_hz);
                return None;
            }
        }

        let sample_rate = f64::from(self.sample_rate);
        let num_samples = sample_count(sample_rate, duration);
        if num_samples == 0 {
            log::debug!(target: "strumline::synth", "skipping empty render ({} s)", duration);
            return None;
        }

        let raw = match source {
            Source::Tone {
                frequency_hz,
                vibrato,
            } => SineTone {
                frequency: frequency_hz,
                vibrato,
            }
            .synthesize(num_samples, sample_rate, &mut self.rng),
            Source::Noise => NoiseBurst.synthesize(num_samples, sample_rate, &mut self.rng),
        };

        let samples = raw
            .iter()
            .enumerate()
            .map(|(i, &s)| (s * envelope.value_at(i as f64 / sample_rate, duration)) as f32)
            .collect();

        Some(AudioBuffer::new(samples, self.sample_rate))
    }

    /// Renders a sine tone with an ADSR envelope.
    pub fn render_tone(
        &mut self,
        frequency_hz: f64,
        duration: f64,
        adsr: AdsrParams,
    ) -> Option<AudioBuffer> {
        self.render(
            Source::Tone {
                frequency_hz,
                vibrato: None,
            },
            duration,
            &Envelope::Adsr(adsr),
        )
    }

    /// Renders a noise click.
    pub fn render_click(&mut self, duration: f64, click: ClickParams) -> Option<AudioBuffer> {
        self.render(Source::Noise, duration, &Envelope::Click(click))
    }
}
