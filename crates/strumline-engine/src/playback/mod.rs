//! Playback devices.
//!
//! Each instrument owns one exclusive [`PlaybackDevice`]. Buffers are rendered
//! on the frame thread at trigger time and handed over whole; vibrato reaches
//! the device every frame as a [`ModulationFrame`] and is applied as true pitch
//! modulation by moving the read head through the buffer at a variable rate.
//!
//! - `offline` - Recording device for headless sessions and tests
//! - `stream` - Split handle/renderer pair for push-based audio callbacks

pub mod offline;
pub mod stream;

use crate::synthesis::AudioBuffer;

pub use offline::OfflineDevice;
pub use stream::{stream_voice, AtomicIntensity, VoiceCommand, VoiceHandle, VoiceRenderer};

/// Per-frame vibrato state sent to a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationFrame {
    /// Smoothed vibrato intensity in `[0, 1]`.
    pub intensity: f32,
    /// Pitch ratio `2^(m/12)` at the frame clock.
    pub pitch_ratio: f64,
}

impl Default for ModulationFrame {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            pitch_ratio: 1.0,
        }
    }
}

/// A voice that plays rendered buffers.
pub trait PlaybackDevice: Send {
    /// Stops whatever is playing and starts `buffer`.
    fn play(&mut self, buffer: AudioBuffer);

    /// Stops playback. Stopping an idle device does nothing.
    fn stop(&mut self);

    /// Whether a buffer is still sounding.
    fn is_playing(&self) -> bool;

    /// Receives the vibrato state once per frame.
    fn modulate(&mut self, _frame: ModulationFrame) {}
}

/// Variable-rate reader over one buffer.
///
/// Each call to [`Sampler::next`] returns the sample under the read head
/// (linearly interpolated) and advances the head by `ratio` samples.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    buffer: Option<AudioBuffer>,
    position: f64,
}

impl Sampler {
    /// Creates an idle sampler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current buffer and rewinds.
    pub fn start(&mut self, buffer: AudioBuffer) {
        self.position = 0.0;
        self.buffer = if buffer.is_empty() { None } else { Some(buffer) };
    }

    /// Drops the current buffer.
    pub fn stop(&mut self) {
        self.buffer = None;
        self.position = 0.0;
    }

    /// Whether the read head is inside a buffer.
    pub fn is_playing(&self) -> bool {
        self.buffer.is_some()
    }

    /// Read head position in samples.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Reads one output sample and advances by `ratio`.
    ///
    /// Silence once the head runs past the end; the buffer is released then.
    pub fn next(&mut self, ratio: f64) -> f32 {
        let Some(buffer) = self.buffer.as_ref() else {
            return 0.0;
        };
        let index = self.position as usize;
        if index >= buffer.len() {
            self.stop();
            return 0.0;
        }

        let frac = (self.position - index as f64) as f32;
        let a = buffer.samples[index];
        let b = buffer.samples.get(index + 1).copied().unwrap_or(0.0);
        let value = a + (b - a) * frac;

        let step = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
        self.position += step;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_ratio_reads_buffer_verbatim() {
        let mut sampler = Sampler::new();
        sampler.start(AudioBuffer::new(vec![0.1, 0.2, 0.3], 100));

        let out: Vec<f32> = (0..4).map(|_| sampler.next(1.0)).collect();
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.0]);
        assert!(!sampler.is_playing());
    }

    #[test]
    fn test_fractional_ratio_interpolates() {
        let mut sampler = Sampler::new();
        sampler.start(AudioBuffer::new(vec![0.0, 1.0], 100));

        assert_eq!(sampler.next(0.5), 0.0);
        assert_eq!(sampler.next(0.5), 0.5);
        assert_eq!(sampler.next(0.5), 1.0);
    }

    fn samples_until_done(buffer: AudioBuffer, ratio: f64) -> usize {
        let mut sampler = Sampler::new();
        sampler.start(buffer);
        let mut count = 0;
        while sampler.is_playing() {
            sampler.next(ratio);
            count += 1;
        }
        count
    }

    #[test]
    fn test_higher_ratio_finishes_sooner() {
        let buffer = AudioBuffer::new(vec![0.5; 100], 100);
        assert_eq!(samples_until_done(buffer.clone(), 1.0), 101);
        assert!(samples_until_done(buffer, 1.06) < 101);
    }

    #[test]
    fn test_invalid_ratio_falls_back_to_unity() {
        let mut sampler = Sampler::new();
        sampler.start(AudioBuffer::new(vec![0.0; 10], 100));
        sampler.next(f64::NAN);
        assert_eq!(sampler.position(), 1.0);
        sampler.next(-2.0);
        assert_eq!(sampler.position(), 2.0);
    }

    #[test]
    fn test_empty_buffer_never_plays() {
        let mut sampler = Sampler::new();
        sampler.start(AudioBuffer::new(Vec::new(), 100));
        assert!(!sampler.is_playing());
    }
}
