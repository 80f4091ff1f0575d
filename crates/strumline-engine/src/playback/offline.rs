//! Recording playback device.
//!
//! Renders exactly what a real voice would output, including the continuous
//! vibrato, into a capture buffer. The host advances it with the frame clock.
//! Clones share state, so the host keeps one clone and hands the other to an
//! instrument.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{ModulationFrame, PlaybackDevice, Sampler};
use crate::synthesis::AudioBuffer;

const SAMPLE_EPSILON: f64 = 1e-3;

#[derive(Debug, Default)]
struct OfflineState {
    sampler: Sampler,
    modulation: ModulationFrame,
    captured: Vec<f32>,
    pending: f64,
    play_count: usize,
    stop_count: usize,
    last_buffer: Option<AudioBuffer>,
}

/// A device that records its output instead of sending it to hardware.
#[derive(Debug, Clone)]
pub struct OfflineDevice {
    sample_rate: u32,
    state: Arc<Mutex<OfflineState>>,
}

impl OfflineDevice {
    /// Creates a device capturing at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            state: Arc::new(Mutex::new(OfflineState::default())),
        }
    }

    /// Renders `dt` seconds of output into the capture buffer.
    ///
    /// The pitch ratio of the latest [`ModulationFrame`] holds for the whole
    /// step. Fractional samples carry over to the next call.
    pub fn advance(&self, dt: f32) {
        let mut state = self.state.lock();
        state.pending += f64::from(dt.max(0.0)) * f64::from(self.sample_rate);
        // f32 frame deltas are inexact; 0.02 s at 1 kHz must still be 20 samples
        let count = (state.pending + SAMPLE_EPSILON).floor();
        state.pending -= count;

        let ratio = state.modulation.pitch_ratio;
        for _ in 0..count as usize {
            let sample = state.sampler.next(ratio);
            state.captured.push(sample);
        }
    }

    /// Everything rendered so far.
    pub fn captured(&self) -> AudioBuffer {
        AudioBuffer::new(self.state.lock().captured.clone(), self.sample_rate)
    }

    /// Number of `play` calls.
    pub fn play_count(&self) -> usize {
        self.state.lock().play_count
    }

    /// Number of `stop` calls.
    pub fn stop_count(&self) -> usize {
        self.state.lock().stop_count
    }

    /// The buffer passed to the latest `play`.
    pub fn last_buffer(&self) -> Option<AudioBuffer> {
        self.state.lock().last_buffer.clone()
    }

    /// The latest modulation frame received.
    pub fn last_modulation(&self) -> ModulationFrame {
        self.state.lock().modulation
    }
}

impl PlaybackDevice for OfflineDevice {
    fn play(&mut self, buffer: AudioBuffer) {
        let mut state = self.state.lock();
        state.play_count += 1;
        state.last_buffer = Some(buffer.clone());
        state.sampler.start(buffer);
    }

    fn stop(&mut self) {
        let mut state = self.state.lock();
        state.stop_count += 1;
        state.sampler.stop();
    }

    fn is_playing(&self) -> bool {
        self.state.lock().sampler.is_playing()
    }

    fn modulate(&mut self, frame: ModulationFrame) {
        self.state.lock().modulation = frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_played_buffer() {
        let device = OfflineDevice::new(1000);
        let mut voice = device.clone();
        voice.play(AudioBuffer::new(vec![0.25; 10], 1000));
        assert!(device.is_playing());

        device.advance(0.02);
        let captured = device.captured();
        assert_eq!(captured.len(), 20);
        assert_eq!(&captured.samples[..10], &[0.25; 10]);
        assert_eq!(&captured.samples[10..], &[0.0; 10]);
        assert!(!device.is_playing());
    }

    #[test]
    fn test_fractional_frames_carry_over() {
        let device = OfflineDevice::new(1000);
        for _ in 0..3 {
            device.advance(0.0015);
        }
        assert_eq!(device.captured().len(), 4);
    }

    #[test]
    fn test_play_preempts_previous_buffer() {
        let device = OfflineDevice::new(1000);
        let mut voice = device.clone();
        voice.play(AudioBuffer::new(vec![0.5; 100], 1000));
        device.advance(0.005);
        voice.play(AudioBuffer::new(vec![-0.5; 100], 1000));
        device.advance(0.005);

        let captured = device.captured();
        assert_eq!(captured.samples[4], 0.5);
        assert_eq!(captured.samples[5], -0.5);
        assert_eq!(device.play_count(), 2);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let device = OfflineDevice::new(1000);
        let mut voice = device.clone();
        voice.stop();
        voice.stop();
        assert!(!device.is_playing());
        assert_eq!(device.stop_count(), 2);
    }

    #[test]
    fn test_pitch_ratio_speeds_up_read_head() {
        let device = OfflineDevice::new(1000);
        let mut voice = device.clone();
        voice.play(AudioBuffer::new(vec![0.1; 100], 1000));
        voice.modulate(ModulationFrame {
            intensity: 1.0,
            pitch_ratio: 2.0,
        });

        device.advance(0.06);
        assert!(!device.is_playing());
        assert_eq!(device.last_modulation().pitch_ratio, 2.0);
    }
}
