//! Stream voice for push-based audio callbacks.
//!
//! [`stream_voice`] splits one voice into a [`VoiceHandle`] that stays on the
//! frame thread and a [`VoiceRenderer`] that moves into the audio callback.
//! Buffers travel over a bounded channel; the vibrato intensity is published
//! through an [`AtomicIntensity`] and the renderer evaluates the vibrato at
//! audio rate, so the callback never locks.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::{ModulationFrame, PlaybackDevice, Sampler};
use crate::modulation::VibratoModulation;
use crate::synthesis::AudioBuffer;

/// Commands queued for the renderer.
const COMMAND_CAPACITY: usize = 8;

/// An `f32` shared lock-free through its bit pattern.
#[derive(Debug, Default)]
pub struct AtomicIntensity(AtomicU32);

impl AtomicIntensity {
    /// Creates a cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    /// Stores a new value.
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Loads the current value.
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Messages from the handle to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceCommand {
    /// Replace the playing buffer.
    Play(AudioBuffer),
    /// Silence the voice.
    Stop,
}

/// Frame-thread side of a stream voice.
#[derive(Debug)]
pub struct VoiceHandle {
    commands: Sender<VoiceCommand>,
    intensity: Arc<AtomicIntensity>,
    playing: Arc<AtomicBool>,
}

/// Audio-thread side of a stream voice.
#[derive(Debug)]
pub struct VoiceRenderer {
    commands: Receiver<VoiceCommand>,
    intensity: Arc<AtomicIntensity>,
    playing: Arc<AtomicBool>,
    sampler: Sampler,
    modulation: VibratoModulation,
    sample_rate: f64,
    clock: u64,
}

/// Creates a connected handle/renderer pair.
///
/// # Arguments
/// * `sample_rate` - Rate the callback runs at, in Hz
/// * `modulation` - Vibrato depth and rate evaluated per sample
pub fn stream_voice(
    sample_rate: u32,
    modulation: VibratoModulation,
) -> (VoiceHandle, VoiceRenderer) {
    let (tx, rx) = crossbeam_channel::bounded(COMMAND_CAPACITY);
    let intensity = Arc::new(AtomicIntensity::new(0.0));
    let playing = Arc::new(AtomicBool::new(false));

    let handle = VoiceHandle {
        commands: tx,
        intensity: Arc::clone(&intensity),
        playing: Arc::clone(&playing),
    };
    let renderer = VoiceRenderer {
        commands: rx,
        intensity,
        playing,
        sampler: Sampler::new(),
        modulation,
        sample_rate: f64::from(sample_rate.max(1)),
        clock: 0,
    };
    (handle, renderer)
}

impl VoiceHandle {
    fn send(&self, command: VoiceCommand) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!(target: "strumline::voice", "voice queue full, dropping command");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!(target: "strumline::voice", "voice renderer gone");
                false
            }
        }
    }
}

impl PlaybackDevice for VoiceHandle {
    fn play(&mut self, buffer: AudioBuffer) {
        // Raised before sending so a renderer that finishes the buffer early
        // clears it last
        let previous = self.playing.swap(true, Ordering::AcqRel);
        if !self.send(VoiceCommand::Play(buffer)) {
            self.playing.store(previous, Ordering::Release);
        }
    }

    fn stop(&mut self) {
        self.send(VoiceCommand::Stop);
        self.playing.store(false, Ordering::Release);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    fn modulate(&mut self, frame: ModulationFrame) {
        self.intensity.store(frame.intensity);
    }
}

impl VoiceRenderer {
    /// Fills `out` with the next block of samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for command in self.commands.try_iter() {
            match command {
                VoiceCommand::Play(buffer) => self.sampler.start(buffer),
                VoiceCommand::Stop => self.sampler.stop(),
            }
        }

        let was_playing = self.sampler.is_playing();
        let intensity = f64::from(self.intensity.load());
        for sample in out.iter_mut() {
            let t = self.clock as f64 / self.sample_rate;
            *sample = self.sampler.next(self.modulation.pitch_ratio(t, intensity));
            self.clock += 1;
        }

        // Only the end of a buffer clears the flag; idle blocks leave it to the handle
        if was_playing && !self.sampler.is_playing() {
            self.playing.store(false, Ordering::Release);
        }
    }

    /// Whether the renderer is inside a buffer.
    pub fn is_playing(&self) -> bool {
        self.sampler.is_playing()
    }
}
