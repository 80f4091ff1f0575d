//! Playable instruments.
//!
//! - `string` - Line whose angle and length select the note
//! - `point` - Plucker that clicks and drives vibrato on nearby strings

pub mod point;
pub mod string;

use crate::playback::{ModulationFrame, PlaybackDevice};
use crate::synthesis::AudioBuffer;

pub use point::PointInstrument;
pub use string::StringInstrument;

/// An instrument's exclusive output, which may be absent.
///
/// Without a device the instrument keeps running visual-only and says so once.
pub(crate) struct Voice {
    device: Option<Box<dyn PlaybackDevice>>,
    warned: bool,
    log_target: &'static str,
}

impl Voice {
    pub(crate) fn new(log_target: &'static str) -> Self {
        Self {
            device: None,
            warned: false,
            log_target,
        }
    }

    pub(crate) fn attach(&mut self, device: Box<dyn PlaybackDevice>) {
        self.device = Some(device);
        self.warned = false;
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.device.is_some()
    }

    pub(crate) fn play(&mut self, buffer: &AudioBuffer) {
        match self.device.as_mut() {
            Some(device) => {
                device.stop();
                device.play(buffer.clone());
            }
            None if !self.warned => {
                log::warn!(
                    target: self.log_target,
                    "no playback device attached, continuing without audio"
                );
                self.warned = true;
            }
            None => {}
        }
    }

    pub(crate) fn stop(&mut self) {
        if let Some(device) = self.device.as_mut() {
            device.stop();
        }
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.device.as_ref().is_some_and(|device| device.is_playing())
    }

    pub(crate) fn modulate(&mut self, frame: ModulationFrame) {
        if let Some(device) = self.device.as_mut() {
            device.modulate(frame);
        }
    }
}
