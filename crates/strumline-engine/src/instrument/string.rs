//! The string instrument.

use crate::animation::{Collision, StringDeformer, StringVibrationAnimator};
use crate::config::{EngineConfig, StringConfig};
use crate::error::{EngineError, EngineResult};
use crate::events::StringNotice;
use crate::geometry::{LineGeometry, Vec2};
use crate::modulation::{VibratoController, VibratoModulation};
use crate::pitch::{PitchGeometry, PitchState};
use crate::playback::{ModulationFrame, PlaybackDevice};
use crate::rng::component_rng;
use crate::synthesis::{AudioBuffer, WaveformSynthesizer};

use super::Voice;

/// Notices kept for a string nobody drains; the oldest are dropped first.
const MAX_PENDING_NOTICES: usize = 64;

/// A draggable line whose geometry selects the note.
///
/// The origin sits on the pitch circle around the center: its clock angle
/// picks the pitch class and the line length picks the octave. Moving the
/// origin far enough re-triggers the note.
pub struct StringInstrument {
    geometry: LineGeometry,
    pitch_geometry: PitchGeometry,
    pitch: PitchState,
    last_played: Option<PitchState>,
    config: StringConfig,
    synth: WaveformSynthesizer,
    voice: Voice,
    vibrato: VibratoController,
    modulation: VibratoModulation,
    vibration: StringVibrationAnimator,
    deformer: StringDeformer,
    polyline: Vec<Vec2>,
    notices: Vec<StringNotice>,
}

impl std::fmt::Debug for StringInstrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInstrument")
            .field("geometry", &self.geometry)
            .field("pitch", &self.pitch)
            .field("last_played", &self.last_played)
            .field("has_device", &self.voice.is_attached())
            .finish_non_exhaustive()
    }
}

impl StringInstrument {
    /// Creates a silent string; attach a device with [`Self::with_device`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(origin: Vec2, center: Vec2, config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;

        let string = config.string.clone();
        let geometry = LineGeometry::new(origin, center, string.radius);
        let pitch_geometry = PitchGeometry::new(string.min_frequency_hz);
        let pitch = pitch_geometry.compute_line(&geometry).ok_or_else(|| {
            EngineError::geometry(format!("radius {} yields no pitch", string.radius))
        })?;

        Ok(Self {
            geometry,
            pitch_geometry,
            pitch,
            last_played: None,
            synth: WaveformSynthesizer::new(
                config.sample_rate,
                component_rng(config.seed, "string"),
            ),
            voice: Voice::new("strumline::string"),
            vibrato: VibratoController::new(config.vibrato.attack_tau, config.vibrato.release_tau),
            modulation: config.vibrato.modulation(),
            vibration: StringVibrationAnimator::new(config.vibration.clone(), origin, center),
            deformer: StringDeformer::new(config.deformer.clone(), origin, center),
            polyline: vec![origin, center],
            notices: Vec::new(),
            config: string,
        })
    }

    /// Attaches the playback device.
    pub fn with_device(mut self, device: Box<dyn PlaybackDevice>) -> Self {
        self.voice.attach(device);
        self
    }

    /// Pitch end of the string.
    pub fn origin(&self) -> Vec2 {
        self.geometry.origin
    }

    /// Circle center of the string.
    pub fn center(&self) -> Vec2 {
        self.geometry.center
    }

    /// Full line geometry.
    pub fn geometry(&self) -> &LineGeometry {
        &self.geometry
    }

    /// Current pitch.
    pub fn pitch(&self) -> &PitchState {
        &self.pitch
    }

    /// Pitch of the last note played, if any.
    pub fn last_played(&self) -> Option<&PitchState> {
        self.last_played.as_ref()
    }

    /// Current note name, e.g. `D#5`.
    pub fn note_name(&self) -> String {
        self.pitch.note_name()
    }

    /// Frequency of the current note.
    pub fn frequency_hz(&self) -> f64 {
        self.pitch.frequency_hz
    }

    /// Moves the origin; re-evaluates pitch and may re-trigger the note.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.geometry.origin = origin;
        self.geometry_changed();
        self.check_retrigger();
    }

    /// Moves the center; re-evaluates pitch without triggering.
    pub fn set_center(&mut self, center: Vec2) {
        self.geometry.center = center;
        self.geometry_changed();
    }

    /// Exchanges origin and center.
    pub fn swap_endpoints(&mut self) {
        self.geometry.swap_endpoints();
        self.geometry_changed();
    }

    /// Renders and plays the current note, pre-empting the previous one.
    ///
    /// Returns the buffer that was handed to the device, or `None` when the
    /// note could not be rendered.
    pub fn play_note(&mut self) -> Option<AudioBuffer> {
        let frequency_hz = self.pitch.frequency_hz;
        let mut buffer = self
            .synth
            .render_tone(frequency_hz, self.config.note_duration, self.config.envelope)?;
        for sample in &mut buffer.samples {
            *sample *= self.config.volume;
        }

        log::debug!(
            target: "strumline::string",
            "note {} at {:.2} Hz",
            self.pitch.note_name(),
            frequency_hz
        );
        self.voice.play(&buffer);
        self.vibration.trigger(self.geometry.origin, self.geometry.center);
        self.last_played = Some(self.pitch);
        self.notify(StringNotice::NotePlayed {
            frequency_hz,
            note: self.pitch.note_name(),
        });
        Some(buffer)
    }

    /// Stops the sounding note. Safe to call when nothing plays.
    pub fn stop_note(&mut self) {
        self.voice.stop();
    }

    /// Whether the device reports a sounding note.
    pub fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    /// Feeds this frame's strongest interaction, or `None` for no contact.
    ///
    /// # Arguments
    /// * `contact` - Strength in `[0, 1]` and the touching point's collision
    pub fn set_contact(&mut self, contact: Option<(f32, Collision)>) {
        match contact {
            Some((strength, collision)) => {
                self.vibrato.set_target(strength);
                self.deformer.trigger(collision);
            }
            None => self.vibrato.set_target(0.0),
        }
    }

    /// Advances vibrato, animators and the render polyline.
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous frame
    /// * `time` - Frame clock in seconds
    pub fn tick(&mut self, dt: f32, time: f32) {
        let intensity = self.vibrato.tick(dt);
        let pitch_ratio = self.modulation.pitch_ratio(f64::from(time), f64::from(intensity));
        self.voice.modulate(ModulationFrame {
            intensity,
            pitch_ratio,
        });

        self.vibration.tick(dt);
        self.deformer.tick(dt);

        self.vibration.render_into(&mut self.polyline, time);
        self.deformer.apply(&mut self.polyline, time);
    }

    /// Shape to draw this frame.
    pub fn polyline(&self) -> &[Vec2] {
        &self.polyline
    }

    /// Smoothed vibrato intensity.
    pub fn vibrato_intensity(&self) -> f32 {
        self.vibrato.current()
    }

    /// Smoothed deformation intensity.
    pub fn deformation_intensity(&self) -> f32 {
        self.deformer.intensity()
    }

    /// Whether the pluck vibration is running.
    pub fn is_vibrating(&self) -> bool {
        self.vibration.is_active()
    }

    /// Takes the changes reported since the last call.
    pub fn drain_notices(&mut self) -> std::vec::Drain<'_, StringNotice> {
        self.notices.drain(..)
    }

    fn geometry_changed(&mut self) {
        let (origin, center) = (self.geometry.origin, self.geometry.center);
        self.vibration.set_base(origin, center);
        self.deformer.set_base(origin, center);

        match self.pitch_geometry.compute_line(&self.geometry) {
            Some(pitch) => {
                let previous = std::mem::replace(&mut self.pitch, pitch);
                if pitch.pitch_class != previous.pitch_class {
                    self.notify(StringNotice::PitchChanged(pitch.pitch_class));
                }
                if pitch.octave != previous.octave {
                    self.notify(StringNotice::OctaveChanged(pitch.octave));
                }
            }
            None => log::debug!(target: "strumline::string", "pitch skipped, keeping previous"),
        }
    }

    fn notify(&mut self, notice: StringNotice) {
        if self.notices.len() >= MAX_PENDING_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(notice);
    }

    fn check_retrigger(&mut self) {
        let retrigger = match &self.last_played {
            Some(last) => self.pitch.differs_from(last, self.config.retrigger_threshold),
            None => true,
        };
        if retrigger {
            self.play_note();
        }
    }
}
