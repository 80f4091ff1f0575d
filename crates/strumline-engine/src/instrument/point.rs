//! The point instrument.

use crate::animation::PointAnimator;
use crate::config::{ClickConfig, EngineConfig};
use crate::error::EngineResult;
use crate::geometry::Vec2;
use crate::playback::PlaybackDevice;
use crate::rng::component_rng;
use crate::synthesis::{AudioBuffer, WaveformSynthesizer};

use super::Voice;

/// A draggable plucker that clicks when grabbed.
pub struct PointInstrument {
    position: Vec2,
    config: ClickConfig,
    synth: WaveformSynthesizer,
    voice: Voice,
    animator: PointAnimator,
}

impl std::fmt::Debug for PointInstrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointInstrument")
            .field("position", &self.position)
            .field("has_device", &self.voice.is_attached())
            .finish_non_exhaustive()
    }
}

impl PointInstrument {
    /// Creates a silent point.
    ///
    /// # Arguments
    /// * `position` - World position
    /// * `config` - Engine configuration
    /// * `seed_key` - Keys this point's noise stream when `config.seed` is set
    pub fn new(position: Vec2, config: &EngineConfig, seed_key: &str) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            position,
            config: config.click.clone(),
            synth: WaveformSynthesizer::new(
                config.sample_rate,
                component_rng(config.seed, seed_key),
            ),
            voice: Voice::new("strumline::point"),
            animator: PointAnimator::new(config.breathing.clone()),
        })
    }

    /// Attaches the playback device.
    pub fn with_device(mut self, device: Box<dyn PlaybackDevice>) -> Self {
        self.voice.attach(device);
        self
    }

    /// World position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the point.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Plays a click and starts a breath.
    pub fn click(&mut self) -> Option<AudioBuffer> {
        self.animator.trigger();
        let mut buffer = self.synth.render_click(self.config.duration, self.config.envelope)?;
        for sample in &mut buffer.samples {
            *sample *= self.config.volume;
        }
        log::debug!(target: "strumline::point", "click at {:?}", self.position);
        self.voice.play(&buffer);
        Some(buffer)
    }

    /// Whether the click is still sounding.
    pub fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    /// Advances the breathing animation.
    pub fn tick(&mut self, dt: f32) {
        self.animator.tick(dt);
    }

    /// Draw scale, 1 at rest.
    pub fn scale(&self) -> f32 {
        self.animator.scale()
    }

    /// Whether a breath is in progress.
    pub fn is_breathing(&self) -> bool {
        self.animator.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::OfflineDevice;

    fn seeded() -> EngineConfig {
        EngineConfig {
            seed: Some(42),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_click_renders_and_breathes() {
        let device = OfflineDevice::new(44100);
        let mut point = PointInstrument::new(Vec2::ZERO, &seeded(), "point-0")
            .unwrap()
            .with_device(Box::new(device.clone()));

        let buffer = point.click().unwrap();
        assert_eq!(buffer.len(), 3528);
        assert!(buffer.peak() <= 0.8);
        assert!(point.is_breathing());
        assert_eq!(device.play_count(), 1);

        point.tick(0.15);
        assert!(point.scale() > 1.2);
        point.tick(0.2);
        assert_eq!(point.scale(), 1.0);
    }

    #[test]
    fn test_seeded_clicks_reproduce() {
        let mut a = PointInstrument::new(Vec2::ZERO, &seeded(), "point-0").unwrap();
        let mut b = PointInstrument::new(Vec2::ZERO, &seeded(), "point-0").unwrap();
        let mut c = PointInstrument::new(Vec2::ZERO, &seeded(), "point-1").unwrap();

        let first = a.click().unwrap();
        assert_eq!(first, b.click().unwrap());
        assert_ne!(first, c.click().unwrap());
    }

    #[test]
    fn test_click_tail_is_silent() {
        let mut point = PointInstrument::new(Vec2::ZERO, &seeded(), "point-0").unwrap();
        let buffer = point.click().unwrap();
        // attack + decay end at 65 ms of an 80 ms buffer
        let tail_start = (0.066 * 44100.0) as usize;
        assert!(buffer.samples[tail_start..].iter().all(|&s| s == 0.0));
    }
}
