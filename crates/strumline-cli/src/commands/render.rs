//! Render command implementation
//!
//! Renders a single string note or point click to a WAV file, using the same
//! voices the instruments play through.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use strumline_engine::modulation::BakedVibrato;
use strumline_engine::pitch::NOTE_NAMES;
use strumline_engine::rng::component_rng;
use strumline_engine::synthesis::Source;
use strumline_engine::{AudioBuffer, EngineConfig, Envelope, PitchGeometry, WaveformSynthesizer};

/// Lowest and highest octave a string can reach.
const OCTAVE_RANGE: std::ops::RangeInclusive<i32> = 3..=7;

/// What to render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRequest {
    /// A string note by name (`D#5`), with optional baked vibrato intensity.
    Note { name: String, vibrato: f64 },
    /// A point click.
    Click,
}

/// Parses a sharp-spelled note name such as `C4` or `A#6` to its frequency.
pub fn note_frequency(config: &EngineConfig, name: &str) -> Result<f64> {
    let split = name
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .ok_or_else(|| anyhow!("note '{}' has no octave number", name))?;
    let (class, octave) = name.split_at(split);

    let semitone = NOTE_NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(class))
        .ok_or_else(|| anyhow!("unknown note name '{}' (use sharps, e.g. D#)", class))?;
    let octave: i32 = octave
        .parse()
        .map_err(|_| anyhow!("invalid octave '{}' in note '{}'", octave, name))?;
    if !OCTAVE_RANGE.contains(&octave) {
        bail!(
            "octave {} is outside the playable range {}..={}",
            octave,
            OCTAVE_RANGE.start(),
            OCTAVE_RANGE.end()
        );
    }

    let geometry = PitchGeometry::new(config.string.min_frequency_hz);
    Ok(geometry.frequency_for(semitone as f32, octave as f32))
}

/// Renders the requested sound at the configured volume.
pub fn render(config: &EngineConfig, request: &RenderRequest) -> Result<AudioBuffer> {
    config.validate()?;

    let (key, source, duration, envelope, volume) = match request {
        RenderRequest::Note { name, vibrato } => {
            if !(0.0..=1.0).contains(vibrato) {
                bail!("vibrato intensity must be within [0, 1], got {}", vibrato);
            }
            let frequency_hz = note_frequency(config, name)?;
            let baked = (*vibrato > 0.0).then(|| BakedVibrato {
                modulation: config.vibrato.modulation(),
                intensity: *vibrato,
            });
            (
                "render-note",
                Source::Tone {
                    frequency_hz,
                    vibrato: baked,
                },
                config.string.note_duration,
                Envelope::Adsr(config.string.envelope),
                config.string.volume,
            )
        }
        RenderRequest::Click => (
            "render-click",
            Source::Noise,
            config.click.duration,
            Envelope::Click(config.click.envelope),
            config.click.volume,
        ),
    };

    let mut synth = WaveformSynthesizer::new(config.sample_rate, component_rng(config.seed, key));
    let mut buffer = synth
        .render(source, duration, &envelope)
        .ok_or_else(|| anyhow!("nothing to render for {:?}", request))?;
    for sample in &mut buffer.samples {
        *sample *= volume;
    }
    Ok(buffer)
}

/// Run the render command
///
/// # Arguments
/// * `config` - Engine configuration
/// * `request` - Note or click
/// * `output` - Destination WAV path
pub fn run(config: &EngineConfig, request: &RenderRequest, output: &str) -> Result<ExitCode> {
    match request {
        RenderRequest::Note { name, .. } => {
            println!("{} note {}", "Rendering:".cyan().bold(), name)
        }
        RenderRequest::Click => println!("{} click", "Rendering:".cyan().bold()),
    }

    let buffer = render(config, request)?;
    super::write_wav(&buffer, Path::new(output))?;
    Ok(ExitCode::SUCCESS)
}
