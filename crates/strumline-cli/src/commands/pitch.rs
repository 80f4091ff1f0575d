//! Pitch command implementation
//!
//! Maps a string's endpoints to the note it would play.

use std::process::ExitCode;

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;
use strumline_engine::{EngineConfig, PitchGeometry, PitchState, Vec2};

/// Where the pitch end of the string sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginInput {
    /// Absolute world position.
    At(Vec2),
    /// Clockwise angle from 12 o'clock in degrees and length, relative to the center.
    Polar { angle: f32, length: f32 },
}

impl OriginInput {
    fn resolve(self, center: Vec2) -> Vec2 {
        match self {
            OriginInput::At(position) => position,
            OriginInput::Polar { angle, length } => center + Vec2::from_clock_angle(angle, length),
        }
    }
}

/// Machine-readable pitch lookup result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchReport {
    pub note: String,
    pub frequency_hz: f64,
    pub pitch_class: f32,
    pub octave: f32,
    pub origin: Vec2,
    pub center: Vec2,
}

impl PitchReport {
    fn new(pitch: &PitchState, origin: Vec2, center: Vec2) -> Self {
        Self {
            note: pitch.note_name(),
            frequency_hz: pitch.frequency_hz,
            pitch_class: pitch.pitch_class,
            octave: pitch.octave,
            origin,
            center,
        }
    }
}

/// Computes the pitch of a string without building an instrument.
pub fn lookup(config: &EngineConfig, origin: OriginInput, center: Vec2) -> Result<PitchReport> {
    let origin = origin.resolve(center);
    let geometry = PitchGeometry::new(config.string.min_frequency_hz);
    match geometry.compute(origin, center, config.string.radius) {
        Some(pitch) => Ok(PitchReport::new(&pitch, origin, center)),
        None => bail!(
            "string radius {} yields no pitch; it must be positive",
            config.string.radius
        ),
    }
}

/// Run the pitch command
///
/// # Arguments
/// * `config` - Engine configuration (radius and base frequency)
/// * `origin` - Pitch end of the string
/// * `center` - Circle center of the string
/// * `json` - Print a JSON object instead of colored text
pub fn run(
    config: &EngineConfig,
    origin: OriginInput,
    center: Vec2,
    json: bool,
) -> Result<ExitCode> {
    let report = lookup(config, origin, center)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} {}", "Note:".cyan().bold(), report.note.bold());
        println!("{} {:.2} Hz", "Frequency:".dimmed(), report.frequency_hz);
        println!(
            "{} pitch class {:.3}, octave {:.3}",
            "Position:".dimmed(),
            report.pitch_class,
            report.octave
        );
    }

    Ok(ExitCode::SUCCESS)
}
