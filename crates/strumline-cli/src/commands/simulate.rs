//! Simulate command implementation
//!
//! Drives the instrument controller headless with a scripted pointer, prints
//! the events it publishes and writes the mixed audio of every voice.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use strumline_engine::{
    AudioBuffer, EngineConfig, FrameCapture, FrameInput, InstrumentController, InstrumentEvent,
    OfflineDevice, PointInstrument, PointerSample, StringInstrument, Vec2,
};

const DEFAULT_DELTA_TIME: f32 = 1.0 / 60.0;

fn default_delta_time() -> f32 {
    DEFAULT_DELTA_TIME
}

/// A string placed at the start of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringPlacement {
    pub origin: Vec2,
    pub center: Vec2,
}

/// A scripted session: instruments plus one pointer sample per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Seconds per frame.
    #[serde(default = "default_delta_time")]
    pub delta_time: f32,
    pub strings: Vec<StringPlacement>,
    #[serde(default)]
    pub points: Vec<Vec2>,
    pub frames: Vec<PointerSample>,
}

impl Scenario {
    /// Loads a scenario from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))?;
        Ok(scenario)
    }

    /// Plucks a D#5 string, bends it up to F#5, then brings a point
    /// alongside it for vibrato and lets everything ring out.
    pub fn demo() -> Self {
        let origin = |angle: f32| Vec2::from_clock_angle(angle, 6.1);
        let point = Vec2::new(8.0, -6.0);
        let near_string = Vec2::new(0.8, -3.0);

        let mut frames = vec![PointerSample::press(origin(91.0))];
        frames.extend((1..=12).map(|i| PointerSample::drag(origin(91.0 + 7.5 * i as f32))));
        frames.push(PointerSample::release(origin(181.0)));
        frames.extend((0..10).map(|_| PointerSample::hover(origin(181.0))));

        frames.push(PointerSample::press(point));
        frames.extend(
            (1..=20).map(|i| PointerSample::drag(point.lerp(near_string, i as f32 / 20.0))),
        );
        frames.extend((0..30).map(|_| PointerSample::drag(near_string)));
        frames.push(PointerSample::release(near_string));
        frames.extend((0..45).map(|_| PointerSample::hover(Vec2::new(-10.0, -10.0))));

        Self {
            delta_time: DEFAULT_DELTA_TIME,
            strings: vec![StringPlacement {
                origin: origin(91.0),
                center: Vec2::ZERO,
            }],
            points: vec![point],
            frames,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.delta_time > 0.0) || !self.delta_time.is_finite() {
            bail!("delta_time must be positive, got {}", self.delta_time);
        }
        if self.strings.is_empty() && self.points.is_empty() {
            bail!("scenario has no instruments");
        }
        Ok(())
    }
}

/// An event with the frame that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub frame: usize,
    pub time: f32,
    #[serde(flatten)]
    pub event: InstrumentEvent,
}

/// Everything a session produced.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub events: Vec<TimedEvent>,
    pub mix: AudioBuffer,
    /// Shapes drawn on the last frame.
    pub last_frame: FrameCapture,
}

impl SimulationReport {
    /// Number of notes the strings started.
    pub fn notes_played(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.event, InstrumentEvent::NotePlayed { .. }))
            .count()
    }
}

/// Plays a scenario through the controller with recording devices.
pub fn simulate(config: &EngineConfig, scenario: &Scenario) -> Result<SimulationReport> {
    scenario.validate()?;

    let mut controller = InstrumentController::new(&config.interaction);
    let events = controller.subscribe();
    let mut devices = Vec::new();

    for placement in &scenario.strings {
        let device = OfflineDevice::new(config.sample_rate);
        let string = StringInstrument::new(placement.origin, placement.center, config)?
            .with_device(Box::new(device.clone()));
        controller.add_string(string);
        devices.push(device);
    }
    for (index, &position) in scenario.points.iter().enumerate() {
        let device = OfflineDevice::new(config.sample_rate);
        let point = PointInstrument::new(position, config, &format!("point-{}", index))?
            .with_device(Box::new(device.clone()));
        controller.add_point(point);
        devices.push(device);
    }

    let mut timed = Vec::new();
    let mut time = 0.0;
    for (frame, &pointer) in scenario.frames.iter().enumerate() {
        controller.tick(&FrameInput {
            delta_time: scenario.delta_time,
            elapsed_time: time,
            pointer,
        });
        for device in &devices {
            device.advance(scenario.delta_time);
        }
        timed.extend(events.try_iter().map(|event| TimedEvent { frame, time, event }));
        time += scenario.delta_time;
    }

    let mut last_frame = FrameCapture::default();
    controller.render(&mut last_frame);

    log::info!(
        target: "strumline::cli",
        "simulated {} frames, {} events",
        scenario.frames.len(),
        timed.len()
    );

    Ok(SimulationReport {
        events: timed,
        mix: mix_down(&devices, config.sample_rate),
        last_frame,
    })
}

/// Sums every device's capture, clamped to full scale.
fn mix_down(devices: &[OfflineDevice], sample_rate: u32) -> AudioBuffer {
    let mut mix: Vec<f32> = Vec::new();
    for device in devices {
        let captured = device.captured();
        if captured.samples.len() > mix.len() {
            mix.resize(captured.samples.len(), 0.0);
        }
        for (out, sample) in mix.iter_mut().zip(&captured.samples) {
            *out += sample;
        }
    }
    for sample in &mut mix {
        *sample = sample.clamp(-1.0, 1.0);
    }
    AudioBuffer::new(mix, sample_rate)
}

fn describe(event: &InstrumentEvent) -> String {
    match event {
        InstrumentEvent::PitchChanged {
            string,
            pitch_class,
        } => format!("string {} pitch class {:.3}", string.0, pitch_class),
        InstrumentEvent::OctaveChanged { string, octave } => {
            format!("string {} octave {:.3}", string.0, octave)
        }
        InstrumentEvent::NotePlayed {
            string,
            frequency_hz,
            note,
        } => format!(
            "string {} played {} ({:.2} Hz)",
            string.0,
            note.bold(),
            frequency_hz
        ),
        InstrumentEvent::Clicked { point } => format!("point {} clicked", point.0),
        InstrumentEvent::Grabbed { target } => format!("grabbed {:?}", target),
        InstrumentEvent::Released { target } => format!("released {:?}", target),
    }
}

/// Run the simulate command
///
/// # Arguments
/// * `config` - Engine configuration
/// * `scenario_path` - Scenario JSON file; the built-in demo when absent
/// * `output` - Optional WAV path for the mixed audio
/// * `all_events` - Also print pitch and octave updates
/// * `json` - Print one JSON object per event
pub fn run(
    config: &EngineConfig,
    scenario_path: Option<&str>,
    output: Option<&str>,
    all_events: bool,
    json: bool,
) -> Result<ExitCode> {
    let scenario = match scenario_path {
        Some(path) => Scenario::from_file(Path::new(path))?,
        None => Scenario::demo(),
    };
    if !json {
        println!(
            "{} {} ({} frames)",
            "Simulating:".cyan().bold(),
            scenario_path.unwrap_or("built-in demo"),
            scenario.frames.len()
        );
    }

    let report = simulate(config, &scenario)?;

    for timed in &report.events {
        let routine = matches!(
            timed.event,
            InstrumentEvent::PitchChanged { .. } | InstrumentEvent::OctaveChanged { .. }
        );
        if routine && !all_events {
            continue;
        }
        if json {
            println!("{}", serde_json::to_string(timed)?);
        } else {
            println!(
                "{} {}",
                format!("[{:>4} {:>7.3}s]", timed.frame, timed.time).dimmed(),
                describe(&timed.event)
            );
        }
    }

    if !json {
        println!(
            "{} {} notes, {} events",
            "Done:".green().bold(),
            report.notes_played(),
            report.events.len()
        );
    }
    if let Some(output) = output {
        super::write_wav(&report.mix, Path::new(output))?;
    }

    Ok(ExitCode::SUCCESS)
}
