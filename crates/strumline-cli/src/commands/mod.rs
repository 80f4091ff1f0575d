//! CLI command implementations

pub mod pitch;
pub mod render;
pub mod simulate;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use strumline_engine::{AudioBuffer, EngineConfig, WavResult};

/// Loads the engine configuration from a JSON file, or the defaults.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config = EngineConfig::from_json_str(&json)
        .with_context(|| format!("Invalid config file: {}", path))?;
    log::debug!(target: "strumline::cli", "loaded config from {}", path);
    Ok(config)
}

/// Writes a buffer as 16-bit mono WAV and prints where it went.
pub(crate) fn write_wav(buffer: &AudioBuffer, output: &Path) -> Result<WavResult> {
    let wav = WavResult::from_buffer(buffer);
    wav.save(output)
        .with_context(|| format!("Failed to write WAV file: {}", output.display()))?;
    println!(
        "{} {} ({:.3}s, {} samples @ {} Hz)",
        "Wrote:".green().bold(),
        output.display(),
        wav.duration_seconds(),
        wav.num_samples,
        wav.sample_rate
    );
    println!("{} {}", "PCM hash:".dimmed(), wav.pcm_hash);
    Ok(wav)
}
