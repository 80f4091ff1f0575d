//! Strumline CLI - Command-line interface for the geometric string instrument
//!
//! This binary looks up the pitch of a string geometry, renders notes and
//! clicks to WAV, and plays scripted pointer sessions headless.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use strumline_cli::commands;
use strumline_cli::commands::pitch::OriginInput;
use strumline_cli::commands::render::RenderRequest;
use strumline_engine::Vec2;

/// Strumline - Geometric String Instrument
#[derive(Parser)]
#[command(name = "strumline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine configuration JSON file (defaults apply when absent)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the note a string geometry plays
    Pitch {
        /// Origin x (world units)
        #[arg(
            long,
            allow_hyphen_values = true,
            requires = "y",
            conflicts_with_all = ["angle", "length"]
        )]
        x: Option<f32>,

        /// Origin y (world units)
        #[arg(long, allow_hyphen_values = true, requires = "x")]
        y: Option<f32>,

        /// Clockwise angle from 12 o'clock in degrees
        #[arg(short, long, requires = "length")]
        angle: Option<f32>,

        /// String length from the center (world units)
        #[arg(short, long, requires = "angle")]
        length: Option<f32>,

        /// Center x
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        center_x: f32,

        /// Center y
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        center_y: f32,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a note or a click to a WAV file
    Render {
        /// Note name with sharps and octave (e.g. D#5)
        #[arg(short, long, required_unless_present = "click", conflicts_with = "click")]
        note: Option<String>,

        /// Render a point click instead of a note
        #[arg(long)]
        click: bool,

        /// Bake vibrato into the note at this intensity (0 to 1)
        #[arg(long, default_value_t = 0.0)]
        vibrato: f64,

        /// Output WAV file path
        #[arg(short, long)]
        output: String,

        /// Noise seed (overrides the config)
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Play a scripted pointer session and report what happened
    Simulate {
        /// Scenario JSON file (built-in demo when absent)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Write the mixed audio of every voice to this WAV file
        #[arg(short, long)]
        output: Option<String>,

        /// Also print pitch and octave updates
        #[arg(long)]
        all_events: bool,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Noise seed (overrides the config)
        #[arg(long)]
        seed: Option<u32>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = commands::load_config(cli.config.as_deref()).and_then(|mut config| {
        match cli.command {
            Commands::Pitch {
                x,
                y,
                angle,
                length,
                center_x,
                center_y,
                json,
            } => {
                let origin = match (x, y, angle, length) {
                    (Some(x), Some(y), _, _) => OriginInput::At(Vec2::new(x, y)),
                    (_, _, Some(angle), Some(length)) => OriginInput::Polar { angle, length },
                    _ => anyhow::bail!("give the origin as --x/--y or --angle/--length"),
                };
                commands::pitch::run(&config, origin, Vec2::new(center_x, center_y), json)
            }
            Commands::Render {
                note,
                click,
                vibrato,
                output,
                seed,
            } => {
                config.seed = seed.or(config.seed);
                let request = match note {
                    Some(name) if !click => RenderRequest::Note { name, vibrato },
                    _ => RenderRequest::Click,
                };
                commands::render::run(&config, &request, &output)
            }
            Commands::Simulate {
                scenario,
                output,
                all_events,
                json,
                seed,
            } => {
                config.seed = seed.or(config.seed);
                commands::simulate::run(
                    &config,
                    scenario.as_deref(),
                    output.as_deref(),
                    all_events,
                    json,
                )
            }
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
