//! Strumline instrument engine.
//!
//! A geometric string instrument: a draggable line whose angle around its
//! center picks the pitch class and whose length picks the octave, plus point
//! "pluckers" that click when grabbed and, when close to a string, bend it and
//! add vibrato to its note.
//!
//! # Modules
//!
//! - [`pitch`] - Geometry to pitch class, octave and frequency
//! - [`envelope`] - ADSR and click amplitude curves
//! - [`synthesis`] - Sine and noise rendering into mono buffers
//! - [`proximity`] - Point-to-string distance and interaction strength
//! - [`modulation`] - Vibrato smoothing and pitch ratio
//! - [`animation`] - String vibration, string deformation, point breathing
//! - [`playback`] - Playback device trait, offline and stream voices
//! - [`instrument`] - String and point instruments
//! - [`controller`] - Registry, grab state machine and frame composition
//!
//! # Example
//!
//! ```no_run
//! use strumline_engine::{
//!     EngineConfig, FrameInput, InstrumentController, OfflineDevice, PointerSample,
//!     StringInstrument, Vec2,
//! };
//!
//! let config = EngineConfig::default();
//! let device = OfflineDevice::new(config.sample_rate);
//! let string = StringInstrument::new(Vec2::new(6.0, 0.0), Vec2::ZERO, &config)?
//!     .with_device(Box::new(device.clone()));
//!
//! let mut controller = InstrumentController::new(&config.interaction);
//! let events = controller.subscribe();
//! controller.add_string(string);
//!
//! controller.tick(&FrameInput {
//!     delta_time: 1.0 / 60.0,
//!     elapsed_time: 0.0,
//!     pointer: PointerSample::press(Vec2::new(6.0, 0.0)),
//! });
//! for event in events.try_iter() {
//!     println!("{:?}", event);
//! }
//! # Ok::<(), strumline_engine::EngineError>(())
//! ```

pub mod animation;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod instrument;
pub mod modulation;
pub mod pitch;
pub mod playback;
pub mod proximity;
pub mod rng;
pub mod synthesis;
pub mod wav;

pub use config::EngineConfig;
pub use controller::{GrabState, InstrumentController};
pub use envelope::{AdsrParams, ClickParams, Envelope};
pub use error::{EngineError, EngineResult};
pub use events::{EventBus, GrabTarget, InstrumentEvent, PointId, StringId};
pub use frame::{FrameCapture, FrameInput, PointerSample, PolylineRenderer};
pub use geometry::{LineGeometry, Vec2};
pub use instrument::{PointInstrument, StringInstrument};
pub use modulation::{VibratoController, VibratoModulation};
pub use pitch::{PitchGeometry, PitchState};
pub use playback::{ModulationFrame, OfflineDevice, PlaybackDevice};
pub use proximity::{Interaction, InteractionDetector};
pub use synthesis::{AudioBuffer, WaveformSynthesizer};
pub use wav::WavResult;
