//! Vibrato modulation.
//!
//! Proximity between a point and a string produces a vibrato target; the
//! [`VibratoController`] smooths it and [`VibratoModulation`] turns the
//! smoothed intensity into a pitch ratio for the playing voice.

pub mod controller;
pub mod vibrato;


pub use controller::{smooth_toward, VibratoController};
pub use vibrato::{
    apply_pitch_modulation, semitones_to_ratio, BakedVibrato, VibratoModulation,
};
