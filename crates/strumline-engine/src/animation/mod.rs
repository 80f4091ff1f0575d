//! Visual animators.
//!
//! - `vibration` - Decaying harmonic wobble of a plucked string
//! - `deformer` - Pull of a string toward a nearby point
//! - `breathing` - Scale pulse of a clicked point
//!
//! A string composes vibration first and deformation second, so the
//! deformer displaces whatever shape the vibration produced this frame.

pub mod breathing;
pub mod deformer;
pub mod vibration;

pub use breathing::PointAnimator;
pub use deformer::{Collision, StringDeformer};
pub use vibration::StringVibrationAnimator;
