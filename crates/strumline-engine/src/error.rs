//! Error types for the instrument engine.
//!
//! Only construction and export can fail. Everything that runs inside the frame
//! loop recovers locally, so these errors never cross a frame boundary.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while assembling or configuring the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid duration.
    #[error("invalid duration for '{name}': {duration} seconds")]
    InvalidDuration {
        /// Which duration was rejected.
        name: String,
        /// The invalid duration.
        duration: f64,
    },

    /// Invalid string geometry (e.g. a non-positive pitch circle radius).
    #[error("invalid geometry: {message}")]
    InvalidGeometry {
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Stable error code, used by the CLI's JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidSampleRate { .. } => "ENGINE_001",
            EngineError::InvalidDuration { .. } => "ENGINE_002",
            EngineError::InvalidGeometry { .. } => "ENGINE_003",
            EngineError::InvalidParameter { .. } => "ENGINE_004",
            EngineError::Config(_) => "ENGINE_005",
            EngineError::Io(_) => "ENGINE_006",
        }
    }
}
