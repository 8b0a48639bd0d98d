//! Configuration errors
//!
//! Everything here is raised while building the simulation from settings.
//! The per-tick path never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("calibration reference must be a finite, non-zero vector (got {0:?})")]
    DegenerateReference([f32; 3]),
    #[error("tilt sensitivity {0} must be between 0.0 and 1.0")]
    SensitivityOutOfRange(f32),
    #[error("lean curve must contain at least one keyframe")]
    EmptyCurve,
    #[error("lean curve keyframe {index} is not after the previous keyframe")]
    UnsortedKeyframes { index: usize },
    #[error("lean curve keyframe {index} has a non-finite field")]
    NonFiniteKeyframe { index: usize },
    #[error("lean curve produces a non-finite value at {at}")]
    NonFiniteCurve { at: f32 },
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("death sound for {0} is empty")]
    MissingDeathSound(&'static str),
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings")]
    Parse(#[from] serde_json::Error),
}
