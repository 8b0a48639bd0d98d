//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit `dt` per tick, no wall clock
//! - No rendering, audio or platform dependencies
//! - Infallible once constructed

pub mod curve;
pub mod orientation;
pub mod state;
pub mod tick;

pub use curve::{Keyframe, LeanCurve};
pub use orientation::{
    CalibrationReference, OrientationMapper, TiltSensitivity, compute_tilt, relative_angles,
};
pub use state::{
    DeathEvent, FrameOutput, Hazard, HazardVolumes, LayerTargets, LifecycleConfig, LifecycleState,
    PerHazard, SceneLifecycle, SlideRange,
};
pub use tick::pose_from_tilt;
