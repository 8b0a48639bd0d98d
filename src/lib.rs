//! Tiltfall - a phone-tilt balance game core
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (tilt mapping, lean curve, life-cycle)
//! - `settings`: Data-driven level configuration
//! - `input`: Orientation providers and smoothing
//! - `audio`: Hazard channel mixing
//! - `scene`: Wiring between the simulation and its host collaborators

pub mod audio;
pub mod error;
pub mod input;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use scene::{FixedStepper, Scene};
pub use settings::{AudioSettings, DeathSounds, LevelSettings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the sensor rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the stepper (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Pitch (degrees) that corresponds to a raw intensity of 1.0
    pub const FULL_TILT_DEGREES: f32 = 90.0;
    /// Raw intensities below this are treated as zero when the remap domain collapses
    pub const TILT_EPSILON: f32 = 1e-6;

    /// Empirical scale applied to the end-of-stage snap factor
    pub const END_STAGE_SNAP_SCALE: f32 = 200.0;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let mut angle = angle % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Linear interpolation, unclamped
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b { 0.0 } else { (value - a) / (b - a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(350.0), -10.0);
        assert_eq!(normalize_degrees(720.0 + 45.0), 45.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
        assert_eq!(inverse_lerp(2.0, 10.0, 6.0), 0.5);
        assert_eq!(inverse_lerp(3.0, 3.0, 6.0), 0.0);
    }
}
