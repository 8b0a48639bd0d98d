//! Orientation to tilt mapping
//!
//! Turns a smoothed orientation sample into a signed lean value in [-1, 1],
//! relative to a calibrated neutral orientation.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{FULL_TILT_DEGREES, TILT_EPSILON};
use crate::error::ConfigError;
use crate::{inverse_lerp, lerp, normalize_degrees};

/// The orientation treated as "standing neutrally"
///
/// Always finite and of unit length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec3", into = "Vec3")]
pub struct CalibrationReference(Vec3);

impl CalibrationReference {
    pub fn new(direction: Vec3) -> Result<Self, ConfigError> {
        if !direction.is_finite() || direction.length_squared() <= f32::EPSILON {
            return Err(ConfigError::DegenerateReference(direction.to_array()));
        }
        Ok(Self(direction.normalize()))
    }

    /// Unit direction of the neutral orientation
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.0
    }
}

impl TryFrom<Vec3> for CalibrationReference {
    type Error = ConfigError;

    fn try_from(direction: Vec3) -> Result<Self, Self::Error> {
        Self::new(direction)
    }
}

impl From<CalibrationReference> for Vec3 {
    fn from(reference: CalibrationReference) -> Self {
        reference.0
    }
}

/// How little physical tilt is needed to saturate the output (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct TiltSensitivity(f32);

impl TiltSensitivity {
    pub fn new(value: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::SensitivityOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Remap a raw intensity from [-(1-s), 1-s] onto [-1, 1], clamped
    ///
    /// When the domain collapses (s = 1) any non-zero input saturates.
    pub fn remap(&self, raw: f32) -> f32 {
        let half_width = 1.0 - self.0;
        if half_width <= TILT_EPSILON {
            return if raw > TILT_EPSILON {
                1.0
            } else if raw < -TILT_EPSILON {
                -1.0
            } else {
                0.0
            };
        }
        let t = inverse_lerp(-half_width, half_width, raw);
        lerp(-1.0, 1.0, t).clamp(-1.0, 1.0)
    }
}

impl TryFrom<f32> for TiltSensitivity {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TiltSensitivity> for f32 {
    fn from(sensitivity: TiltSensitivity) -> Self {
        sensitivity.0
    }
}

/// Per-axis angles (degrees, each in (-180, 180]) of the shortest-arc
/// rotation taking `reference` onto `raw`
///
/// `x` is pitch (forward/back), `y` yaw, `z` roll. Decomposed yaw-pitch-roll.
pub fn relative_angles(raw: Vec3, reference: &CalibrationReference) -> Vec3 {
    let raw = raw.normalize_or_zero();
    if raw == Vec3::ZERO || !raw.is_finite() {
        return Vec3::ZERO;
    }
    let rotation = Quat::from_rotation_arc(reference.direction(), raw);
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        normalize_degrees(pitch.to_degrees()),
        normalize_degrees(yaw.to_degrees()),
        normalize_degrees(roll.to_degrees()),
    )
}

/// Map a raw orientation to a signed lean value in [-1, 1]
///
/// Degenerate samples (zero length or non-finite) read as neutral.
pub fn compute_tilt(raw: Vec3, reference: &CalibrationReference, sensitivity: TiltSensitivity) -> f32 {
    let angles = relative_angles(raw, reference);
    let intensity = angles.x / FULL_TILT_DEGREES;
    sensitivity.remap(intensity)
}

/// Owns the calibration and sensitivity for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationMapper {
    reference: CalibrationReference,
    sensitivity: TiltSensitivity,
}

impl OrientationMapper {
    pub fn new(reference: CalibrationReference, sensitivity: TiltSensitivity) -> Self {
        Self {
            reference,
            sensitivity,
        }
    }

    pub fn reference(&self) -> CalibrationReference {
        self.reference
    }

    pub fn sensitivity(&self) -> TiltSensitivity {
        self.sensitivity
    }

    /// Tilt for the current sample
    #[inline]
    pub fn tilt(&self, raw: Vec3) -> f32 {
        compute_tilt(raw, &self.reference, self.sensitivity)
    }

    /// Treat `sample` as the new neutral orientation
    ///
    /// The previous reference is kept if `sample` is degenerate.
    pub fn recalibrate(&mut self, sample: Vec3) -> Result<(), ConfigError> {
        self.reference = CalibrationReference::new(sample)?;
        log::info!("Recalibrated neutral orientation to {:?}", self.reference.direction());
        Ok(())
    }
}
