//! Lean response curve
//!
//! A keyframed cubic Hermite curve, the same shape animators author in an
//! engine curve editor. Inputs outside the keyed range clamp to the end keys.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of samples used when validating a curve
const VALIDATION_SAMPLES: usize = 64;

/// A single curve key with incoming and outgoing slopes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    /// Key with a single slope on both sides
    pub fn smooth(time: f32, value: f32, tangent: f32) -> Self {
        Self::new(time, value, tangent, tangent)
    }
}

/// Maps a normalized lean in [0, 1] to a slide intensity in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeanCurve {
    keys: Vec<Keyframe>,
}

impl Default for LeanCurve {
    fn default() -> Self {
        Self::ease_in()
    }
}

impl LeanCurve {
    /// Build a curve from keys sorted by strictly increasing time
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, ConfigError> {
        let curve = Self { keys };
        curve.validate()?;
        Ok(curve)
    }

    /// Straight line from (0, 0) to (1, 1)
    pub fn linear() -> Self {
        Self {
            keys: vec![Keyframe::smooth(0.0, 0.0, 1.0), Keyframe::smooth(1.0, 1.0, 1.0)],
        }
    }

    /// Flat near neutral, steep toward the extremes
    pub fn ease_in() -> Self {
        Self {
            keys: vec![Keyframe::smooth(0.0, 0.0, 0.0), Keyframe::smooth(1.0, 1.0, 2.0)],
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Check keys are present, ordered, finite, and sample to finite values
    ///
    /// Non-monotonic curves are allowed but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::EmptyCurve);
        }
        for (index, key) in self.keys.iter().enumerate() {
            let finite = key.time.is_finite()
                && key.value.is_finite()
                && key.in_tangent.is_finite()
                && key.out_tangent.is_finite();
            if !finite {
                return Err(ConfigError::NonFiniteKeyframe { index });
            }
            if index > 0 && key.time <= self.keys[index - 1].time {
                return Err(ConfigError::UnsortedKeyframes { index });
            }
        }

        let mut previous = self.evaluate(0.0);
        let mut monotonic = true;
        for i in 0..=VALIDATION_SAMPLES {
            let t = i as f32 / VALIDATION_SAMPLES as f32;
            let value = self.evaluate(t);
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteCurve { at: t });
            }
            if value < previous - 1e-5 {
                monotonic = false;
            }
            previous = value;
        }
        if !monotonic {
            log::warn!("Lean curve is not monotonic over [0, 1]; layers will reverse mid-lean");
        }
        Ok(())
    }

    /// Sample the curve at `t`
    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; t is inside the keyed range so i >= 1
        let i = self.keys.partition_point(|k| k.time <= t);
        let k0 = &self.keys[i - 1];
        let k1 = &self.keys[i];
        hermite(k0, k1, t)
    }
}

/// Cubic Hermite interpolation between two keys
fn hermite(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    let span = k1.time - k0.time;
    let s = (t - k0.time) / span;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * k0.value + h10 * span * k0.out_tangent + h01 * k1.value + h11 * span * k1.in_tangent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve() {
        let curve = LeanCurve::linear();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_outside_keys() {
        let curve = LeanCurve::linear();
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert_eq!(curve.evaluate(-0.3), 0.0);
        assert_eq!(curve.evaluate(2.0), 1.0);
    }

    #[test]
    fn test_nan_reads_first_key() {
        assert_eq!(LeanCurve::linear().evaluate(f32::NAN), 0.0);
        let curve = LeanCurve::new(vec![
            Keyframe::smooth(0.2, 0.4, 0.0),
            Keyframe::smooth(0.8, 0.9, 0.0),
        ])
        .unwrap();
        assert_eq!(curve.evaluate(f32::NAN), 0.4);
    }

    #[test]
    fn test_ease_in_shape() {
        let curve = LeanCurve::ease_in();
        assert!(curve.evaluate(0.25) < 0.25);
        assert!(curve.evaluate(0.5) < 0.5);
        assert_eq!(curve.evaluate(1.0), 1.0);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn test_multi_segment() {
        let curve = LeanCurve::new(vec![
            Keyframe::smooth(0.0, 0.0, 0.0),
            Keyframe::smooth(0.5, 0.2, 0.0),
            Keyframe::smooth(1.0, 1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(curve.evaluate(0.5), 0.2);
        let v = curve.evaluate(0.75);
        assert!(v > 0.2 && v < 1.0);
    }

    #[test]
    fn test_single_key_is_constant() {
        let curve = LeanCurve::new(vec![Keyframe::smooth(0.5, 0.7, 0.0)]).unwrap();
        assert_eq!(curve.evaluate(0.0), 0.7);
        assert_eq!(curve.evaluate(1.0), 0.7);
    }

    #[test]
    fn test_invalid_curves() {
        assert!(matches!(LeanCurve::new(vec![]), Err(ConfigError::EmptyCurve)));
        assert!(matches!(
            LeanCurve::new(vec![Keyframe::smooth(0.5, 0.0, 0.0), Keyframe::smooth(0.5, 1.0, 0.0)]),
            Err(ConfigError::UnsortedKeyframes { index: 1 })
        ));
        assert!(matches!(
            LeanCurve::new(vec![Keyframe::smooth(0.0, f32::INFINITY, 0.0)]),
            Err(ConfigError::NonFiniteKeyframe { index: 0 })
        ));
        assert!(matches!(
            LeanCurve::new(vec![Keyframe::smooth(0.0, 0.0, 0.0), Keyframe::smooth(f32::NAN, 1.0, 0.0)]),
            Err(ConfigError::NonFiniteKeyframe { index: 1 })
        ));
    }

    #[test]
    fn test_non_monotonic_is_accepted() {
        let curve = LeanCurve::new(vec![
            Keyframe::smooth(0.0, 0.0, 0.0),
            Keyframe::smooth(0.5, 0.9, 0.0),
            Keyframe::smooth(1.0, 0.1, 0.0),
        ]);
        assert!(curve.is_ok());
    }

    #[test]
    fn test_deserialize_default_tangents() {
        let json = r#"{"keys":[{"time":0.0,"value":0.0},{"time":1.0,"value":1.0}]}"#;
        let curve: LeanCurve = serde_json::from_str(json).unwrap();
        assert_eq!(curve.keys()[0].out_tangent, 0.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
    }
}
