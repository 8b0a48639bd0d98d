//! Orientation input
//!
//! Providers hand the simulation one orientation sample per tick. Real
//! hardware lives outside this crate; the simulated providers here drive
//! headless runs and tests.

use std::collections::VecDeque;

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Supplies one smoothed orientation sample per tick
pub trait OrientationProvider {
    fn sample(&mut self) -> Vec3;
}

/// Moving average over the last `window` samples
#[derive(Debug, Clone)]
pub struct OrientationSmoother {
    window: usize,
    samples: VecDeque<Vec3>,
    sum: Vec3,
}

impl OrientationSmoother {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            sum: Vec3::ZERO,
        }
    }

    /// Feed a raw reading and return the current average
    pub fn push(&mut self, raw: Vec3) -> Vec3 {
        // Non-finite readings would poison the running sum
        if raw.is_finite() {
            if self.samples.len() == self.window {
                if let Some(oldest) = self.samples.pop_front() {
                    self.sum -= oldest;
                }
            }
            self.samples.push_back(raw);
            self.sum += raw;
        }
        self.average()
    }

    pub fn average(&self) -> Vec3 {
        if self.samples.is_empty() {
            Vec3::ZERO
        } else {
            self.sum / self.samples.len() as f32
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.sum = Vec3::ZERO;
    }
}

/// Wraps a raw provider and smooths its output
pub struct Smoothed<P> {
    inner: P,
    smoother: OrientationSmoother,
}

impl<P: OrientationProvider> Smoothed<P> {
    pub fn new(inner: P, window: usize) -> Self {
        Self {
            inner,
            smoother: OrientationSmoother::new(window),
        }
    }
}

impl<P: OrientationProvider> OrientationProvider for Smoothed<P> {
    fn sample(&mut self) -> Vec3 {
        let raw = self.inner.sample();
        self.smoother.push(raw)
    }
}

/// Replays a fixed list of forward/back pitches (degrees) around a neutral
/// orientation, holding the last one when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedOrientation {
    neutral: Vec3,
    pitches: Vec<f32>,
    cursor: usize,
}

impl ScriptedOrientation {
    pub fn new(neutral: Vec3, pitches: Vec<f32>) -> Self {
        Self {
            neutral,
            pitches,
            cursor: 0,
        }
    }
}

impl OrientationProvider for ScriptedOrientation {
    fn sample(&mut self) -> Vec3 {
        let Some(&pitch) = self.pitches.get(self.cursor).or(self.pitches.last()) else {
            return self.neutral;
        };
        self.cursor = (self.cursor + 1).min(self.pitches.len());
        pitch_about(self.neutral, pitch)
    }
}

/// A player who sways around neutral and slowly loses balance
///
/// Seeded, so the same seed always produces the same run.
#[derive(Debug, Clone)]
pub struct WobbleOrientation {
    neutral: Vec3,
    rng: Pcg32,
    pitch: f32,
    /// Degrees of random sway per sample
    sway: f32,
    /// Degrees of steady drift per sample
    drift: f32,
}

impl WobbleOrientation {
    pub fn new(neutral: Vec3, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let drift = if rng.random_bool(0.5) { 0.15 } else { -0.15 };
        Self {
            neutral,
            rng,
            pitch: 0.0,
            sway: 1.5,
            drift,
        }
    }

    pub fn with_motion(mut self, sway: f32, drift: f32) -> Self {
        self.sway = sway.abs();
        self.drift = drift;
        self
    }

    /// Current pitch away from neutral (degrees)
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl OrientationProvider for WobbleOrientation {
    fn sample(&mut self) -> Vec3 {
        let sway = if self.sway > 0.0 {
            self.rng.random_range(-self.sway..=self.sway)
        } else {
            0.0
        };
        self.pitch = (self.pitch + sway + self.drift).clamp(-89.0, 89.0);
        pitch_about(self.neutral, self.pitch)
    }
}

/// Rotate `neutral` forward/back by `degrees`
fn pitch_about(neutral: Vec3, degrees: f32) -> Vec3 {
    // Forward/back is a rotation about the axis perpendicular to the neutral
    // direction in the YZ plane, which is X for any neutral with no X part
    let axis = Vec3::X.reject_from(neutral).normalize_or(Vec3::X);
    Quat::from_axis_angle(axis, degrees.to_radians()) * neutral
}
