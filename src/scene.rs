//! Scene wiring
//!
//! A `Scene` owns one level's mapper and lifecycle plus handles to the host
//! collaborators, and pushes every tick's output into them. Reloading a level
//! means dropping the scene and building a new one.

use crate::audio::AudioSink;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::input::OrientationProvider;
use crate::settings::LevelSettings;
use crate::sim::{FrameOutput, Hazard, LayerTargets, OrientationMapper, SceneLifecycle};

/// Character animation target
pub trait Animator {
    /// Lean pose in [0, 1]
    fn set_pose(&mut self, pose: f32);
    fn set_fallen(&mut self, fallen: bool);
}

/// Background layer positions
pub trait LayerRenderer {
    fn set_layer_position(&mut self, layer: Hazard, y: f32);
}

/// Receives the one-shot restart request
pub trait LevelLoader {
    fn request_restart(&mut self);
}

/// Everything a scene talks to outside the simulation
#[derive(Debug, Clone, Default)]
pub struct Collaborators<P, A, S, R, L> {
    pub provider: P,
    pub animator: A,
    pub audio: S,
    pub renderer: R,
    pub loader: L,
}

/// One live level
pub struct Scene<P, A, S, R, L> {
    mapper: OrientationMapper,
    lifecycle: SceneLifecycle,
    io: Collaborators<P, A, S, R, L>,
    ticks: u64,
}

impl<P, A, S, R, L> Scene<P, A, S, R, L>
where
    P: OrientationProvider,
    A: Animator,
    S: AudioSink,
    R: LayerRenderer,
    L: LevelLoader,
{
    /// Build a scene from validated settings and the layers' starting positions
    pub fn new(
        settings: &LevelSettings,
        origins: LayerTargets,
        io: Collaborators<P, A, S, R, L>,
    ) -> Result<Self, ConfigError> {
        let mapper = settings.orientation_mapper()?;
        let lifecycle = SceneLifecycle::new(settings.lifecycle_config()?, origins);
        Ok(Self {
            mapper,
            lifecycle,
            io,
            ticks: 0,
        })
    }

    /// Sample input, advance one tick and push the result out
    pub fn tick(&mut self, dt: f32) -> FrameOutput {
        let raw = self.io.provider.sample();
        let tilt = self.mapper.tilt(raw);
        let output = self.lifecycle.advance(tilt, dt);
        self.ticks += 1;

        self.io.animator.set_pose(output.pose);
        for hazard in Hazard::ALL {
            self.io
                .renderer
                .set_layer_position(hazard, output.layers.get(hazard));
            self.io.audio.set_volume(hazard, output.volumes.get(hazard));
        }
        if let Some(death) = &output.death {
            self.io.audio.play_once(&death.clip, 1.0);
            self.io.animator.set_fallen(true);
        }
        if output.restart_requested {
            self.io.loader.request_restart();
        }

        output
    }

    /// Use the current orientation as the new neutral
    pub fn recalibrate(&mut self) -> Result<(), ConfigError> {
        let sample = self.io.provider.sample();
        self.mapper.recalibrate(sample)
    }

    pub fn mapper(&self) -> &OrientationMapper {
        &self.mapper
    }

    pub fn lifecycle(&self) -> &SceneLifecycle {
        &self.lifecycle
    }

    pub fn collaborators(&self) -> &Collaborators<P, A, S, R, L> {
        &self.io
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators<P, A, S, R, L> {
        &mut self.io
    }

    /// Ticks simulated so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Turns variable frame times into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `SIM_DT` steps to run for this frame
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioMixer;
    use crate::input::ScriptedOrientation;
    use crate::sim::{LeanCurve, LifecycleState};
    use glam::Vec3;

    #[derive(Debug, Default)]
    struct RecordingAnimator {
        poses: Vec<f32>,
        fallen: Vec<bool>,
    }

    impl Animator for RecordingAnimator {
        fn set_pose(&mut self, pose: f32) {
            self.poses.push(pose);
        }

        fn set_fallen(&mut self, fallen: bool) {
            self.fallen.push(fallen);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingRenderer {
        last: LayerTargets,
        updates: usize,
    }

    impl LayerRenderer for RecordingRenderer {
        fn set_layer_position(&mut self, layer: Hazard, y: f32) {
            self.last.set(layer, y);
            self.updates += 1;
        }
    }

    #[derive(Debug, Default)]
    struct CountingLoader {
        restarts: u32,
    }

    impl LevelLoader for CountingLoader {
        fn request_restart(&mut self) {
            self.restarts += 1;
        }
    }

    type TestScene =
        Scene<ScriptedOrientation, RecordingAnimator, AudioMixer, RecordingRenderer, CountingLoader>;

    fn scene(pitches: Vec<f32>) -> TestScene {
        let settings = LevelSettings {
            tilt_sensitivity: 0.5,
            base_phone_orientation: Vec3::NEG_Y,
            lean_curve: LeanCurve::linear(),
            respawn_time: 1.0,
            ..Default::default()
        };
        let io = Collaborators {
            provider: ScriptedOrientation::new(Vec3::NEG_Y, pitches),
            animator: RecordingAnimator::default(),
            audio: AudioMixer::default(),
            renderer: RecordingRenderer::default(),
            loader: CountingLoader::default(),
        };
        Scene::new(&settings, LayerTargets::default(), io).unwrap()
    }

    #[test]
    fn test_neutral_scene_pushes_outputs() {
        let mut scene = scene(vec![0.0]);
        let out = scene.tick(SIM_DT);
        assert_eq!(out.pose, 0.5);

        let io = scene.collaborators();
        assert_eq!(io.animator.poses, vec![0.5]);
        assert!(io.animator.fallen.is_empty());
        assert_eq!(io.renderer.updates, 2);
        assert_eq!(io.renderer.last, out.layers);
        assert!(io.audio.channel_level(Hazard::Water) > 0.0);
        assert_eq!(io.loader.restarts, 0);
    }

    #[test]
    fn test_death_and_restart_signalled_once() {
        // 50 degrees forward at sensitivity 0.5 saturates toward fire
        let mut scene = scene(vec![0.0, 10.0, 50.0]);
        for _ in 0..200 {
            scene.tick(0.1);
        }

        let io = scene.collaborators();
        assert_eq!(io.animator.fallen, vec![true]);
        assert_eq!(io.audio.played().len(), 1);
        assert_eq!(io.audio.played()[0].0, "death_fire");
        assert_eq!(io.loader.restarts, 1);
        assert!(matches!(
            scene.lifecycle().state(),
            LifecycleState::Dead { death_pose, .. } if death_pose == 0.0
        ));
    }

    #[test]
    fn test_backward_lean_claims_water() {
        let mut scene = scene(vec![-60.0]);
        let out = scene.tick(SIM_DT);
        assert_eq!(out.death.map(|d| d.hazard), Some(Hazard::Water));
        assert_eq!(scene.collaborators().audio.played()[0].0, "death_water");
    }

    #[test]
    fn test_recalibrate_from_provider() {
        let mut scene = scene(vec![20.0]);
        scene.recalibrate().unwrap();
        let out = scene.tick(SIM_DT);
        assert!((out.pose - 0.5).abs() < 1e-5);
        assert!(out.death.is_none());
        assert_eq!(scene.ticks(), 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = LevelSettings {
            base_phone_orientation: Vec3::ZERO,
            ..Default::default()
        };
        let io = Collaborators {
            provider: ScriptedOrientation::new(Vec3::NEG_Y, vec![]),
            animator: RecordingAnimator::default(),
            audio: AudioMixer::default(),
            renderer: RecordingRenderer::default(),
            loader: CountingLoader::default(),
        };
        assert!(Scene::new(&settings, LayerTargets::default(), io).is_err());
    }

    #[test]
    fn test_fixed_stepper() {
        let mut stepper = FixedStepper::new();
        assert_eq!(stepper.steps(SIM_DT * 0.5), 0);
        assert_eq!(stepper.steps(SIM_DT * 0.6), 1);
        assert!(stepper.pending() < SIM_DT);

        // Huge frames are clamped to MAX_FRAME_DT worth of steps
        let mut stepper = FixedStepper::new();
        let steps = stepper.steps(10.0);
        assert!((5..=MAX_SUBSTEPS).contains(&steps));
        assert!(stepper.pending() < SIM_DT);

        let mut stepper = FixedStepper::new();
        assert_eq!(stepper.steps(f32::NAN), 0);
        assert_eq!(stepper.steps(-1.0), 0);
    }
}
