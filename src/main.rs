//! Tiltfall headless runner
//!
//! Plays one level with a simulated, slowly unbalancing player until the
//! lifecycle asks for a restart, logging what the host would render.
//!
//! Usage: `tiltfall [settings.json] [seed]`

use glam::Vec3;

use tiltfall::audio::AudioMixer;
use tiltfall::input::{OrientationProvider, Smoothed, WobbleOrientation};
use tiltfall::scene::{Animator, Collaborators, LayerRenderer, LevelLoader};
use tiltfall::sim::{Hazard, LayerTargets};
use tiltfall::{FixedStepper, LevelSettings, Scene};

/// Frame time of the pretend display (30 fps)
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up after this many frames (two minutes)
const MAX_FRAMES: u32 = 30 * 120;
/// Samples averaged by the simulated sensor
const SMOOTHING_WINDOW: usize = 8;

#[derive(Debug, Default)]
struct LogAnimator {
    pose: f32,
    fallen: bool,
}

impl Animator for LogAnimator {
    fn set_pose(&mut self, pose: f32) {
        self.pose = pose;
    }

    fn set_fallen(&mut self, fallen: bool) {
        if fallen && !self.fallen {
            log::info!("Animator: fallen at pose {:.2}", self.pose);
        }
        self.fallen = fallen;
    }
}

#[derive(Debug, Default)]
struct LogRenderer {
    layers: LayerTargets,
}

impl LayerRenderer for LogRenderer {
    fn set_layer_position(&mut self, layer: Hazard, y: f32) {
        self.layers.set(layer, y);
    }
}

#[derive(Debug, Default)]
struct RestartFlag {
    requested: bool,
}

impl LevelLoader for RestartFlag {
    fn request_restart(&mut self) {
        self.requested = true;
    }
}

fn main() {
    env_logger::init();
    log::info!("Tiltfall (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => LevelSettings::load_or_default(path),
        None => LevelSettings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x7117_fa11);

    if let Err(err) = run(&settings, seed) {
        log::error!("Level failed to start: {err}");
        std::process::exit(1);
    }
}

fn run(settings: &LevelSettings, seed: u64) -> Result<(), tiltfall::ConfigError> {
    let neutral: Vec3 = settings.base_phone_orientation;
    let provider = Smoothed::new(WobbleOrientation::new(neutral, seed), SMOOTHING_WINDOW);
    let io = Collaborators {
        provider,
        animator: LogAnimator::default(),
        audio: AudioMixer::new(&settings.audio),
        renderer: LogRenderer::default(),
        loader: RestartFlag::default(),
    };
    let mut scene = Scene::new(settings, LayerTargets::new(0.0, 0.0), io)?;
    log::info!("Level loaded with seed: {}", seed);

    run_level(&mut scene);
    Ok(())
}

fn run_level<P: OrientationProvider>(
    scene: &mut Scene<P, LogAnimator, AudioMixer, LogRenderer, RestartFlag>,
) {
    let mut stepper = FixedStepper::new();
    for frame in 0..MAX_FRAMES {
        for _ in 0..stepper.steps(FRAME_DT) {
            scene.tick(tiltfall::consts::SIM_DT);
        }

        let io = scene.collaborators();
        if frame % 30 == 0 {
            log::info!(
                "t={:5.2}s pose={:.2} water={:6.2} fire={:6.2} vol=({:.2}, {:.2})",
                frame as f32 * FRAME_DT,
                io.animator.pose,
                io.renderer.layers.water,
                io.renderer.layers.fire,
                io.audio.channel_level(Hazard::Water),
                io.audio.channel_level(Hazard::Fire),
            );
        }
        if io.loader.requested {
            let played: Vec<&str> = io.audio.played().iter().map(|(clip, _)| clip.as_str()).collect();
            log::info!(
                "Restart requested after {} ticks (death sounds: {:?})",
                scene.ticks(),
                played
            );
            return;
        }
    }
    log::warn!("Player never fell within {} frames", MAX_FRAMES);
}
