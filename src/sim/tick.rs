//! Per-tick life-cycle advance
//!
//! Alive: derive layer targets, volumes and pose from the tilt, and watch for
//! the lean reaching a hazard. Dead: drift the layers to their end-of-stage
//! positions and count down to the restart request.

use super::state::{
    DeathEvent, FrameOutput, Hazard, HazardVolumes, LayerTargets, LifecycleState, SceneLifecycle,
};
use crate::consts::END_STAGE_SNAP_SCALE;
use crate::lerp;

/// Map tilt in [-1, 1] onto the animator pose in [0, 1] (flipped)
#[inline]
pub fn pose_from_tilt(tilt: f32) -> f32 {
    1.0 - (tilt / 2.0 + 0.5)
}

impl SceneLifecycle {
    /// Advance one tick with the current tilt and elapsed seconds
    pub fn advance(&mut self, tilt: f32, dt: f32) -> FrameOutput {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.state {
            LifecycleState::Alive => self.advance_alive(tilt),
            LifecycleState::Dead {
                elapsed,
                death_pose,
            } => self.advance_dead(elapsed, death_pose, dt),
        }
    }

    /// Layer positions for a tilt while alive
    pub fn slide_targets(&self, tilt: f32) -> LayerTargets {
        let range = self.config.slide_range;
        let mut targets = LayerTargets::default();
        // Each hazard reads the curve from its own side; the curve need not be symmetric
        for (hazard, lean) in [(Hazard::Water, -tilt), (Hazard::Fire, tilt)] {
            let intensity = self.config.lean_curve.evaluate(lean);
            let offset = hazard.slide_sign() * lerp(range.near, range.far, intensity);
            targets.set(hazard, self.origins.get(hazard) + offset);
        }
        targets
    }

    fn advance_alive(&mut self, tilt: f32) -> FrameOutput {
        let tilt = if tilt.is_finite() { tilt.clamp(-1.0, 1.0) } else { 0.0 };

        let layers = self.slide_targets(tilt);
        let pose = pose_from_tilt(tilt);
        let volumes = HazardVolumes::new(pose, 1.0 - pose);
        self.layers = layers;
        self.volumes = volumes;

        let mut death = None;
        if pose >= 1.0 || pose <= 0.0 {
            let hazard = Hazard::from_pose(pose);
            self.state = LifecycleState::Dead {
                elapsed: 0.0,
                death_pose: pose,
            };
            log::info!("Player claimed by {}", hazard.as_str());
            death = Some(DeathEvent {
                hazard,
                clip: self.config.death_clip(hazard).to_string(),
            });
        }

        FrameOutput {
            pose,
            fallen: death.is_some(),
            layers,
            volumes,
            death,
            restart_requested: false,
        }
    }

    fn advance_dead(&mut self, elapsed: f32, death_pose: f32, dt: f32) -> FrameOutput {
        let claimed_by = Hazard::from_pose(death_pose);
        let t = (self.config.end_stage_snap_speed * dt * END_STAGE_SNAP_SCALE).clamp(0.0, 1.0);

        for hazard in Hazard::ALL {
            let offset = if hazard == claimed_by {
                self.config.stage_advance_pos
            } else {
                self.config.stage_recede_pos
            };
            let target = self.origins.get(hazard) + hazard.slide_sign() * offset;
            let current = self.layers.get(hazard);
            self.layers.set(hazard, lerp(current, target, t));
        }

        let elapsed = elapsed + dt;
        self.state = LifecycleState::Dead {
            elapsed,
            death_pose,
        };

        let mut restart_requested = false;
        if !self.restart_sent && elapsed >= self.config.respawn_time {
            self.restart_sent = true;
            restart_requested = true;
            log::info!("Respawn timer elapsed after {:.2}s, requesting restart", elapsed);
        }

        FrameOutput {
            pose: death_pose,
            fallen: true,
            layers: self.layers,
            volumes: self.volumes,
            death: None,
            restart_requested,
        }
    }
}
