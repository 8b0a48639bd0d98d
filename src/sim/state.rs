//! Life-cycle state and per-tick output types
//!
//! Everything the lifecycle remembers between ticks lives here.

use serde::{Deserialize, Serialize};

use super::curve::LeanCurve;

/// One of the two hazards flanking the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    Water,
    Fire,
}

impl Hazard {
    pub const ALL: [Hazard; 2] = [Hazard::Water, Hazard::Fire];

    /// Which hazard a pose at (or past) an extreme belongs to
    ///
    /// pose >= 1 leans fully into the water, anything else into the fire.
    pub fn from_pose(pose: f32) -> Self {
        if pose >= 1.0 { Hazard::Water } else { Hazard::Fire }
    }

    pub fn other(self) -> Self {
        match self {
            Hazard::Water => Hazard::Fire,
            Hazard::Fire => Hazard::Water,
        }
    }

    /// Direction this hazard's layer travels as the player leans toward it
    pub fn slide_sign(self) -> f32 {
        match self {
            Hazard::Water => -1.0,
            Hazard::Fire => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Water => "water",
            Hazard::Fire => "fire",
        }
    }
}

/// How far each background layer may travel from its origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideRange {
    pub near: f32,
    pub far: f32,
}

impl SlideRange {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }
}

/// A value per hazard layer (positions, volumes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerHazard {
    pub water: f32,
    pub fire: f32,
}

impl PerHazard {
    pub fn new(water: f32, fire: f32) -> Self {
        Self { water, fire }
    }

    pub fn get(&self, hazard: Hazard) -> f32 {
        match hazard {
            Hazard::Water => self.water,
            Hazard::Fire => self.fire,
        }
    }

    pub fn set(&mut self, hazard: Hazard, value: f32) {
        match hazard {
            Hazard::Water => self.water = value,
            Hazard::Fire => self.fire = value,
        }
    }
}

/// Y positions of the two background layers
pub type LayerTargets = PerHazard;

/// Channel volumes of the two hazards (0.0 - 1.0)
pub type HazardVolumes = PerHazard;

/// Alive/Dead state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// No death timer running
    Alive,
    /// Player was claimed by a hazard
    Dead {
        /// Seconds since death was registered
        elapsed: f32,
        /// Pose at the moment of death (decides the claiming hazard)
        death_pose: f32,
    },
}

impl LifecycleState {
    pub fn is_alive(&self) -> bool {
        matches!(self, LifecycleState::Alive)
    }

    /// Seconds since death, 0 while alive
    pub fn elapsed(&self) -> f32 {
        match self {
            LifecycleState::Alive => 0.0,
            LifecycleState::Dead { elapsed, .. } => *elapsed,
        }
    }
}

/// Emitted on the tick the player dies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathEvent {
    pub hazard: Hazard,
    /// Clip the audio sink should play once
    pub clip: String,
}

/// Everything the host pushes into its collaborators for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Animator pose (0 = fully toward fire, 1 = fully toward water)
    pub pose: f32,
    /// Animator "fallen" flag
    pub fallen: bool,
    /// Absolute layer Y positions
    pub layers: LayerTargets,
    pub volumes: HazardVolumes,
    /// One-shot death notification
    pub death: Option<DeathEvent>,
    /// One-shot request for the level loader
    pub restart_requested: bool,
}

/// Static tuning of the life-cycle, validated before construction
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleConfig {
    pub slide_range: SlideRange,
    pub lean_curve: LeanCurve,
    /// Offset (along each layer's slide direction) the claiming hazard snaps to
    pub stage_advance_pos: f32,
    /// Offset the other hazard recedes to
    pub stage_recede_pos: f32,
    pub end_stage_snap_speed: f32,
    /// Seconds between death and the restart request
    pub respawn_time: f32,
    pub water_death_clip: String,
    pub fire_death_clip: String,
}

impl LifecycleConfig {
    pub fn death_clip(&self, hazard: Hazard) -> &str {
        match hazard {
            Hazard::Water => &self.water_death_clip,
            Hazard::Fire => &self.fire_death_clip,
        }
    }
}

/// The single lifecycle instance of an active level
#[derive(Debug, Clone)]
pub struct SceneLifecycle {
    pub(crate) config: LifecycleConfig,
    pub(crate) state: LifecycleState,
    /// Layer positions when the level loaded
    pub(crate) origins: LayerTargets,
    /// Positions emitted on the previous tick
    pub(crate) layers: LayerTargets,
    /// Volumes emitted on the previous tick
    pub(crate) volumes: HazardVolumes,
    pub(crate) restart_sent: bool,
}

impl SceneLifecycle {
    /// Fresh lifecycle in the `Alive` state
    pub fn new(config: LifecycleConfig, origins: LayerTargets) -> Self {
        Self {
            config,
            state: LifecycleState::Alive,
            origins,
            layers: origins,
            volumes: HazardVolumes::new(0.5, 0.5),
            restart_sent: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn origins(&self) -> LayerTargets {
        self.origins
    }

    /// Layer positions as of the last tick
    pub fn layers(&self) -> LayerTargets {
        self.layers
    }

    pub fn restart_requested(&self) -> bool {
        self.restart_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_from_pose() {
        assert_eq!(Hazard::from_pose(1.0), Hazard::Water);
        assert_eq!(Hazard::from_pose(1.2), Hazard::Water);
        assert_eq!(Hazard::from_pose(0.0), Hazard::Fire);
        assert_eq!(Hazard::from_pose(-0.1), Hazard::Fire);
        assert_eq!(Hazard::Water.other(), Hazard::Fire);
    }

    #[test]
    fn test_per_hazard_access() {
        let mut layers = LayerTargets::new(1.0, 2.0);
        assert_eq!(layers.get(Hazard::Water), 1.0);
        layers.set(Hazard::Fire, 5.0);
        assert_eq!(layers.fire, 5.0);
    }

    #[test]
    fn test_state_elapsed() {
        assert_eq!(LifecycleState::Alive.elapsed(), 0.0);
        let dead = LifecycleState::Dead {
            elapsed: 1.5,
            death_pose: 0.0,
        };
        assert_eq!(dead.elapsed(), 1.5);
        assert!(!dead.is_alive());
    }
}
