//! Level settings
//!
//! Static tuning bundle supplied when a level loads. Stored as JSON so designers
//! can tweak feel without rebuilding.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{
    CalibrationReference, LeanCurve, LifecycleConfig, OrientationMapper, SlideRange,
    TiltSensitivity,
};

/// Clip handles played when a hazard claims the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathSounds {
    pub water: String,
    pub fire: String,
}

impl Default for DeathSounds {
    fn default() -> Self {
        Self {
            water: "death_water".to_string(),
            fire: "death_fire".to_string(),
        }
    }
}

/// Mixer preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Hazard ambience volume (0.0 - 1.0)
    pub hazard_volume: f32,
    /// Death sting volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            hazard_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// Everything a level needs to build its mapper and lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    // === Input ===
    /// 0 = needs near-maximal tilt, 1 = any tilt saturates
    pub tilt_sensitivity: f32,
    /// Orientation the player holds when standing neutrally
    pub base_phone_orientation: Vec3,

    // === Background ===
    pub slide_range: SlideRange,
    pub lean_curve: LeanCurve,

    // === End of stage ===
    pub end_stage_snap_speed: f32,
    pub stage_advance_pos: f32,
    pub stage_recede_pos: f32,
    /// Seconds from death until the level restarts
    pub respawn_time: f32,
    pub death_sounds: DeathSounds,

    // === Audio ===
    pub audio: AudioSettings,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            tilt_sensitivity: 0.5,
            base_phone_orientation: Vec3::NEG_Y,

            slide_range: SlideRange::new(2.0, 10.0),
            lean_curve: LeanCurve::default(),

            end_stage_snap_speed: 0.05,
            stage_advance_pos: 12.0,
            stage_recede_pos: -15.0,
            respawn_time: 2.0,
            death_sounds: DeathSounds::default(),

            audio: AudioSettings::default(),
        }
    }
}

impl LevelSettings {
    /// Parse settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded level settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default level settings ({err})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Level settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Check every field and build the mapper for this level
    pub fn orientation_mapper(&self) -> Result<OrientationMapper, ConfigError> {
        let reference = CalibrationReference::new(self.base_phone_orientation)?;
        let sensitivity = TiltSensitivity::new(self.tilt_sensitivity)?;
        Ok(OrientationMapper::new(reference, sensitivity))
    }

    /// Check every field and build the lifecycle tuning for this level
    pub fn lifecycle_config(&self) -> Result<LifecycleConfig, ConfigError> {
        finite("slide_range.near", self.slide_range.near)?;
        finite("slide_range.far", self.slide_range.far)?;
        finite("end_stage_snap_speed", self.end_stage_snap_speed)?;
        finite("stage_advance_pos", self.stage_advance_pos)?;
        finite("stage_recede_pos", self.stage_recede_pos)?;
        finite("respawn_time", self.respawn_time)?;
        non_negative("end_stage_snap_speed", self.end_stage_snap_speed)?;
        non_negative("respawn_time", self.respawn_time)?;
        if self.death_sounds.water.is_empty() {
            return Err(ConfigError::MissingDeathSound("water"));
        }
        if self.death_sounds.fire.is_empty() {
            return Err(ConfigError::MissingDeathSound("fire"));
        }
        self.lean_curve.validate()?;

        Ok(LifecycleConfig {
            slide_range: self.slide_range,
            lean_curve: self.lean_curve.clone(),
            stage_advance_pos: self.stage_advance_pos,
            stage_recede_pos: self.stage_recede_pos,
            end_stage_snap_speed: self.end_stage_snap_speed,
            respawn_time: self.respawn_time,
            water_death_clip: self.death_sounds.water.clone(),
            fire_death_clip: self.death_sounds.fire.clone(),
        })
    }

    /// Validate the whole bundle without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orientation_mapper()?;
        self.lifecycle_config()?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value < 0.0 {
        Err(ConfigError::Negative { field, value })
    } else {
        Ok(())
    }
}
