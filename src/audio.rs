//! Hazard audio mixing
//!
//! The simulation only decides levels and when to play a death sting. The
//! sink trait is where a platform backend plugs in.

use crate::settings::AudioSettings;
use crate::sim::{Hazard, PerHazard};

/// Write-only audio target driven once per tick
pub trait AudioSink {
    /// Set the looping ambience level of a hazard channel (0.0 - 1.0)
    fn set_volume(&mut self, channel: Hazard, volume: f32);
    /// Fire-and-forget one-shot clip
    fn play_once(&mut self, clip: &str, volume: f32);
}

/// Audio mixer that applies the player's volume preferences
///
/// Holds the last mixed levels so a backend (or a test) can read them back.
#[derive(Debug, Clone)]
pub struct AudioMixer {
    master_volume: f32,
    hazard_volume: f32,
    sfx_volume: f32,
    muted: bool,
    channels: PerHazard,
    played: Vec<(String, f32)>,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(&AudioSettings::default())
    }
}

impl AudioMixer {
    pub fn new(settings: &AudioSettings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            hazard_volume: settings.hazard_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            channels: PerHazard::default(),
            played: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn master(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Mixed level of a hazard channel
    pub fn channel_level(&self, channel: Hazard) -> f32 {
        self.channels.get(channel)
    }

    /// One-shots played so far with their mixed volume
    pub fn played(&self) -> &[(String, f32)] {
        &self.played
    }
}

impl AudioSink for AudioMixer {
    fn set_volume(&mut self, channel: Hazard, volume: f32) {
        let mixed = volume.clamp(0.0, 1.0) * self.hazard_volume * self.master();
        self.channels.set(channel, mixed);
    }

    fn play_once(&mut self, clip: &str, volume: f32) {
        let mixed = volume.clamp(0.0, 1.0) * self.sfx_volume * self.master();
        if mixed <= 0.0 {
            return;
        }
        log::debug!("Playing {clip} at {mixed:.2}");
        self.played.push((clip.to_string(), mixed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> AudioSettings {
        AudioSettings {
            master_volume: 1.0,
            hazard_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[test]
    fn test_channel_levels_scaled() {
        let mut mixer = AudioMixer::new(&AudioSettings {
            master_volume: 0.5,
            ..full()
        });
        mixer.set_volume(Hazard::Water, 0.8);
        mixer.set_volume(Hazard::Fire, 2.0);
        assert!((mixer.channel_level(Hazard::Water) - 0.4).abs() < 1e-6);
        assert_eq!(mixer.channel_level(Hazard::Fire), 0.5);
    }

    #[test]
    fn test_muted_drops_one_shots() {
        let mut mixer = AudioMixer::new(&full());
        mixer.set_muted(true);
        mixer.play_once("death_fire", 1.0);
        mixer.set_volume(Hazard::Fire, 1.0);
        assert!(mixer.played().is_empty());
        assert_eq!(mixer.channel_level(Hazard::Fire), 0.0);

        mixer.set_muted(false);
        mixer.play_once("death_fire", 1.0);
        assert_eq!(mixer.played(), &[("death_fire".to_string(), 1.0)]);
    }
}
