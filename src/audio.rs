//! Sound cue dispatch
//!
//! The simulation only says *which* cue to play; buffers and devices belong
//! to whatever [`AudioBackend`] the host plugs in.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ship fires a bolt
    Fire,
    /// Enemy hit by a player bolt
    EnemyDestroyed,
    /// Player bolt and enemy bolt cancel out
    BoltDestroyed,
    /// Ship hit by the enemy bolt
    ShipDamage,
}

impl SoundEffect {
    /// Cue for a game event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerFired => Some(SoundEffect::Fire),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::EnemyDestroyed),
            GameEvent::BoltsCollided => Some(SoundEffect::BoltDestroyed),
            GameEvent::ShipHit { .. } => Some(SoundEffect::ShipDamage),
            _ => None,
        }
    }

    /// Conventional asset file for this cue
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Fire => "pew2.wav",
            SoundEffect::EnemyDestroyed => "blast1.wav",
            SoundEffect::BoltDestroyed => "pop1.wav",
            SoundEffect::ShipDamage => "blast2.wav",
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that writes cues to the log instead of a device
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("♪ {} @ {:.2}", effect.file_name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogBackend> {
    fn default() -> Self {
        Self::new(LogBackend)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Pick up volume and mute from player settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    /// Play the cue for every event that has one
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::from_event) {
            self.play(effect);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundEffect, f32)>,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.played.push((effect, volume));
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.play_events(&[
            GameEvent::PlayerFired,
            GameEvent::EnemyFired,
            GameEvent::EnemyDestroyed { id: 3 },
            GameEvent::BoltsCollided,
            GameEvent::ShipHit { lives_left: 2 },
            GameEvent::WaveCleared { wave: 1 },
        ]);
        let effects: Vec<SoundEffect> = audio.backend().played.iter().map(|p| p.0).collect();
        assert_eq!(
            effects,
            vec![
                SoundEffect::Fire,
                SoundEffect::EnemyDestroyed,
                SoundEffect::BoltDestroyed,
                SoundEffect::ShipDamage,
            ]
        );
        assert!(audio.backend().played.iter().all(|p| (p.1 - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(Recorder::default());
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        audio.apply_settings(&settings);
        audio.play(SoundEffect::Fire);
        assert!(audio.backend().played.is_empty());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        audio.play(SoundEffect::Fire);
        assert!(audio.backend().played.is_empty());
    }
}
