//! Player settings and preferences
//!
//! Read from a small JSON file kept apart from gameplay tuning.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, load_json};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for enemy fire; `None` picks one from the clock
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Frame clock ===
    /// Longest frame the host will report, in seconds. Keeps a stalled
    /// window from teleporting bolts through enemies.
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            max_frame_dt: 0.1,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = load_json(path)?;
        if !(settings.max_frame_dt.is_finite() && settings.max_frame_dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_frame_dt must be positive, got {}",
                settings.max_frame_dt
            )));
        }
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {}", err);
                Self::default()
            }
        }
    }

    /// Clamp a measured frame time to what the simulation accepts
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        dt.clamp(0.0, self.max_frame_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings: Settings = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "alien_invaders_settings_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "seed": 99, "muted": true }"#).expect("write settings");
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        let loaded = loaded.expect("load settings");
        assert_eq!(loaded.seed, Some(99));
        assert!(loaded.muted);
        assert_eq!(loaded.max_frame_dt, 0.1);
    }

    #[test]
    fn test_rejects_non_positive_frame_cap() {
        let path = std::env::temp_dir().join(format!(
            "alien_invaders_bad_settings_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "max_frame_dt": 0.0 }"#).expect("write settings");
        let result = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_file_falls_back() {
        let settings = Settings::load_or_default(Path::new("/no/such/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_clamp_dt() {
        let settings = Settings::default();
        assert_eq!(settings.clamp_dt(0.016), 0.016);
        assert_eq!(settings.clamp_dt(2.0), 0.1);
        assert_eq!(settings.clamp_dt(-1.0), 0.0);
    }
}
