//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be rebalanced from a JSON
//! file without touching the simulation. Missing fields fall back to the
//! classic arcade values.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::{ConfigError, load_json};

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub window_width: f32,
    pub window_height: f32,

    /// Whether bolts are absorbed by the barrier line. The ship lives below
    /// the line, so turning this on stops every exchange of fire.
    pub solid_barrier: bool,

    // === Ship ===
    pub ship_size: f32,
    pub ship_start_x: f32,
    pub ship_start_y: f32,
    /// Pixels per second on each axis
    pub ship_speed: f32,
    pub starting_lives: u32,

    // === Player bolts ===
    pub bolt_width: f32,
    pub bolt_height: f32,
    pub bolt_speed: f32,
    /// Live player bolts allowed at once
    pub max_player_bolts: usize,
    /// Minimum seconds between two player shots
    pub fire_interval: f32,

    // === Enemy grid ===
    pub enemy_size: f32,
    pub grid_rows: usize,
    pub grid_columns: usize,
    pub grid_origin_x: f32,
    pub grid_origin_y: f32,
    pub grid_spacing: f32,
    pub enemy_base_speed: f32,
    /// Fixed downward nudge applied on the frame the grid changes direction
    pub descent_step: f32,

    // === Enemy bolt ===
    pub enemy_bolt_base_speed: f32,
    /// Seconds between enemy shots
    pub enemy_fire_cooldown: f32,

    // === Animation periods (seconds per frame) ===
    pub enemy_move_frame_time: f32,
    pub enemy_death_frame_time: f32,
    pub ship_death_frame_time: f32,

    // === Wave scaling ===
    pub enemy_speed_per_wave: f32,
    pub enemy_bolt_speed_per_wave: f32,
    /// Clearing this wave wins the game
    pub winning_wave: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            solid_barrier: false,

            ship_size: SHIP_SIZE,
            ship_start_x: SHIP_START_X,
            ship_start_y: SHIP_START_Y,
            ship_speed: 200.0,
            starting_lives: 3,

            bolt_width: BOLT_WIDTH,
            bolt_height: BOLT_HEIGHT,
            bolt_speed: 300.0,
            max_player_bolts: 3,
            fire_interval: 0.5,

            enemy_size: ENEMY_SIZE,
            grid_rows: 3,
            grid_columns: 10,
            grid_origin_x: 100.0,
            grid_origin_y: 50.0,
            grid_spacing: 60.0,
            enemy_base_speed: 50.0,
            descent_step: 20.0,

            enemy_bolt_base_speed: 100.0,
            enemy_fire_cooldown: 6.0,

            enemy_move_frame_time: 0.5,
            enemy_death_frame_time: 0.05,
            ship_death_frame_time: 0.3,

            enemy_speed_per_wave: 10.0,
            enemy_bolt_speed_per_wave: 5.0,
            winning_wave: 12,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let tuning: Tuning = load_json(path)?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("ship_size", self.ship_size),
            ("ship_speed", self.ship_speed),
            ("bolt_width", self.bolt_width),
            ("bolt_height", self.bolt_height),
            ("bolt_speed", self.bolt_speed),
            ("enemy_size", self.enemy_size),
            ("enemy_base_speed", self.enemy_base_speed),
            ("enemy_bolt_base_speed", self.enemy_bolt_base_speed),
            ("enemy_fire_cooldown", self.enemy_fire_cooldown),
            ("enemy_move_frame_time", self.enemy_move_frame_time),
            ("enemy_death_frame_time", self.enemy_death_frame_time),
            ("ship_death_frame_time", self.ship_death_frame_time),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("fire_interval", self.fire_interval),
            ("descent_step", self.descent_step),
            ("grid_spacing", self.grid_spacing),
            ("enemy_speed_per_wave", self.enemy_speed_per_wave),
            ("enemy_bolt_speed_per_wave", self.enemy_bolt_speed_per_wave),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.grid_rows == 0 || self.grid_columns == 0 {
            return Err(ConfigError::Invalid("enemy grid must not be empty".into()));
        }
        if self.max_player_bolts == 0 {
            return Err(ConfigError::Invalid("max_player_bolts must be at least 1".into()));
        }
        if self.winning_wave == 0 {
            return Err(ConfigError::Invalid("winning_wave must be at least 1".into()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".into()));
        }
        Ok(())
    }

    /// Barrier line y-position for this arena
    pub fn barrier_y(&self) -> f32 {
        crate::barrier_y(self.window_height)
    }

    /// Enemy speed at the start of a 1-based wave
    pub fn enemy_speed_for_wave(&self, wave: u32) -> f32 {
        self.enemy_base_speed + self.enemy_speed_per_wave * wave.saturating_sub(1) as f32
    }

    /// Enemy bolt speed at the start of a 1-based wave
    pub fn enemy_bolt_speed_for_wave(&self, wave: u32) -> f32 {
        self.enemy_bolt_base_speed + self.enemy_bolt_speed_per_wave * wave.saturating_sub(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "ship_speed": 250.0, "grid_rows": 5 }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.ship_speed, 250.0);
        assert_eq!(tuning.grid_rows, 5);
        assert_eq!(tuning.grid_columns, 10);
        assert_eq!(tuning.winning_wave, 12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let tuning = Tuning {
            bolt_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));

        let tuning = Tuning {
            grid_columns: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());

        let tuning = Tuning {
            max_player_bolts: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_wave_speed_scaling() {
        let tuning = Tuning::default();
        assert_eq!(tuning.enemy_speed_for_wave(1), 50.0);
        assert_eq!(tuning.enemy_speed_for_wave(3), 70.0);
        assert_eq!(tuning.enemy_bolt_speed_for_wave(1), 100.0);
        assert_eq!(tuning.enemy_bolt_speed_for_wave(4), 115.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Tuning::load(Path::new("/definitely/not/here/tuning.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
