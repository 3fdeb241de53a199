//! Alien Invaders - A fixed-camera wave shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (movement, collisions, waves, game state)
//! - `render`: Z-ordered draw list for an external renderer
//! - `audio`: Sound cue dispatch to a pluggable backend
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `autopilot`: Demo-mode AI

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Window dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Target frame rate of the host loop
    pub const TARGET_FPS: u32 = 60;

    /// Ship sprite (one cell of the ship death strip)
    pub const SHIP_SIZE: f32 = 44.0;
    pub const SHIP_START_X: f32 = 400.0;
    pub const SHIP_START_Y: f32 = 500.0;

    /// Enemy sprite (one cell of the enemy sheet)
    pub const ENEMY_SIZE: f32 = 36.0;

    /// Bolt rectangles (player and enemy bolts share a shape)
    pub const BOLT_WIDTH: f32 = 8.0;
    pub const BOLT_HEIGHT: f32 = 30.0;

    /// Where deactivated entities are parked, well outside the window
    pub const OFFSCREEN_X: f32 = -100.0;
    pub const OFFSCREEN_Y: f32 = -100.0;
}

/// Parking spot for inactive entities
#[inline]
pub fn offscreen() -> Vec2 {
    Vec2::new(consts::OFFSCREEN_X, consts::OFFSCREEN_Y)
}

/// Barrier y-position for a window height (5/7 of the way down, whole pixels)
#[inline]
pub fn barrier_y(window_height: f32) -> f32 {
    ((5 * window_height as u32) / 7) as f32
}
